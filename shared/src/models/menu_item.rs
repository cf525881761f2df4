//! Menu Item Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    /// Category reference (String ID)
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Base price in currency unit
    pub price: f64,
    pub is_available: bool,
    /// Kitchen station routing hint (e.g. "grill", "bar")
    pub kitchen_station: Option<String>,
    pub sort_order: i32,

    // -- Item-level discount (wins over category discount, no stacking) --

    /// Absolute discounted price; takes priority over discount_percentage
    pub discounted_price: Option<f64>,
    /// Percentage discount (0-100)
    pub discount_percentage: Option<f64>,
    /// Discount window start (Unix millis, None = unbounded)
    pub discount_start: Option<i64>,
    /// Discount window end (Unix millis, None = unbounded)
    pub discount_end: Option<i64>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemCreate {
    pub category_id: String,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub kitchen_station: Option<String>,
    pub sort_order: Option<i32>,
    pub discounted_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub discount_start: Option<i64>,
    pub discount_end: Option<i64>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub category_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub kitchen_station: Option<String>,
    pub sort_order: Option<i32>,
    pub discounted_price: Option<Option<f64>>,
    pub discount_percentage: Option<Option<f64>>,
    pub discount_start: Option<Option<i64>>,
    pub discount_end: Option<Option<i64>>,
}

/// Availability toggle payload (kitchen side-channel action)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub is_available: bool,
}
