//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// A category may carry its own discount window which applies to all
/// contained items when no item-level discount is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
    /// Category-level discount percentage (0-100)
    pub discount_percentage: Option<f64>,
    /// Discount window start (Unix millis, None = unbounded)
    pub discount_start: Option<i64>,
    /// Discount window end (Unix millis, None = unbounded)
    pub discount_end: Option<i64>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub sort_order: Option<i32>,
    pub discount_percentage: Option<f64>,
    pub discount_start: Option<i64>,
    pub discount_end: Option<i64>,
}

/// Update category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub discount_percentage: Option<Option<f64>>,
    pub discount_start: Option<Option<i64>>,
    pub discount_end: Option<Option<i64>>,
}
