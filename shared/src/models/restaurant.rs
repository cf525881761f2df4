//! Restaurant Model (多租户根实体)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Unique subdomain used for public lookup
    pub subdomain: String,
    /// IANA timezone name (e.g. "Europe/Madrid")
    pub timezone: String,
    /// Business day boundary, "HH:MM"
    pub business_day_cutoff: String,
    pub is_active: bool,
    /// Creation timestamp (Unix millis)
    pub created_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantCreate {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 2, max = 32))]
    pub subdomain: String,
    pub timezone: Option<String>,
    pub business_day_cutoff: Option<String>,
}

/// Update restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub business_day_cutoff: Option<String>,
    pub is_active: Option<bool>,
}
