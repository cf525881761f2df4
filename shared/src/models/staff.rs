//! Staff Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Staff role (决定默认权限集和可打开的面板)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Waiter,
    Chef,
    Cashier,
    Manager,
    Admin,
}

impl StaffRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Waiter => "waiter",
            StaffRole::Chef => "chef",
            StaffRole::Cashier => "cashier",
            StaffRole::Manager => "manager",
            StaffRole::Admin => "admin",
        }
    }
}

/// Staff entity (stored form, includes password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub username: String,
    /// Argon2 password hash - never serialized into API responses
    pub password_hash: String,
    pub role: StaffRole,
    /// Permission strings (panel/action grants)
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Staff response (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffResponse {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub username: String,
    pub role: StaffRole,
    pub permissions: Vec<String>,
    pub is_active: bool,
}

impl From<Staff> for StaffResponse {
    fn from(s: Staff) -> Self {
        Self {
            id: s.id,
            restaurant_id: s.restaurant_id,
            name: s.name,
            username: s.username,
            role: s.role,
            permissions: s.permissions,
            is_active: s.is_active,
        }
    }
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StaffCreate {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(min = 2, max = 32))]
    pub username: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    pub role: StaffRole,
    /// Explicit grants; defaults to the role's permission set when absent
    pub permissions: Option<Vec<String>>,
}

/// Update staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<StaffRole>,
    pub permissions: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
