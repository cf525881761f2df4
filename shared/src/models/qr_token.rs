//! QR Token Model
//!
//! 餐桌二维码令牌：扫码后授权本桌点餐，结账完成后失效。
//! Only the sha256 digest is stored at rest; the plain token is returned
//! once at generation time.

use serde::{Deserialize, Serialize};

/// QR token entity (stored form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrToken {
    /// sha256 hex digest of the plain token
    pub digest: String,
    pub restaurant_id: String,
    pub table_number: i32,
    pub is_active: bool,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl QrToken {
    /// Active and not past expiry at `now` (Unix millis)
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.is_active && now < self.expires_at
    }
}

/// Generate token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrGenerate {
    pub restaurant_id: String,
    pub table_number: i32,
}

/// Generated token response (plain token, shown once)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrGenerated {
    pub token: String,
    pub restaurant_id: String,
    pub table_number: i32,
    pub expires_at: i64,
}

/// Verification response
///
/// Unknown or expired tokens verify as inactive rather than erroring -
/// clients treat both identically and the table_number here is
/// authoritative over anything in the scanned URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrVerification {
    pub is_active: bool,
    pub restaurant_id: Option<String>,
    pub table_number: Option<i32>,
    pub expires_at: Option<i64>,
}

impl QrVerification {
    pub fn inactive() -> Self {
        Self {
            is_active: false,
            restaurant_id: None,
            table_number: None,
            expires_at: None,
        }
    }
}
