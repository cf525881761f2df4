//! Notification Model
//!
//! Durable mailbox messages surfaced to staff panels. Messages stay
//! deliverable until explicitly acknowledged (at-least-once).

use serde::{Deserialize, Serialize};

/// Which staff panel the message targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationAudience {
    Cashier,
    Kitchen,
    Waiter,
}

/// Notification kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewOrder,
    BillRequest,
    PaymentCompleted,
    TableTransferred,
}

/// Mailbox message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub restaurant_id: String,
    pub audience: NotificationAudience,
    pub kind: NotificationKind,
    pub table_number: i32,
    /// Kind-specific payload (order id, amounts, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    pub created_at: i64,
    #[serde(default)]
    pub acknowledged: bool,
}
