//! 事件推送类型定义
//!
//! 服务端通过 SSE 向所有面板广播这些事件，作为轮询之外的主变更信号。
//! 客户端收到事件后按需拉取权威数据进行对账。

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Feed event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedEventKind {
    /// New order placed
    NewOrder,
    /// Order mutated (status, items, table, payment)
    OrderUpdated,
    /// Order hard-deleted
    OrderDeleted,
    /// Mailbox notification enqueued
    Notification,
}

impl fmt::Display for FeedEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedEventKind::NewOrder => write!(f, "new_order"),
            FeedEventKind::OrderUpdated => write!(f, "order_updated"),
            FeedEventKind::OrderDeleted => write!(f, "order_deleted"),
            FeedEventKind::Notification => write!(f, "notification"),
        }
    }
}

/// Event feed envelope
///
/// `version` increases monotonically per restaurant so clients can detect
/// gaps (missed events while disconnected) and trigger a full refetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEvent {
    pub event_id: Uuid,
    pub kind: FeedEventKind,
    pub restaurant_id: String,
    /// Affected entity ID (order id, notification id)
    pub id: String,
    pub version: u64,
    /// Entity data (None for deletions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub timestamp: i64,
}

impl FeedEvent {
    pub fn new(
        kind: FeedEventKind,
        restaurant_id: impl Into<String>,
        id: impl Into<String>,
        version: u64,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            kind,
            restaurant_id: restaurant_id.into(),
            id: id.into(),
            version,
            data,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Serialize payload for the SSE data field
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_display() {
        assert_eq!(FeedEventKind::NewOrder.to_string(), "new_order");
        assert_eq!(FeedEventKind::OrderUpdated.to_string(), "order_updated");
    }

    #[test]
    fn test_event_round_trip() {
        let event = FeedEvent::new(
            FeedEventKind::NewOrder,
            "r1",
            "order-1",
            7,
            Some(serde_json::json!({"table_number": 5})),
        );
        let json = event.to_json().unwrap();
        let back: FeedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, FeedEventKind::NewOrder);
        assert_eq!(back.version, 7);
        assert_eq!(back.id, "order-1");
    }
}
