//! Order Model
//!
//! Orders advance forward through the status enum; `Cancelled` is reachable
//! from any non-terminal state. Item prices are snapshots taken at order
//! time, not live menu prices.

use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Delivered,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Forward position in the lifecycle (Cancelled is off the main line)
    pub const fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Preparing => 1,
            OrderStatus::Ready => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Paid => 4,
            OrderStatus::Cancelled => 5,
        }
    }

    /// Terminal states accept no further transitions
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    /// Whether `self -> to` is a legal transition, independent of role.
    ///
    /// Legal moves are single forward steps plus cancellation from any
    /// non-terminal state. Paid is only reachable from Ready/Delivered
    /// (or Pending with a bill request, enforced at the handler layer).
    pub fn can_transition(&self, to: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match to {
            OrderStatus::Cancelled => true,
            OrderStatus::Paid => matches!(
                self,
                OrderStatus::Pending | OrderStatus::Ready | OrderStatus::Delivered
            ),
            _ => to.rank() == self.rank() + 1,
        }
    }

    /// Criticality used when merging a table's orders into one grouped card:
    /// the group shows the most urgent member status.
    pub const fn group_priority(&self) -> u8 {
        match self {
            OrderStatus::Pending => 5,
            OrderStatus::Preparing => 4,
            OrderStatus::Ready => 3,
            OrderStatus::Delivered => 2,
            OrderStatus::Cancelled => 1,
            OrderStatus::Paid => 0,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Order item (denormalized price snapshot)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Menu item reference (String ID)
    pub item_id: String,
    pub name: String,
    /// Unit price in currency unit, snapshot at order time
    pub price: f64,
    pub quantity: i32,
    pub note: Option<String>,
    pub kitchen_station: Option<String>,
}

impl OrderItem {
    /// Line total
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Item subset covered by a split payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaidItem {
    pub item_id: String,
    pub quantity: i32,
}

/// Payment record (single or split installment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: String,
    pub method: String,
    /// Amount in currency unit
    pub amount: f64,
    /// Item subset covered by this installment (item split only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PaidItem>>,
    pub timestamp: i64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub restaurant_id: String,
    pub table_number: i32,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub payments: Vec<PaymentRecord>,
    /// Total amount in currency unit
    pub total_amount: f64,
    /// Paid amount in currency unit
    pub paid_amount: f64,
    pub note: Option<String>,
    /// Digest of the QR token that placed this order (customer orders only)
    pub qr_token: Option<String>,
    /// Customer has requested the bill (enables cashier payment on PENDING)
    #[serde(default)]
    pub bill_requested: bool,
    pub receipt_number: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Remaining amount to pay
    pub fn remaining_amount(&self) -> f64 {
        (self.total_amount - self.paid_amount).max(0.0)
    }

    /// Check if fully paid (cent tolerance for float accumulation)
    pub fn is_fully_paid(&self) -> bool {
        self.remaining_amount() < 0.005
    }

    /// Total item units across all lines
    pub fn total_units(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Item input for order placement (prices are resolved server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub item_id: String,
    pub quantity: i32,
    pub note: Option<String>,
}

/// Create order payload (customer checkout or staff manual entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub restaurant_id: String,
    pub table_number: i32,
    pub items: Vec<OrderItemInput>,
    pub note: Option<String>,
    /// QR token gating the order (absent for staff manual entry)
    pub token: Option<String>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Change table payload (waiter action, not a status transition)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableChange {
    pub table_number: i32,
}

/// Payment payload (single or split installment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub method: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PaidItem>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition(OrderStatus::Delivered));
        assert!(OrderStatus::Delivered.can_transition(OrderStatus::Paid));
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!OrderStatus::Ready.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Preparing.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Ready));
    }

    #[test]
    fn test_no_skipping_forward() {
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Ready));
        assert!(!OrderStatus::Preparing.can_transition(OrderStatus::Delivered));
    }

    #[test]
    fn test_cancel_from_non_terminal() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
        assert!(OrderStatus::Ready.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Paid.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn test_paid_reachability() {
        // Ready and Delivered can settle directly; Pending only via the
        // bill-request path, which the handler checks on top of this rule.
        assert!(OrderStatus::Ready.can_transition(OrderStatus::Paid));
        assert!(OrderStatus::Delivered.can_transition(OrderStatus::Paid));
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Paid));
        assert!(!OrderStatus::Preparing.can_transition(OrderStatus::Paid));
    }

    #[test]
    fn test_group_priority_ordering() {
        assert!(OrderStatus::Pending.group_priority() > OrderStatus::Preparing.group_priority());
        assert!(OrderStatus::Preparing.group_priority() > OrderStatus::Ready.group_priority());
        assert!(OrderStatus::Ready.group_priority() > OrderStatus::Delivered.group_priority());
        assert!(OrderStatus::Delivered.group_priority() > OrderStatus::Cancelled.group_priority());
    }

    #[test]
    fn test_remaining_amount() {
        let order = Order {
            id: "o1".into(),
            restaurant_id: "r1".into(),
            table_number: 5,
            status: OrderStatus::Ready,
            items: vec![],
            payments: vec![],
            total_amount: 30.0,
            paid_amount: 12.5,
            note: None,
            qr_token: None,
            bill_requested: false,
            receipt_number: "MES1".into(),
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(order.remaining_amount(), 17.5);
        assert!(!order.is_fully_paid());
    }

    #[test]
    fn test_status_serde_format() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"PREPARING\"");
    }
}
