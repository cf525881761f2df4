//! Table session types
//!
//! 同桌多台设备通过同一个 QR 令牌共享一份购物车。会话按
//! restaurant + table + token 键控，购物车以整车替换方式收敛
//! (last-write-wins)，不做逐项合并。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One cart line as seen by every device at the table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    /// Effective unit price at the time the line was added
    pub price: f64,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Shared cart snapshot
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    /// Bumped on every accepted write; clients compare versions cheaply
    pub version: u64,
    pub updated_at: i64,
}

impl CartSnapshot {
    /// Order-independent content comparison over (item_id, name, price, qty).
    ///
    /// Used by clients to decide whether a pulled cart actually differs from
    /// the local one, and by tests to assert convergence.
    pub fn same_lines(&self, other: &CartSnapshot) -> bool {
        if self.lines.len() != other.lines.len() {
            return false;
        }
        let mut counts: HashMap<(String, String, String, i32), i32> = HashMap::new();
        for line in &self.lines {
            *counts.entry(Self::line_key(line)).or_insert(0) += 1;
        }
        for line in &other.lines {
            match counts.get_mut(&Self::line_key(line)) {
                Some(n) => *n -= 1,
                None => return false,
            }
        }
        counts.values().all(|n| *n == 0)
    }

    // Float prices are keyed by their fixed display form to keep the
    // comparison hashable.
    fn line_key(line: &CartLine) -> (String, String, String, i32) {
        (
            line.item_id.clone(),
            line.name.clone(),
            format!("{:.2}", line.price),
            line.quantity,
        )
    }
}

/// Join request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionJoin {
    pub restaurant_id: String,
    pub table_number: i32,
    pub token: String,
    /// Rejoin with a previously issued client id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Whole-cart write request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdate {
    pub client_id: String,
    pub lines: Vec<CartLine>,
}

/// Leave request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLeave {
    pub client_id: String,
}

/// Session state returned to participants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_key: String,
    pub client_id: String,
    pub cart: CartSnapshot,
    pub active_users_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, qty: i32) -> CartLine {
        CartLine {
            item_id: id.to_string(),
            name: format!("Item {}", id),
            price: 4.5,
            quantity: qty,
            note: None,
        }
    }

    #[test]
    fn test_same_lines_order_independent() {
        let a = CartSnapshot {
            lines: vec![line("a", 1), line("b", 2)],
            version: 1,
            updated_at: 0,
        };
        let b = CartSnapshot {
            lines: vec![line("b", 2), line("a", 1)],
            version: 9,
            updated_at: 99,
        };
        assert!(a.same_lines(&b));
    }

    #[test]
    fn test_same_lines_detects_quantity_change() {
        let a = CartSnapshot {
            lines: vec![line("a", 1)],
            ..Default::default()
        };
        let b = CartSnapshot {
            lines: vec![line("a", 3)],
            ..Default::default()
        };
        assert!(!a.same_lines(&b));
    }

    #[test]
    fn test_same_lines_detects_extra_line() {
        let a = CartSnapshot {
            lines: vec![line("a", 1)],
            ..Default::default()
        };
        let b = CartSnapshot {
            lines: vec![line("a", 1), line("b", 1)],
            ..Default::default()
        };
        assert!(!a.same_lines(&b));
    }

    #[test]
    fn test_same_lines_duplicate_lines() {
        // Two identical lines on one side must not match a single line
        let a = CartSnapshot {
            lines: vec![line("a", 1), line("a", 1)],
            ..Default::default()
        };
        let b = CartSnapshot {
            lines: vec![line("a", 1)],
            ..Default::default()
        };
        assert!(!a.same_lines(&b));
    }
}
