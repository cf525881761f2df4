//! 购物车收敛策略
//!
//! 多台设备并发写同一购物车时的收敛规则被抽成显式策略对象，
//! 便于单测和替换 (例如将来换成逐项合并)。

use shared::session::{CartLine, CartSnapshot};

/// 收敛策略 - 决定一次写入如何落到存储的快照上
pub trait ConvergencePolicy: Send + Sync + std::fmt::Debug {
    /// 将 `incoming` 写入应用到 `current`，返回新的快照
    fn merge(&self, current: &CartSnapshot, incoming: Vec<CartLine>, now: i64) -> CartSnapshot;
}

/// Last-write-wins: 整车替换，后写覆盖先写
///
/// 同桌多部手机并发编辑时可能丢失较早的修改，换来的是实现
/// 和客户端对账逻辑的简单。
#[derive(Debug, Default, Clone, Copy)]
pub struct LastWriteWins;

impl ConvergencePolicy for LastWriteWins {
    fn merge(&self, current: &CartSnapshot, incoming: Vec<CartLine>, now: i64) -> CartSnapshot {
        CartSnapshot {
            lines: incoming,
            version: current.version + 1,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, qty: i32) -> CartLine {
        CartLine {
            item_id: id.to_string(),
            name: id.to_string(),
            price: 2.0,
            quantity: qty,
            note: None,
        }
    }

    #[test]
    fn test_last_write_wins_replaces_wholesale() {
        let policy = LastWriteWins;
        let current = CartSnapshot {
            lines: vec![line("a", 1), line("b", 2)],
            version: 3,
            updated_at: 100,
        };

        let merged = policy.merge(&current, vec![line("c", 1)], 200);
        assert_eq!(merged.lines, vec![line("c", 1)]);
        assert_eq!(merged.version, 4);
        assert_eq!(merged.updated_at, 200);
    }
}
