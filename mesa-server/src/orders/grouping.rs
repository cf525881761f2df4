//! 厨房并桌聚合
//!
//! 同一桌台的多笔订单在厨房视图合并为一张卡片。聚合订单是纯展示
//! 构造 - 对它的操作会扇出到每一笔底层订单。

use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderItem, OrderStatus};
use std::collections::BTreeMap;

/// 并桌聚合订单 (合成视图，非存储实体)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedOrder {
    /// 合成 ID: `table-{n}-grouped`
    pub id: String,
    pub table_number: i32,
    /// 底层真实订单 ID (扇出操作的目标)
    pub order_ids: Vec<String>,
    /// 所有底层订单菜品的串联
    pub items: Vec<OrderItem>,
    /// 组内最紧急的成员状态
    pub status: OrderStatus,
    /// 底层订单总额之和
    pub total_amount: f64,
    /// 最早下单时间
    pub created_at: i64,
}

/// 按桌台聚合订单
///
/// 组状态取成员中 [`OrderStatus::group_priority`] 最高者
/// (PENDING > PREPARING > READY > DELIVERED > CANCELLED)。
/// 输出按桌号排序；组内保持传入顺序。
pub fn group_orders_by_table(orders: &[Order]) -> Vec<GroupedOrder> {
    let mut by_table: BTreeMap<i32, Vec<&Order>> = BTreeMap::new();
    for order in orders {
        by_table.entry(order.table_number).or_default().push(order);
    }

    by_table
        .into_iter()
        .map(|(table_number, members)| {
            let status = members
                .iter()
                .map(|o| o.status)
                .max_by_key(|s| s.group_priority())
                .unwrap_or_default();
            GroupedOrder {
                id: format!("table-{}-grouped", table_number),
                table_number,
                order_ids: members.iter().map(|o| o.id.clone()).collect(),
                items: members.iter().flat_map(|o| o.items.clone()).collect(),
                status,
                total_amount: members.iter().map(|o| o.total_amount).sum(),
                created_at: members.iter().map(|o| o.created_at).min().unwrap_or(0),
            }
        })
        .collect()
}

impl GroupedOrder {
    /// 组内菜品总件数
    pub fn total_units(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
