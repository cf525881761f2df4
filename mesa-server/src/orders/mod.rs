//! 订单域逻辑
//!
//! - [`status`] - 状态机与角色视图限定
//! - [`grouping`] - 厨房并桌聚合
//! - [`payment`] - 单笔/拆分支付台账

pub mod grouping;
pub mod payment;
pub mod status;

pub use grouping::{GroupedOrder, group_orders_by_table};
pub use payment::{add_payment, complete_payment};
pub use status::{RoleView, advance_to, apply_transition, role_view_for};
