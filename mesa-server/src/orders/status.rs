//! 订单状态机 - 角色视图限定
//!
//! [`OrderStatus::can_transition`] 定义与角色无关的合法流转；
//! 每个面板只暴露其中一个子集：
//!
//! | 视图 | 允许的流转 |
//! |------|-----------|
//! | Kitchen | PENDING→PREPARING, PREPARING→READY |
//! | Cashier | READY/DELIVERED→PAID, 已请求买单的 PENDING→PAID |
//! | Waiter  | PENDING→PREPARING→READY→DELIVERED, 取消 |
//! | Full (manager/admin) | 任何合法流转 |

use shared::models::{Order, OrderStatus, StaffRole};
use shared::{AppError, AppResult, ErrorCode};

/// 角色视图 - 每个面板允许的状态流转子集
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleView {
    Kitchen,
    Cashier,
    Waiter,
    /// 不加角色限制 (经理/管理员)，仍受状态机约束
    Full,
}

/// 员工角色对应的订单视图
pub fn role_view_for(role: StaffRole) -> RoleView {
    match role {
        StaffRole::Chef => RoleView::Kitchen,
        StaffRole::Cashier => RoleView::Cashier,
        StaffRole::Waiter => RoleView::Waiter,
        StaffRole::Manager | StaffRole::Admin => RoleView::Full,
    }
}

impl RoleView {
    /// 本视图是否允许 `from -> to`
    ///
    /// `bill_requested` 打开收银台对 PENDING 订单的直接结账通道。
    pub fn allows(&self, from: OrderStatus, to: OrderStatus, bill_requested: bool) -> bool {
        use OrderStatus::*;
        match self {
            RoleView::Full => true,
            RoleView::Kitchen => matches!((from, to), (Pending, Preparing) | (Preparing, Ready)),
            RoleView::Cashier => match (from, to) {
                (Ready, Paid) | (Delivered, Paid) => true,
                (Pending, Paid) => bill_requested,
                _ => false,
            },
            RoleView::Waiter => matches!(
                (from, to),
                (Pending, Preparing) | (Preparing, Ready) | (Ready, Delivered)
            ) || to == Cancelled,
        }
    }
}

/// 校验并应用一次状态流转
///
/// 先检查状态机合法性，再检查角色视图限制。直接流转到 PAID 还要求
/// 余额已清零 - 收款走 [`super::payment::add_payment`]，余额归零时
/// 自动转为 PAID。
pub fn apply_transition(order: &mut Order, to: OrderStatus, view: RoleView) -> AppResult<()> {
    let from = order.status;

    if from == OrderStatus::Paid {
        return Err(AppError::new(ErrorCode::OrderAlreadyPaid));
    }
    if from == OrderStatus::Cancelled {
        return Err(AppError::new(ErrorCode::OrderAlreadyCancelled));
    }
    if !from.can_transition(to) {
        return Err(AppError::invalid_transition(from.as_str(), to.as_str()));
    }
    if !view.allows(from, to, order.bill_requested) {
        return Err(AppError::with_message(
            ErrorCode::TransitionNotAllowed,
            format!(
                "Transition {} -> {} not permitted for this view",
                from.as_str(),
                to.as_str()
            ),
        ));
    }
    if to == OrderStatus::Paid && !order.is_fully_paid() {
        return Err(AppError::new(ErrorCode::PaymentIncomplete));
    }

    order.status = to;
    Ok(())
}

/// 把订单推进到目标状态，必要时逐级前进
///
/// 并桌扇出用：组内成员状态不一 (如 PENDING + PREPARING 的组
/// 整体标记 READY) 时，落后的成员逐级走完中间状态，每一步都受
/// 状态机和角色视图约束。取消和单步流转不经过中间状态。
pub fn advance_to(order: &mut Order, target: OrderStatus, view: RoleView) -> AppResult<()> {
    if order.status == target {
        return Ok(());
    }
    if target == OrderStatus::Cancelled || order.status.can_transition(target) {
        return apply_transition(order, target, view);
    }
    if target.rank() <= order.status.rank() {
        // backward move - let apply_transition produce the right error
        return apply_transition(order, target, view);
    }

    while order.status != target {
        let next = match order.status {
            OrderStatus::Pending => OrderStatus::Preparing,
            OrderStatus::Preparing => OrderStatus::Ready,
            OrderStatus::Ready => OrderStatus::Delivered,
            _ => target,
        };
        apply_transition(order, next, view)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::orders::order_fixtures::{make_item, make_order};

    #[test]
    fn test_kitchen_view_transitions() {
        let view = RoleView::Kitchen;
        assert!(view.allows(OrderStatus::Pending, OrderStatus::Preparing, false));
        assert!(view.allows(OrderStatus::Preparing, OrderStatus::Ready, false));
        assert!(!view.allows(OrderStatus::Ready, OrderStatus::Delivered, false));
        assert!(!view.allows(OrderStatus::Pending, OrderStatus::Cancelled, false));
    }

    #[test]
    fn test_cashier_view_needs_bill_request_for_pending() {
        let view = RoleView::Cashier;
        assert!(view.allows(OrderStatus::Ready, OrderStatus::Paid, false));
        assert!(view.allows(OrderStatus::Delivered, OrderStatus::Paid, false));
        assert!(!view.allows(OrderStatus::Pending, OrderStatus::Paid, false));
        assert!(view.allows(OrderStatus::Pending, OrderStatus::Paid, true));
    }

    #[test]
    fn test_waiter_view_can_cancel() {
        let view = RoleView::Waiter;
        assert!(view.allows(OrderStatus::Pending, OrderStatus::Cancelled, false));
        assert!(view.allows(OrderStatus::Ready, OrderStatus::Delivered, false));
        assert!(!view.allows(OrderStatus::Delivered, OrderStatus::Paid, false));
    }

    #[test]
    fn test_apply_transition_happy_path() {
        let mut order = make_order("o1", 5, OrderStatus::Pending, vec![make_item("x", 10.0, 1)]);
        apply_transition(&mut order, OrderStatus::Preparing, RoleView::Kitchen).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
    }

    #[test]
    fn test_apply_transition_role_rejected() {
        let mut order = make_order("o1", 5, OrderStatus::Ready, vec![]);
        let err = apply_transition(&mut order, OrderStatus::Delivered, RoleView::Kitchen)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TransitionNotAllowed);
        // 乐观更新不落地：状态保持不变
        assert_eq!(order.status, OrderStatus::Ready);
    }

    #[test]
    fn test_apply_transition_machine_rejected() {
        let mut order = make_order("o1", 5, OrderStatus::Ready, vec![]);
        let err = apply_transition(&mut order, OrderStatus::Pending, RoleView::Full).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
    }

    #[test]
    fn test_paid_requires_zero_balance() {
        let mut order = make_order("o1", 5, OrderStatus::Ready, vec![make_item("x", 10.0, 2)]);
        let err = apply_transition(&mut order, OrderStatus::Paid, RoleView::Cashier).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentIncomplete);

        order.paid_amount = order.total_amount;
        apply_transition(&mut order, OrderStatus::Paid, RoleView::Cashier).unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[test]
    fn test_terminal_states_locked() {
        let mut order = make_order("o1", 5, OrderStatus::Paid, vec![]);
        let err = apply_transition(&mut order, OrderStatus::Cancelled, RoleView::Full).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAlreadyPaid);

        let mut cancelled = make_order("o2", 5, OrderStatus::Cancelled, vec![]);
        let err =
            apply_transition(&mut cancelled, OrderStatus::Pending, RoleView::Full).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAlreadyCancelled);
    }

    #[test]
    fn test_advance_to_steps_through_intermediate_states() {
        // Grouped "mark ready" on a still-PENDING member
        let mut order = make_order("o1", 5, OrderStatus::Pending, vec![make_item("x", 10.0, 2)]);
        advance_to(&mut order, OrderStatus::Ready, RoleView::Kitchen).unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
    }

    #[test]
    fn test_advance_to_noop_when_already_there() {
        let mut order = make_order("o1", 5, OrderStatus::Ready, vec![]);
        advance_to(&mut order, OrderStatus::Ready, RoleView::Kitchen).unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
    }

    #[test]
    fn test_advance_to_respects_role_limits() {
        // Kitchen cannot deliver, so READY is its ceiling
        let mut order = make_order("o1", 5, OrderStatus::Pending, vec![]);
        let err = advance_to(&mut order, OrderStatus::Delivered, RoleView::Kitchen).unwrap_err();
        assert_eq!(err.code, ErrorCode::TransitionNotAllowed);
    }

    #[test]
    fn test_advance_to_backward_rejected() {
        let mut order = make_order("o1", 5, OrderStatus::Ready, vec![]);
        let err = advance_to(&mut order, OrderStatus::Pending, RoleView::Full).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
    }

    #[test]
    fn test_role_view_mapping() {
        assert_eq!(role_view_for(StaffRole::Chef), RoleView::Kitchen);
        assert_eq!(role_view_for(StaffRole::Cashier), RoleView::Cashier);
        assert_eq!(role_view_for(StaffRole::Waiter), RoleView::Waiter);
        assert_eq!(role_view_for(StaffRole::Manager), RoleView::Full);
    }
}
