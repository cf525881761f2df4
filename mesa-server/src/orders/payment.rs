//! 支付台账 - 单笔与拆分支付
//!
//! 不变量: Σ payments + remaining == total。每笔支付在入账前校验
//! 不超过剩余余额；余额归零时订单自动转为 PAID。

use std::collections::HashMap;

use shared::models::{Order, OrderStatus, PaymentInput, PaymentRecord};
use shared::{AppError, AppResult, ErrorCode};

/// 金额比较容差 (浮点累加误差)
const AMOUNT_EPSILON: f64 = 0.005;

/// 入账一笔支付 (单笔支付 = 金额等于全额的一笔)
///
/// # 校验
///
/// 1. 订单非终态
/// 2. 金额为正且不超过剩余余额
/// 3. 按菜品拆分时，各菜品支付数量不超过未支付数量
///
/// 余额归零时订单状态自动流转为 PAID。
pub fn add_payment(order: &mut Order, input: PaymentInput, now: i64) -> AppResult<PaymentRecord> {
    if order.status == OrderStatus::Paid {
        return Err(AppError::new(ErrorCode::OrderAlreadyPaid));
    }
    if order.status == OrderStatus::Cancelled {
        return Err(AppError::new(ErrorCode::OrderAlreadyCancelled));
    }

    if input.method.trim().is_empty() {
        return Err(AppError::new(ErrorCode::PaymentInvalidMethod));
    }
    if input.amount <= 0.0 {
        return Err(AppError::validation("Payment amount must be positive"));
    }

    let remaining = order.remaining_amount();
    if input.amount > remaining + AMOUNT_EPSILON {
        return Err(AppError::with_message(
            ErrorCode::PaymentExceedsRemaining,
            format!(
                "Payment {:.2} exceeds remaining balance {:.2}",
                input.amount, remaining
            ),
        ));
    }

    if let Some(items) = &input.items {
        let unpaid = unpaid_quantities(order);
        for paid_item in items {
            if paid_item.quantity <= 0 {
                return Err(AppError::validation("Paid item quantity must be positive"));
            }
            let available = unpaid.get(paid_item.item_id.as_str()).copied().unwrap_or(0);
            if paid_item.quantity > available {
                return Err(AppError::validation(format!(
                    "Item {} has only {} unpaid units",
                    paid_item.item_id, available
                )));
            }
        }
    }

    let record = PaymentRecord {
        payment_id: uuid::Uuid::new_v4().to_string(),
        method: input.method,
        amount: input.amount,
        items: input.items,
        timestamp: now,
    };
    order.payments.push(record.clone());
    order.paid_amount += record.amount;

    if order.is_fully_paid() {
        order.paid_amount = order.total_amount; // absorb float drift
        order.status = OrderStatus::Paid;
    }

    Ok(record)
}

/// 结清校验 - 余额未清零时拒绝强制完成
pub fn complete_payment(order: &mut Order) -> AppResult<()> {
    if order.status == OrderStatus::Paid {
        return Err(AppError::new(ErrorCode::OrderAlreadyPaid));
    }
    if !order.is_fully_paid() {
        return Err(AppError::new(ErrorCode::PaymentIncomplete));
    }
    order.status = OrderStatus::Paid;
    Ok(())
}

/// 各菜品未支付数量 (按拆分支付记录累减)
fn unpaid_quantities(order: &Order) -> HashMap<&str, i32> {
    let mut quantities: HashMap<&str, i32> = HashMap::new();
    for item in &order.items {
        *quantities.entry(item.item_id.as_str()).or_insert(0) += item.quantity;
    }
    for payment in &order.payments {
        if let Some(items) = &payment.items {
            for paid in items {
                if let Some(q) = quantities.get_mut(paid.item_id.as_str()) {
                    *q -= paid.quantity;
                }
            }
        }
    }
    quantities
}
