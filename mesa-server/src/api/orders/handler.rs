//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::orders::{GroupedOrder, advance_to, apply_transition, group_orders_by_table, payment,
    role_view_for};
use crate::pricing::effective_price;
use crate::sessions::session_key;
use crate::store::StoreError;
use crate::utils::token::require_active_token;
use shared::message::FeedEventKind;
use shared::models::{
    NotificationAudience, NotificationKind, Order, OrderCreate, OrderItem, OrderStatus,
    PaymentInput, StatusUpdate, TableChange,
};
use shared::{AppError, AppResult, ErrorCode};

// ============================================================================
// Placement
// ============================================================================

/// POST /api/orders - 下单 (顾客扫码 或 员工手工录入)
///
/// 价格快照在服务端生成：客户端只提交菜品 ID 和数量，单价按
/// 当前折扣窗口解析并固化到订单里，之后菜单改价不影响已下单据。
pub async fn place_order(
    State(state): State<ServerState>,
    headers: http::HeaderMap,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    // 门禁：顾客带令牌，员工凭登录态。
    // 本路由对顾客开放 (认证中间件放行)，员工手工录入的 JWT 在
    // 这里自行校验。
    let qr_digest = match &payload.token {
        Some(token) => {
            let record = require_active_token(&state.store, token)?;
            if record.restaurant_id != payload.restaurant_id
                || record.table_number != payload.table_number
            {
                return Err(AppError::validation("Token does not match restaurant/table"));
            }
            Some(record.digest)
        }
        None => {
            let staff = staff_from_headers(&state, &headers)?;
            if staff.restaurant_id != payload.restaurant_id {
                return Err(AppError::forbidden("Wrong restaurant"));
            }
            None
        }
    };

    let restaurant = state
        .store
        .get_restaurant(&payload.restaurant_id)
        .map_err(AppError::from)?
        .filter(|r| r.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    // 逐项解析菜品并生成价格快照
    let now = crate::utils::now_millis();
    let mut items: Vec<OrderItem> = Vec::with_capacity(payload.items.len());
    for input in &payload.items {
        if input.quantity <= 0 {
            return Err(AppError::validation("Item quantity must be positive"));
        }
        let menu_item = state
            .store
            .get_menu_item(&input.item_id)
            .map_err(AppError::from)?
            .filter(|i| i.restaurant_id == restaurant.id)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::MenuItemNotFound,
                    format!("Menu item {} not found", input.item_id),
                )
            })?;
        if !menu_item.is_available {
            return Err(AppError::with_message(
                ErrorCode::MenuItemUnavailable,
                format!("{} is currently unavailable", menu_item.name),
            ));
        }
        let category = state
            .store
            .get_category(&menu_item.category_id)
            .map_err(AppError::from)?;
        items.push(OrderItem {
            item_id: menu_item.id.clone(),
            name: menu_item.name.clone(),
            price: effective_price(&menu_item, category.as_ref(), now),
            quantity: input.quantity,
            note: input.note.clone(),
            kitchen_station: menu_item.kitchen_station.clone(),
        });
    }

    let tz = state
        .store
        .restaurant_timezone(&restaurant.id, state.config.timezone);
    let order = Order {
        id: uuid::Uuid::new_v4().to_string(),
        restaurant_id: restaurant.id.clone(),
        table_number: payload.table_number,
        status: OrderStatus::Pending,
        total_amount: items.iter().map(|i| i.line_total()).sum(),
        paid_amount: 0.0,
        items,
        payments: vec![],
        note: payload.note,
        qr_token: qr_digest.clone(),
        bill_requested: false,
        receipt_number: state.store.next_receipt_number(&restaurant.id, tz),
        created_at: now,
        updated_at: now,
    };
    state.store.insert_order(&order).map_err(AppError::from)?;

    // 下单完成：清空共享购物车，通知厨房/收银，推事件
    if let Some(digest) = &qr_digest {
        let key = session_key(&restaurant.id, order.table_number, digest);
        state.sessions.clear_cart(&key, now);
    }
    state.notify(
        &restaurant.id,
        NotificationAudience::Kitchen,
        NotificationKind::NewOrder,
        order.table_number,
        Some(serde_json::json!({ "order_id": order.id })),
    );
    state.notify(
        &restaurant.id,
        NotificationAudience::Cashier,
        NotificationKind::NewOrder,
        order.table_number,
        Some(serde_json::json!({
            "order_id": order.id,
            "total_amount": order.total_amount,
        })),
    );
    state
        .events
        .publish(FeedEventKind::NewOrder, &restaurant.id, &order.id, Some(&order));

    tracing::info!(
        order_id = %order.id,
        table_number = order.table_number,
        total = order.total_amount,
        "Order placed"
    );
    Ok(Json(order))
}

// ============================================================================
// Reads
// ============================================================================

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub table_number: Option<i32>,
    pub status: Option<OrderStatus>,
    /// true = 只要未终结的订单
    #[serde(default)]
    pub active: bool,
}

/// GET /api/orders - 本餐厅订单列表
pub async fn list(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .store
        .list_orders(&staff.restaurant_id, |o| {
            query.table_number.is_none_or(|t| o.table_number == t)
                && query.status.is_none_or(|s| o.status == s)
                && (!query.active || !o.status.is_terminal())
        })
        .map_err(AppError::from)?;
    Ok(Json(orders))
}

/// GET /api/orders/grouped - 厨房并桌视图
pub async fn list_grouped(
    State(state): State<ServerState>,
    staff: CurrentStaff,
) -> AppResult<Json<Vec<GroupedOrder>>> {
    let active = state
        .store
        .list_orders(&staff.restaurant_id, |o| !o.status.is_terminal())
        .map_err(AppError::from)?;
    Ok(Json(group_orders_by_table(&active)))
}

/// GET /api/orders/:id - 单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = owned_order(&state, &staff.restaurant_id, &id)?;
    Ok(Json(order))
}

// ============================================================================
// Status transitions
// ============================================================================

/// PUT /api/orders/:id/status - 单笔状态流转
///
/// 允许的流转由员工角色对应的视图决定。
pub async fn update_status(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    owned_order(&state, &staff.restaurant_id, &id)?;
    let view = role_view_for(staff.role);

    let order = state
        .store
        .update_order(&id, |o| {
            apply_transition(o, payload.status, view).map_err(StoreError::from)
        })
        .map_err(AppError::from)?;

    if order.status == OrderStatus::Paid {
        settle_side_effects(&state, &order);
    }
    state.events.publish(
        FeedEventKind::OrderUpdated,
        &order.restaurant_id,
        &order.id,
        Some(&order),
    );
    Ok(Json(order))
}

/// PUT /api/orders/:id/table - 换桌 (服务员操作，非状态流转)
pub async fn change_table(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<TableChange>,
) -> AppResult<Json<Order>> {
    if payload.table_number <= 0 {
        return Err(AppError::validation("Table number must be positive"));
    }
    let before = owned_order(&state, &staff.restaurant_id, &id)?;
    if before.status.is_terminal() {
        return Err(AppError::invalid("Cannot move a settled order"));
    }
    let from_table = before.table_number;

    let order = state
        .store
        .update_order(&id, |o| {
            o.table_number = payload.table_number;
            Ok(())
        })
        .map_err(AppError::from)?;

    state.notify(
        &order.restaurant_id,
        NotificationAudience::Cashier,
        NotificationKind::TableTransferred,
        order.table_number,
        Some(serde_json::json!({
            "order_id": order.id,
            "from_table": from_table,
            "to_table": order.table_number,
        })),
    );
    state.events.publish(
        FeedEventKind::OrderUpdated,
        &order.restaurant_id,
        &order.id,
        Some(&order),
    );
    Ok(Json(order))
}

/// 并桌扇出的单笔结果
#[derive(Debug, Serialize)]
pub struct FanoutResult {
    pub order_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 并桌扇出响应
#[derive(Debug, Serialize)]
pub struct FanoutResponse {
    pub table_number: i32,
    pub results: Vec<FanoutResult>,
}

/// PUT /api/orders/table/:table_number/status - 并桌状态扇出
///
/// 对桌台的每一笔活跃订单分别应用目标状态 (落后的成员逐级前进)。
/// 扇出不保证原子性：单笔失败不回滚其他成员，逐笔结果原样返回，
/// 由下一轮轮询/SSE 收敛各端视图。
pub async fn update_table_status(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(table_number): Path<i32>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<FanoutResponse>> {
    let view = role_view_for(staff.role);
    let members = state
        .store
        .active_orders_for_table(&staff.restaurant_id, table_number)
        .map_err(AppError::from)?;
    if members.is_empty() {
        return Err(AppError::not_found(format!("orders for table {}", table_number)));
    }

    let mut results = Vec::with_capacity(members.len());
    for member in &members {
        let outcome = state
            .store
            .update_order(&member.id, |o| {
                advance_to(o, payload.status, view).map_err(StoreError::from)
            })
            .map_err(AppError::from);

        match outcome {
            Ok(order) => {
                if order.status == OrderStatus::Paid {
                    settle_side_effects(&state, &order);
                }
                state.events.publish(
                    FeedEventKind::OrderUpdated,
                    &order.restaurant_id,
                    &order.id,
                    Some(&order),
                );
                results.push(FanoutResult {
                    order_id: member.id.clone(),
                    success: true,
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!(
                    order_id = %member.id,
                    table_number,
                    error = %e,
                    "Grouped status fan-out failed for member order"
                );
                results.push(FanoutResult {
                    order_id: member.id.clone(),
                    success: false,
                    error: Some(e.message.clone()),
                });
            }
        }
    }

    Ok(Json(FanoutResponse {
        table_number,
        results,
    }))
}

// ============================================================================
// Payments
// ============================================================================

/// POST /api/orders/:id/payments - 收款 (单笔或拆分)
///
/// 余额归零时订单自动转 PAID 并触发结账副作用 (令牌失效、会话
/// 回收、收银通知)。
pub async fn add_payment(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<PaymentInput>,
) -> AppResult<Json<Order>> {
    owned_order(&state, &staff.restaurant_id, &id)?;
    let now = crate::utils::now_millis();

    let order = state
        .store
        .update_order(&id, |o| {
            payment::add_payment(o, payload, now)
                .map(|_| ())
                .map_err(StoreError::from)
        })
        .map_err(AppError::from)?;

    if order.status == OrderStatus::Paid {
        settle_side_effects(&state, &order);
    }
    state.events.publish(
        FeedEventKind::OrderUpdated,
        &order.restaurant_id,
        &order.id,
        Some(&order),
    );
    Ok(Json(order))
}

/// POST /api/orders/:id/settle - 结清校验
///
/// 余额未清零时拒绝，防止拆分支付半途标记完成。
pub async fn settle(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    owned_order(&state, &staff.restaurant_id, &id)?;

    let order = state
        .store
        .update_order(&id, |o| {
            payment::complete_payment(o).map_err(StoreError::from)
        })
        .map_err(AppError::from)?;

    settle_side_effects(&state, &order);
    state.events.publish(
        FeedEventKind::OrderUpdated,
        &order.restaurant_id,
        &order.id,
        Some(&order),
    );
    Ok(Json(order))
}

// ============================================================================
// Bill request (customer side)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BillRequestPayload {
    pub token: String,
}

/// POST /api/orders/:id/bill-request - 顾客请求买单
///
/// 打开收银台对 PENDING 订单的直接结账通道，并给收银面板投递
/// 买单通知。
pub async fn bill_request(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BillRequestPayload>,
) -> AppResult<Json<Order>> {
    let token = require_active_token(&state.store, &payload.token)?;

    let existing = state
        .store
        .get_order(&id)
        .map_err(AppError::from)?
        .filter(|o| o.qr_token.as_deref() == Some(token.digest.as_str()))
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    if existing.status.is_terminal() {
        return Err(AppError::new(ErrorCode::OrderAlreadyPaid));
    }

    let order = state
        .store
        .update_order(&id, |o| {
            o.bill_requested = true;
            Ok(())
        })
        .map_err(AppError::from)?;

    state.notify(
        &order.restaurant_id,
        NotificationAudience::Cashier,
        NotificationKind::BillRequest,
        order.table_number,
        Some(serde_json::json!({
            "order_id": order.id,
            "total_amount": order.total_amount,
            "remaining_amount": order.remaining_amount(),
        })),
    );
    state.events.publish(
        FeedEventKind::OrderUpdated,
        &order.restaurant_id,
        &order.id,
        Some(&order),
    );
    Ok(Json(order))
}

// ============================================================================
// Deletion
// ============================================================================

/// DELETE /api/orders/:id - 硬删除 (厨房清理)
///
/// 与 `/api/orders/{id}` 的 GET 共享路径，权限在此检查。
pub async fn delete_order(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    if !staff.has_permission("orders:delete") {
        return Err(AppError::forbidden("Permission denied: orders:delete"));
    }
    let order = owned_order(&state, &staff.restaurant_id, &id)?;

    let deleted = state.store.delete_order(&id).map_err(AppError::from)?;
    if deleted {
        state.events.publish::<()>(
            FeedEventKind::OrderDeleted,
            &order.restaurant_id,
            &order.id,
            None,
        );
        tracing::info!(order_id = %id, staff = %staff.username, "Order hard-deleted");
    }
    Ok(Json(deleted))
}

/// 并桌删除响应
#[derive(Debug, Serialize)]
pub struct TableDeleteResponse {
    pub table_number: i32,
    pub deleted_order_ids: Vec<String>,
}

/// DELETE /api/orders/table/:table_number - 删除桌台全部活跃订单
pub async fn delete_table_orders(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(table_number): Path<i32>,
) -> AppResult<Json<TableDeleteResponse>> {
    let members = state
        .store
        .active_orders_for_table(&staff.restaurant_id, table_number)
        .map_err(AppError::from)?;

    let mut deleted_order_ids = Vec::with_capacity(members.len());
    for member in members {
        if state.store.delete_order(&member.id).map_err(AppError::from)? {
            state.events.publish::<()>(
                FeedEventKind::OrderDeleted,
                &member.restaurant_id,
                &member.id,
                None,
            );
            deleted_order_ids.push(member.id);
        }
    }

    tracing::info!(
        table_number,
        count = deleted_order_ids.len(),
        staff = %staff.username,
        "Table orders hard-deleted"
    );
    Ok(Json(TableDeleteResponse {
        table_number,
        deleted_order_ids,
    }))
}

// ============================================================================
// Helpers
// ============================================================================

/// 从 Authorization 头校验员工身份 (仅无令牌的手工录入路径)
fn staff_from_headers(state: &ServerState, headers: &http::HeaderMap) -> AppResult<CurrentStaff> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(AppError::unauthorized)?;
    let token = crate::auth::JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;
    let claims = state
        .jwt_service
        .validate_token(token)
        .map_err(|_| AppError::invalid_token("Invalid token"))?;
    CurrentStaff::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))
}

fn owned_order(state: &ServerState, restaurant_id: &str, id: &str) -> AppResult<Order> {
    state
        .store
        .get_order(id)
        .map_err(AppError::from)?
        .filter(|o| o.restaurant_id == restaurant_id)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
}

/// 结账副作用：令牌失效、会话回收、收银通知
///
/// 令牌失效使顾客菜单回到只读 - 新一轮就餐要重新扫码。
fn settle_side_effects(state: &ServerState, order: &Order) {
    if let Some(digest) = &order.qr_token {
        match state.store.deactivate_token(digest) {
            Ok(_) => {
                let dropped = state.sessions.drop_for_token(digest);
                tracing::info!(
                    order_id = %order.id,
                    sessions_dropped = dropped,
                    "QR token deactivated after payment"
                );
            }
            Err(e) => {
                tracing::error!(order_id = %order.id, error = %e, "Failed to deactivate QR token");
            }
        }
    }
    state.notify(
        &order.restaurant_id,
        NotificationAudience::Cashier,
        NotificationKind::PaymentCompleted,
        order.table_number,
        Some(serde_json::json!({
            "order_id": order.id,
            "total_amount": order.total_amount,
        })),
    );
}
