//! Order API 模块
//!
//! 顾客下单和买单请求由二维码令牌门禁 (认证中间件直接放行，
//! handler 内校验令牌)；员工侧操作按权限分层。
//!
//! `/api/orders` 和 `/api/orders/{id}` 同一路径上混合了公开与
//! 受限方法，无法整组挂权限中间件 - 这两处的权限在 handler 内
//! 检查，其余路由按组分层。

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    // 混合方法路径：POST 下单对顾客开放，GET 读取要求员工登录，
    // DELETE 在 handler 内检查 orders:delete
    let mixed_routes = Router::new()
        .route(
            "/api/orders",
            post(handler::place_order).get(handler::list),
        )
        .route(
            "/api/orders/{id}",
            get(handler::get_by_id).delete(handler::delete_order),
        )
        .route("/api/orders/{id}/bill-request", post(handler::bill_request))
        .route("/api/orders/grouped", get(handler::list_grouped));

    // 状态流转 (单笔 + 并桌扇出)
    let update_routes = Router::new()
        .route("/api/orders/{id}/status", put(handler::update_status))
        .route("/api/orders/{id}/table", put(handler::change_table))
        .route(
            "/api/orders/table/{table_number}/status",
            put(handler::update_table_status),
        )
        .layer(middleware::from_fn(require_permission("orders:update")));

    // 收款
    let settle_routes = Router::new()
        .route("/api/orders/{id}/payments", post(handler::add_payment))
        .route("/api/orders/{id}/settle", post(handler::settle))
        .layer(middleware::from_fn(require_permission("orders:settle")));

    // 并桌硬删除 (厨房清理，区别于取消)
    let delete_routes = Router::new()
        .route(
            "/api/orders/table/{table_number}",
            axum::routing::delete(handler::delete_table_orders),
        )
        .layer(middleware::from_fn(require_permission("orders:delete")));

    mixed_routes
        .merge(update_routes)
        .merge(settle_routes)
        .merge(delete_routes)
}
