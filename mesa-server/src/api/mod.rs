//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 员工认证接口
//! - [`restaurants`] - 餐厅接口 (公开查询 + 管理)
//! - [`categories`] - 分类管理接口
//! - [`menu`] - 菜单管理接口
//! - [`qr`] - 桌台二维码接口
//! - [`sessions`] - 桌台会话接口
//! - [`orders`] - 订单接口
//! - [`staff`] - 员工管理接口
//! - [`notifications`] - 通知邮箱接口
//! - [`reports`] - 报表接口
//! - [`events`] - SSE 事件流

pub mod auth;
pub mod categories;
pub mod events;
pub mod health;
pub mod menu;
pub mod notifications;
pub mod orders;
pub mod qr;
pub mod reports;
pub mod restaurants;
pub mod sessions;
pub mod staff;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

// Re-export common types for handlers
pub use shared::{ApiResponse, AppError, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(restaurants::router())
        .merge(categories::router())
        .merge(menu::router())
        .merge(qr::router())
        .merge(sessions::router())
        .merge(orders::router())
        .merge(notifications::router())
        .merge(reports::router())
        .merge(staff::router())
        .merge(events::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Staff JWT authentication - injects CurrentStaff for protected routes
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
