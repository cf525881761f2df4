//! Reports API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/reports", get(handler::reports))
        .layer(middleware::from_fn(require_permission("reports:view")))
}
