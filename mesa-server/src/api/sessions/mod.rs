//! Table Session API 模块
//!
//! 顾客侧接口，全部由二维码令牌门禁。

mod handler;

use axum::{Router, routing::get, routing::post, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/sessions/join", post(handler::join))
        .route("/api/sessions/{key}", get(handler::get))
        .route("/api/sessions/{key}/cart", put(handler::update_cart))
        .route("/api/sessions/{key}/leave", post(handler::leave))
}
