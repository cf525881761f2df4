//! Notification API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/notifications", get(handler::pending))
        .route("/api/notifications/{id}/ack", post(handler::ack))
}
