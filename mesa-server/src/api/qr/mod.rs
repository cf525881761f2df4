//! QR Token API 模块
//!
//! 顾客扫码链路公开：扫码页在没有令牌时会走 generate 兜底，
//! 验证失败只会让菜单退化为只读。

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/qr/generate", post(handler::generate))
        .route("/api/qr/verify", get(handler::verify))
}
