//! 员工认证接口

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    // 登录接口公开，其余接口由全局认证中间件保护
    Router::new().route("/api/auth/login", post(handler::login))
}
