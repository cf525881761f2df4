//! Restaurant API 模块
//!
//! 公开查询 (子域名解析 + 顾客菜单) 和管理接口。

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new()
        .route(
            "/api/public/restaurants/{subdomain}",
            get(handler::get_by_subdomain),
        )
        .route("/api/public/menu/{restaurant_id}", get(handler::public_menu));

    let manage_routes = Router::new()
        .route("/api/restaurants", post(handler::create))
        .route("/api/restaurants/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permission("staff:manage")));

    public_routes.merge(manage_routes)
}
