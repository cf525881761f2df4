//! Menu API 模块
//!
//! 菜品 CRUD 走 `menu:manage`；售罄切换是厨房的侧信道操作，
//! 单独的 `menu:availability` 权限。

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let manage_routes = Router::new()
        .route("/api/menu/items", get(handler::list).post(handler::create))
        .route(
            "/api/menu/items/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn(require_permission("menu:manage")));

    let availability_routes = Router::new()
        .route(
            "/api/menu/items/{id}/availability",
            put(handler::set_availability),
        )
        .layer(middleware::from_fn(require_permission("menu:availability")));

    manage_routes.merge(availability_routes)
}
