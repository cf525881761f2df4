//! Table Session API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::token::require_active_token;
use shared::session::{CartSnapshot, CartUpdate, SessionJoin, SessionLeave, SessionView};
use shared::{AppError, AppResult, ErrorCode};

/// POST /api/sessions/join - 加入桌台会话
///
/// 令牌里的餐厅/桌号是权威值；请求携带的值必须一致，防止
/// 拿着 A 桌令牌加入 B 桌会话。
pub async fn join(
    State(state): State<ServerState>,
    Json(payload): Json<SessionJoin>,
) -> AppResult<Json<SessionView>> {
    let token = require_active_token(&state.store, &payload.token)?;

    if token.restaurant_id != payload.restaurant_id || token.table_number != payload.table_number {
        return Err(AppError::validation(
            "Token does not match restaurant/table",
        ));
    }

    let now = crate::utils::now_millis();
    let view = state.sessions.join(
        &token.restaurant_id,
        token.table_number,
        &token.digest,
        payload.client_id,
        now,
    );
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct GetQuery {
    pub client_id: String,
}

/// GET /api/sessions/:key?client_id= - 拉取会话状态 (轮询 pull 端)
pub async fn get(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> AppResult<Json<SessionView>> {
    let now = crate::utils::now_millis();
    let view = state.sessions.get(&key, &query.client_id, now)?;
    Ok(Json(view))
}

/// PUT /api/sessions/:key/cart - 整车写入 (防抖 push 端)
///
/// 写入前重新过一遍令牌门禁：结账后令牌失效，菜单随之只读，
/// 任何购物车变更都要被拒绝。
pub async fn update_cart(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    Json(payload): Json<CartUpdate>,
) -> AppResult<Json<CartSnapshot>> {
    gate_session_key(&state, &key)?;

    let now = crate::utils::now_millis();
    let cart = state
        .sessions
        .update_cart(&key, &payload.client_id, payload.lines, now)?;
    Ok(Json(cart))
}

/// POST /api/sessions/:key/leave - 离开会话
pub async fn leave(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    Json(payload): Json<SessionLeave>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.sessions.leave(&key, &payload.client_id)))
}

/// 会话键尾段是令牌摘要；据此复查门禁
fn gate_session_key(state: &ServerState, key: &str) -> AppResult<()> {
    let digest = key
        .rsplit(':')
        .next()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound))?;

    let record = state
        .store
        .find_token(digest)
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::QrTokenNotFound))?;

    if !record.is_valid_at(crate::utils::now_millis()) {
        return Err(AppError::qr_token_inactive());
    }
    Ok(())
}
