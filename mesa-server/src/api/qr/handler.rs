//! QR Token API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::token::{generate_token, token_digest};
use shared::models::{QrGenerate, QrGenerated, QrToken, QrVerification};
use shared::{AppError, AppResult, ErrorCode};

/// POST /api/qr/generate - 为桌台签发新令牌
///
/// 同桌旧令牌一并失效：新令牌意味着新的一轮就餐，旧会话的
/// 购物车随之作废。
pub async fn generate(
    State(state): State<ServerState>,
    Json(payload): Json<QrGenerate>,
) -> AppResult<Json<QrGenerated>> {
    if payload.table_number <= 0 {
        return Err(AppError::validation("Table number must be positive"));
    }
    let restaurant = state
        .store
        .get_restaurant(&payload.restaurant_id)
        .map_err(AppError::from)?
        .filter(|r| r.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    // 旧令牌失效，对应的会话直接丢弃
    let superseded = state
        .store
        .deactivate_tokens_for_table(&restaurant.id, payload.table_number)
        .map_err(AppError::from)?;
    if superseded > 0 {
        tracing::info!(
            restaurant_id = %restaurant.id,
            table_number = payload.table_number,
            superseded,
            "Superseded previous QR tokens for table"
        );
    }

    let plain = generate_token();
    let now = crate::utils::now_millis();
    let record = QrToken {
        digest: token_digest(&plain),
        restaurant_id: restaurant.id.clone(),
        table_number: payload.table_number,
        is_active: true,
        issued_at: now,
        expires_at: now + state.config.qr_token_ttl_minutes * 60_000,
    };
    state.store.insert_token(&record).map_err(AppError::from)?;

    Ok(Json(QrGenerated {
        token: plain,
        restaurant_id: record.restaurant_id,
        table_number: record.table_number,
        expires_at: record.expires_at,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

/// GET /api/qr/verify?token= - 验证令牌
///
/// 未知/过期/失效的令牌统一返回 `is_active=false` 而不是错误，
/// 响应里的桌号是权威值，覆盖 URL 里带的桌号。
pub async fn verify(
    State(state): State<ServerState>,
    Query(query): Query<VerifyQuery>,
) -> AppResult<Json<QrVerification>> {
    let digest = token_digest(&query.token);
    let Some(record) = state.store.find_token(&digest).map_err(AppError::from)? else {
        return Ok(Json(QrVerification::inactive()));
    };

    let now = crate::utils::now_millis();
    if record.is_active && now >= record.expires_at {
        // 过期的令牌顺手失效落库
        let _ = state.store.deactivate_token(&digest);
        return Ok(Json(QrVerification {
            is_active: false,
            restaurant_id: Some(record.restaurant_id),
            table_number: Some(record.table_number),
            expires_at: Some(record.expires_at),
        }));
    }

    Ok(Json(QrVerification {
        is_active: record.is_active,
        restaurant_id: Some(record.restaurant_id),
        table_number: Some(record.table_number),
        expires_at: Some(record.expires_at),
    }))
}
