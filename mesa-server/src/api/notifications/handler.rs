//! Notification API Handlers
//!
//! 轮询端每次取回全部未确认消息；确认后不再投递。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use shared::models::{Notification, NotificationAudience};
use shared::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    pub audience: NotificationAudience,
}

/// GET /api/notifications?audience= - 未确认通知 (at-least-once)
pub async fn pending(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Query(query): Query<PendingQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    Ok(Json(
        state.mailbox.pending(&staff.restaurant_id, query.audience),
    ))
}

/// POST /api/notifications/:id/ack - 确认通知
pub async fn ack(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let existed = state.mailbox.ack(&staff.restaurant_id, &id);
    if !existed {
        return Err(AppError::not_found(format!("notification {}", id)));
    }
    Ok(Json(true))
}
