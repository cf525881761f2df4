//! Auth API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::verify_password;
use crate::core::ServerState;
use shared::models::StaffResponse;
use shared::{AppError, AppResult};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub staff: StaffResponse,
}

/// POST /api/auth/login - 员工登录
///
/// 用户名不存在与密码错误返回同一个错误，防止用户名枚举。
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let staff = state
        .store
        .find_staff_by_username(&payload.username)
        .map_err(AppError::from)?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&payload.password, &staff.password_hash) {
        return Err(AppError::invalid_credentials());
    }

    if !staff.is_active {
        return Err(AppError::new(shared::ErrorCode::AccountDisabled));
    }

    let token = state
        .jwt_service
        .generate_token(
            &staff.id,
            &staff.username,
            &staff.name,
            staff.role,
            &staff.restaurant_id,
            &staff.permissions,
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(staff_id = %staff.id, username = %staff.username, "Staff logged in");

    Ok(Json(LoginResponse {
        token,
        staff: staff.into(),
    }))
}
