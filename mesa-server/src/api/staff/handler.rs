//! Staff API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use validator::Validate;

use crate::auth::{CurrentStaff, default_permissions, hash_password, is_valid_permission};
use crate::core::ServerState;
use shared::models::{Staff, StaffCreate, StaffResponse, StaffUpdate};
use shared::{AppError, AppResult, ErrorCode};

fn validate_permissions(perms: &[String]) -> AppResult<()> {
    for p in perms {
        if !is_valid_permission(p) {
            return Err(AppError::validation(format!("Unknown permission: {}", p)));
        }
    }
    Ok(())
}

/// GET /api/staff - 本餐厅员工列表
pub async fn list(
    State(state): State<ServerState>,
    staff: CurrentStaff,
) -> AppResult<Json<Vec<StaffResponse>>> {
    let members = state
        .store
        .list_staff(&staff.restaurant_id)
        .map_err(AppError::from)?;
    Ok(Json(members.into_iter().map(StaffResponse::from).collect()))
}

/// GET /api/staff/:id - 单个员工
pub async fn get_by_id(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<StaffResponse>> {
    let member = state
        .store
        .get_staff(&id)
        .map_err(AppError::from)?
        .filter(|m| m.restaurant_id == staff.restaurant_id)
        .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound))?;
    Ok(Json(member.into()))
}

/// POST /api/staff - 创建员工
pub async fn create(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<StaffResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let permissions = match payload.permissions {
        Some(perms) => {
            validate_permissions(&perms)?;
            perms
        }
        None => default_permissions(payload.role),
    };

    let member = Staff {
        id: uuid::Uuid::new_v4().to_string(),
        restaurant_id: staff.restaurant_id.clone(),
        name: payload.name,
        username: payload.username,
        password_hash: hash_password(&payload.password)?,
        role: payload.role,
        permissions,
        is_active: true,
        created_at: crate::utils::now_millis(),
    };
    state.store.insert_staff(&member).map_err(AppError::from)?;

    tracing::info!(staff_id = %member.id, username = %member.username, "Staff created");
    Ok(Json(member.into()))
}

/// PUT /api/staff/:id - 更新员工
pub async fn update(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<StaffResponse>> {
    // 归属校验
    state
        .store
        .get_staff(&id)
        .map_err(AppError::from)?
        .filter(|m| m.restaurant_id == staff.restaurant_id)
        .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound))?;

    let password_hash = match &payload.password {
        Some(password) => {
            if password.len() < 6 {
                return Err(AppError::validation(
                    "Password must be at least 6 characters",
                ));
            }
            Some(hash_password(password)?)
        }
        None => None,
    };

    // 角色变化且未显式给权限时，落回新角色的默认权限
    let permissions = match (&payload.permissions, payload.role) {
        (Some(perms), _) => {
            validate_permissions(perms)?;
            Some(perms.clone())
        }
        (None, Some(role)) => Some(default_permissions(role)),
        (None, None) => None,
    };

    let updated = state
        .store
        .update_staff(&id, payload, password_hash, permissions)
        .map_err(AppError::from)?;
    Ok(Json(updated.into()))
}

/// DELETE /api/staff/:id - 删除员工
pub async fn delete(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    if staff.id == id {
        return Err(AppError::new(ErrorCode::StaffCannotDeleteSelf));
    }
    state
        .store
        .get_staff(&id)
        .map_err(AppError::from)?
        .filter(|m| m.restaurant_id == staff.restaurant_id)
        .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound))?;

    let deleted = state.store.delete_staff(&id).map_err(AppError::from)?;
    Ok(Json(deleted))
}
