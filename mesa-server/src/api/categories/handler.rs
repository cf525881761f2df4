//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::{AppError, AppResult, ErrorCode};

/// GET /api/categories - 本餐厅全部分类
pub async fn list(
    State(state): State<ServerState>,
    staff: CurrentStaff,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state
        .store
        .list_categories(&staff.restaurant_id)
        .map_err(AppError::from)?;
    Ok(Json(categories))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Category name is required"));
    }
    let category = state
        .store
        .create_category(&staff.restaurant_id, payload)
        .map_err(AppError::from)?;
    Ok(Json(category))
}

/// PUT /api/categories/:id - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    owned_category(&state, &staff, &id)?;
    let category = state
        .store
        .update_category(&id, payload)
        .map_err(AppError::from)?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - 删除分类 (分类下有菜品时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    owned_category(&state, &staff, &id)?;
    let deleted = state.store.delete_category(&id).map_err(AppError::from)?;
    Ok(Json(deleted))
}

fn owned_category(state: &ServerState, staff: &CurrentStaff, id: &str) -> AppResult<()> {
    state
        .store
        .get_category(id)
        .map_err(AppError::from)?
        .filter(|c| c.restaurant_id == staff.restaurant_id)
        .map(|_| ())
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))
}
