//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use validator::Validate;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use shared::models::{AvailabilityUpdate, MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::{AppError, AppResult, ErrorCode};

/// GET /api/menu/items - 本餐厅全部菜品
pub async fn list(
    State(state): State<ServerState>,
    staff: CurrentStaff,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = state
        .store
        .list_menu_items(&staff.restaurant_id)
        .map_err(AppError::from)?;
    Ok(Json(items))
}

/// GET /api/menu/items/:id - 单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let item = owned_item(&state, &staff, &id)?;
    Ok(Json(item))
}

/// POST /api/menu/items - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let item = state
        .store
        .create_menu_item(&staff.restaurant_id, payload)
        .map_err(AppError::from)?;
    Ok(Json(item))
}

/// PUT /api/menu/items/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    owned_item(&state, &staff, &id)?;
    if let Some(price) = payload.price
        && price < 0.0
    {
        return Err(AppError::validation("Price must not be negative"));
    }
    let item = state
        .store
        .update_menu_item(&id, payload)
        .map_err(AppError::from)?;
    Ok(Json(item))
}

/// PUT /api/menu/items/:id/availability - 售罄/上架切换
pub async fn set_availability(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<AvailabilityUpdate>,
) -> AppResult<Json<MenuItem>> {
    owned_item(&state, &staff, &id)?;
    let item = state
        .store
        .set_menu_item_availability(&id, payload.is_available)
        .map_err(AppError::from)?;

    tracing::info!(
        item_id = %item.id,
        available = item.is_available,
        staff = %staff.username,
        "Menu item availability toggled"
    );
    Ok(Json(item))
}

/// DELETE /api/menu/items/:id - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    owned_item(&state, &staff, &id)?;
    let deleted = state.store.delete_menu_item(&id).map_err(AppError::from)?;
    Ok(Json(deleted))
}

fn owned_item(state: &ServerState, staff: &CurrentStaff, id: &str) -> AppResult<MenuItem> {
    state
        .store
        .get_menu_item(id)
        .map_err(AppError::from)?
        .filter(|i| i.restaurant_id == staff.restaurant_id)
        .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound))
}
