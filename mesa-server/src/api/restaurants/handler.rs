//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use validator::Validate;

use crate::core::ServerState;
use crate::pricing::effective_price;
use shared::models::{Category, MenuItem, Restaurant, RestaurantCreate, RestaurantUpdate};
use shared::{AppError, AppResult, ErrorCode};

/// 顾客菜单里的一个菜品 (带现价)
#[derive(Debug, Clone, Serialize)]
pub struct PublicMenuItem {
    #[serde(flatten)]
    pub item: MenuItem,
    /// 折扣解析后的现价
    pub effective_price: f64,
}

/// 顾客菜单里的一个分类
#[derive(Debug, Clone, Serialize)]
pub struct PublicMenuCategory {
    #[serde(flatten)]
    pub category: Category,
    pub items: Vec<PublicMenuItem>,
}

/// 顾客菜单响应
#[derive(Debug, Clone, Serialize)]
pub struct PublicMenuResponse {
    pub restaurant_id: String,
    pub categories: Vec<PublicMenuCategory>,
}

/// GET /api/public/restaurants/:subdomain - 子域名解析餐厅
pub async fn get_by_subdomain(
    State(state): State<ServerState>,
    Path(subdomain): Path<String>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = state
        .store
        .find_restaurant_by_subdomain(&subdomain)
        .map_err(AppError::from)?
        .filter(|r| r.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    Ok(Json(restaurant))
}

/// GET /api/public/menu/:restaurant_id - 顾客菜单 (含现价)
///
/// 只返回上架分类和菜品；现价按当前时刻的折扣窗口解析。
pub async fn public_menu(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<PublicMenuResponse>> {
    let restaurant = state
        .store
        .get_restaurant(&restaurant_id)
        .map_err(AppError::from)?
        .filter(|r| r.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let categories = state
        .store
        .list_categories(&restaurant.id)
        .map_err(AppError::from)?;
    let items = state
        .store
        .list_menu_items(&restaurant.id)
        .map_err(AppError::from)?;

    let now = crate::utils::now_millis();
    let menu_categories = categories
        .into_iter()
        .filter(|c| c.is_active)
        .map(|category| {
            let category_items = items
                .iter()
                .filter(|i| i.category_id == category.id && i.is_available)
                .map(|item| PublicMenuItem {
                    effective_price: effective_price(item, Some(&category), now),
                    item: item.clone(),
                })
                .collect();
            PublicMenuCategory {
                category,
                items: category_items,
            }
        })
        .collect();

    Ok(Json(PublicMenuResponse {
        restaurant_id: restaurant.id,
        categories: menu_categories,
    }))
}

/// POST /api/restaurants - 创建餐厅
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<Restaurant>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let restaurant = state
        .store
        .create_restaurant(payload)
        .map_err(AppError::from)?;
    Ok(Json(restaurant))
}

/// PUT /api/restaurants/:id - 更新餐厅
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = state
        .store
        .update_restaurant(&id, payload)
        .map_err(AppError::from)?;
    Ok(Json(restaurant))
}
