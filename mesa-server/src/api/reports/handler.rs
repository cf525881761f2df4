//! Reports API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::reports::{
    HourBucket, ReportsOverview, TopProduct, TrendGranularity, TrendPoint, hourly_histogram,
    overview, top_products, trend,
};
use shared::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    /// 趋势粒度，默认按天
    pub granularity: Option<TrendGranularity>,
}

/// 报表响应
#[derive(Debug, Serialize)]
pub struct ReportsResponse {
    pub overview: ReportsOverview,
    pub trend: Vec<TrendPoint>,
    pub top_products: Vec<TopProduct>,
    pub hourly: Vec<HourBucket>,
}

/// GET /api/reports - 营收报表
///
/// 每次请求对全量订单从头聚合，无增量缓存。
pub async fn reports(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Query(query): Query<ReportsQuery>,
) -> AppResult<Json<ReportsResponse>> {
    let restaurant = state
        .store
        .get_restaurant(&staff.restaurant_id)
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let orders = state
        .store
        .list_orders(&restaurant.id, |_| true)
        .map_err(AppError::from)?;

    let tz = state
        .store
        .restaurant_timezone(&restaurant.id, state.config.timezone);
    let now = crate::utils::now_millis();
    let granularity = query.granularity.unwrap_or(TrendGranularity::Daily);

    Ok(Json(ReportsResponse {
        overview: overview(&orders, tz, now),
        trend: trend(&orders, granularity, tz, now, restaurant.created_at),
        top_products: top_products(&orders),
        hourly: hourly_histogram(&orders, tz),
    }))
}
