//! 报表聚合
//!
//! 针对一份拉取的订单列表做纯同步计算，每次请求从头重算，
//! 不做增量缓存 - 单店日订单量级下成本可忽略。
//!
//! 所有日历窗口都按餐厅业务时区计算；营收只统计 PAID 订单，
//! 订单量统计除 CANCELLED 外的全部订单。

use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderStatus};
use std::collections::HashMap;

use crate::utils::time;

/// 热销榜长度
const TOP_PRODUCTS_LIMIT: usize = 10;

/// 小时直方图窗口 (营业时段 08:00-20:00)
const HISTOGRAM_FIRST_HOUR: u32 = 8;
const HISTOGRAM_LAST_HOUR: u32 = 20;

/// "旺时" 阈值: 小时营收超过峰值小时的 50%
const PROFITABLE_RATIO: f64 = 0.5;

/// 单个日历窗口的统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WindowStats {
    pub orders: usize,
    pub revenue: f64,
}

/// 概览: 常用日历窗口
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsOverview {
    pub today: WindowStats,
    pub yesterday: WindowStats,
    pub this_week: WindowStats,
    pub last_week: WindowStats,
    pub this_month: WindowStats,
    pub last_month: WindowStats,
}

/// 趋势粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendGranularity {
    Daily,
    Weekly,
    Monthly,
}

impl TrendGranularity {
    /// 各粒度的最大区间数 (30 天 / 12 周 / 12 月)
    pub const fn cap(&self) -> usize {
        match self {
            TrendGranularity::Daily => 30,
            TrendGranularity::Weekly => 12,
            TrendGranularity::Monthly => 12,
        }
    }
}

/// 趋势序列的一个数据点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub orders: usize,
    pub revenue: f64,
}

/// 热销商品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProduct {
    pub item_id: String,
    pub name: String,
    pub quantity: i32,
    pub revenue: f64,
}

/// 小时直方图桶
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourBucket {
    /// 当地时间小时 (8-20)
    pub hour: u32,
    pub orders: usize,
    pub revenue: f64,
    /// 营收超过峰值小时 50% 的 "旺时"
    pub profitable: bool,
}

fn revenue_of(order: &Order) -> f64 {
    if order.status == OrderStatus::Paid {
        order.total_amount
    } else {
        0.0
    }
}

fn counts(order: &Order) -> bool {
    order.status != OrderStatus::Cancelled
}

fn window_stats(orders: &[Order], start: i64, end: i64) -> WindowStats {
    let mut stats = WindowStats::default();
    for order in orders {
        if order.created_at >= start && order.created_at < end && counts(order) {
            stats.orders += 1;
            stats.revenue += revenue_of(order);
        }
    }
    stats
}

/// 概览统计: 今天/昨天/本周/上周/本月/上月
pub fn overview(orders: &[Order], tz: Tz, now: i64) -> ReportsOverview {
    let today = time::today_in(tz, now);
    let yesterday = today.pred_opt().unwrap_or(today);

    let week_start = time::week_start(today);
    let last_week_start = week_start - Duration::days(7);

    let month_start = time::month_start(today);
    let last_month_start = time::prev_month_start(today);

    let day = |date: NaiveDate| {
        (
            time::day_start_millis(date, tz),
            time::day_end_millis(date, tz),
        )
    };

    let (today_start, today_end) = day(today);
    let (yesterday_start, yesterday_end) = day(yesterday);

    ReportsOverview {
        today: window_stats(orders, today_start, today_end),
        yesterday: window_stats(orders, yesterday_start, yesterday_end),
        this_week: window_stats(orders, time::day_start_millis(week_start, tz), today_end),
        last_week: window_stats(
            orders,
            time::day_start_millis(last_week_start, tz),
            time::day_start_millis(week_start, tz),
        ),
        this_month: window_stats(orders, time::day_start_millis(month_start, tz), today_end),
        last_month: window_stats(
            orders,
            time::day_start_millis(last_month_start, tz),
            time::day_start_millis(month_start, tz),
        ),
    }
}

/// 趋势序列
///
/// 区间数取 min(粒度上限, 自首单/开店以来的区间数) - 两个起点中
/// 较晚的一个决定序列长度，开店十天的新店日趋势只有十个点。
/// 输出从最旧到最新。
pub fn trend(
    orders: &[Order],
    granularity: TrendGranularity,
    tz: Tz,
    now: i64,
    restaurant_created_at: i64,
) -> Vec<TrendPoint> {
    let today = time::today_in(tz, now);

    let first_order_at = orders.iter().map(|o| o.created_at).min().unwrap_or(now);
    let reference = first_order_at.max(restaurant_created_at);
    let reference_date = time::today_in(tz, reference);

    let periods = match granularity {
        TrendGranularity::Daily => (today - reference_date).num_days() as usize + 1,
        TrendGranularity::Weekly => {
            let weeks =
                (time::week_start(today) - time::week_start(reference_date)).num_days() / 7;
            weeks as usize + 1
        }
        TrendGranularity::Monthly => {
            let months = (today.year() - reference_date.year()) * 12
                + (today.month() as i32 - reference_date.month() as i32);
            months.max(0) as usize + 1
        }
    }
    .min(granularity.cap());

    let mut points = Vec::with_capacity(periods);
    for i in (0..periods).rev() {
        let (label, start, end) = match granularity {
            TrendGranularity::Daily => {
                let date = today - Duration::days(i as i64);
                (
                    date.format("%m-%d").to_string(),
                    time::day_start_millis(date, tz),
                    time::day_end_millis(date, tz),
                )
            }
            TrendGranularity::Weekly => {
                let start_date = time::week_start(today) - Duration::days(7 * i as i64);
                (
                    start_date.format("%m-%d").to_string(),
                    time::day_start_millis(start_date, tz),
                    time::day_start_millis(start_date + Duration::days(7), tz),
                )
            }
            TrendGranularity::Monthly => {
                let mut start_date = time::month_start(today);
                for _ in 0..i {
                    start_date = time::prev_month_start(start_date);
                }
                let next = time::month_start(start_date + Duration::days(32));
                (
                    start_date.format("%Y-%m").to_string(),
                    time::day_start_millis(start_date, tz),
                    time::day_start_millis(next, tz),
                )
            }
        };
        let stats = window_stats(orders, start, end);
        points.push(TrendPoint {
            label,
            orders: stats.orders,
            revenue: stats.revenue,
        });
    }
    points
}

/// 按营收排序的热销商品 Top-10
///
/// 营收 = Σ quantity × 下单时的单价快照，跨全部 PAID 订单累计。
pub fn top_products(orders: &[Order]) -> Vec<TopProduct> {
    let mut accumulated: HashMap<&str, TopProduct> = HashMap::new();
    for order in orders {
        if order.status != OrderStatus::Paid {
            continue;
        }
        for item in &order.items {
            let entry = accumulated
                .entry(item.item_id.as_str())
                .or_insert_with(|| TopProduct {
                    item_id: item.item_id.clone(),
                    name: item.name.clone(),
                    quantity: 0,
                    revenue: 0.0,
                });
            entry.quantity += item.quantity;
            entry.revenue += item.line_total();
        }
    }

    let mut products: Vec<TopProduct> = accumulated.into_values().collect();
    products.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    products.truncate(TOP_PRODUCTS_LIMIT);
    products
}

/// 营业时段小时直方图 (08:00-20:00)
///
/// 某小时营收超过峰值小时营收的 50% 时标记为 "旺时"。
pub fn hourly_histogram(orders: &[Order], tz: Tz) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (HISTOGRAM_FIRST_HOUR..=HISTOGRAM_LAST_HOUR)
        .map(|hour| HourBucket {
            hour,
            orders: 0,
            revenue: 0.0,
            profitable: false,
        })
        .collect();

    for order in orders {
        if !counts(order) {
            continue;
        }
        let hour = time::local_hour(order.created_at, tz);
        if (HISTOGRAM_FIRST_HOUR..=HISTOGRAM_LAST_HOUR).contains(&hour) {
            let bucket = &mut buckets[(hour - HISTOGRAM_FIRST_HOUR) as usize];
            bucket.orders += 1;
            bucket.revenue += revenue_of(order);
        }
    }

    let max_revenue = buckets.iter().map(|b| b.revenue).fold(0.0, f64::max);
    if max_revenue > 0.0 {
        for bucket in &mut buckets {
            bucket.profitable = bucket.revenue > max_revenue * PROFITABLE_RATIO;
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::orders::order_fixtures::{make_item, make_order};
    use chrono::NaiveDate;

    const TZ: Tz = chrono_tz::Europe::Madrid;

    fn paid_order(id: &str, created_at: i64, amount: f64) -> Order {
        let mut order = make_order(
            id,
            1,
            OrderStatus::Paid,
            vec![make_item("x", amount, 1)],
        );
        order.created_at = created_at;
        order.paid_amount = amount;
        order
    }

    fn at(date: NaiveDate, hour: u32) -> i64 {
        time::date_hms_to_millis(date, hour, 0, 0, TZ)
    }

    #[test]
    fn test_overview_windows() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(); // Friday
        let now = at(today, 18);

        let orders = vec![
            paid_order("o1", at(today, 12), 20.0),
            paid_order("o2", at(today.pred_opt().unwrap(), 12), 10.0),
            // Monday of last week
            paid_order("o3", at(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), 12), 5.0),
            // last month
            paid_order("o4", at(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(), 12), 7.0),
        ];

        let report = overview(&orders, TZ, now);
        assert_eq!(report.today, WindowStats { orders: 1, revenue: 20.0 });
        assert_eq!(report.yesterday, WindowStats { orders: 1, revenue: 10.0 });
        // this week = Mon 03-11 .. now: o1 + o2
        assert_eq!(report.this_week.orders, 2);
        assert_eq!(report.last_week, WindowStats { orders: 1, revenue: 5.0 });
        assert_eq!(report.this_month.orders, 3);
        assert_eq!(report.last_month, WindowStats { orders: 1, revenue: 7.0 });
    }

    #[test]
    fn test_cancelled_orders_excluded() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let now = at(today, 18);

        let mut cancelled = paid_order("o1", at(today, 12), 50.0);
        cancelled.status = OrderStatus::Cancelled;
        let pending = {
            let mut o = paid_order("o2", at(today, 13), 30.0);
            o.status = OrderStatus::Pending;
            o
        };

        let report = overview(&[cancelled, pending], TZ, now);
        // pending counts as an order but contributes no revenue
        assert_eq!(report.today, WindowStats { orders: 1, revenue: 0.0 });
    }

    #[test]
    fn test_daily_trend_bounded_by_restaurant_age() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let now = at(today, 18);
        let opened = at(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(), 9);

        let orders = vec![paid_order("o1", at(today, 12), 20.0)];
        let points = trend(&orders, TrendGranularity::Daily, TZ, now, opened);

        // 5 days since opening (inclusive), well under the 30-day cap
        assert_eq!(points.len(), 5);
        assert_eq!(points.last().unwrap().label, "03-15");
        assert_eq!(points.last().unwrap().revenue, 20.0);
        assert_eq!(points[0].revenue, 0.0);
    }

    #[test]
    fn test_daily_trend_cap() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let now = at(today, 18);
        // restaurant opened a year ago, first order long ago
        let opened = at(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(), 9);
        let orders = vec![paid_order("o1", opened + 1000, 5.0)];

        let points = trend(&orders, TrendGranularity::Daily, TZ, now, opened);
        assert_eq!(points.len(), TrendGranularity::Daily.cap());
    }

    #[test]
    fn test_monthly_trend_labels() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let now = at(today, 18);
        let opened = at(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 9);
        let orders = vec![paid_order("o1", at(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(), 12), 9.0)];

        let points = trend(&orders, TrendGranularity::Monthly, TZ, now, opened);
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(points[1].revenue, 9.0);
    }

    #[test]
    fn test_top_products_by_revenue() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut o1 = make_order(
            "o1",
            1,
            OrderStatus::Paid,
            vec![make_item("a", 2.0, 10), make_item("b", 50.0, 1)],
        );
        o1.created_at = at(today, 12);
        let mut o2 = make_order("o2", 2, OrderStatus::Paid, vec![make_item("a", 2.0, 5)]);
        o2.created_at = at(today, 13);
        // unpaid orders contribute nothing
        let mut o3 = make_order("o3", 3, OrderStatus::Pending, vec![make_item("c", 99.0, 1)]);
        o3.created_at = at(today, 14);

        let products = top_products(&[o1, o2, o3]);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].item_id, "b"); // 50.0 beats 30.0
        assert_eq!(products[1].item_id, "a");
        assert_eq!(products[1].quantity, 15);
        assert_eq!(products[1].revenue, 30.0);
    }

    #[test]
    fn test_hourly_histogram_profitable_flag() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let orders = vec![
            paid_order("o1", at(today, 13), 100.0), // peak hour
            paid_order("o2", at(today, 14), 60.0),  // > 50% of peak
            paid_order("o3", at(today, 9), 10.0),   // quiet morning
            paid_order("o4", at(today, 23), 500.0), // outside window - ignored
        ];

        let buckets = hourly_histogram(&orders, TZ);
        assert_eq!(buckets.len(), 13); // hours 8..=20

        let by_hour = |h: u32| buckets.iter().find(|b| b.hour == h).unwrap();
        assert!(by_hour(13).profitable);
        assert!(by_hour(14).profitable);
        assert!(!by_hour(9).profitable);
        assert_eq!(by_hour(20).orders, 0);
    }

    #[test]
    fn test_histogram_empty_orders() {
        let buckets = hourly_histogram(&[], TZ);
        assert!(buckets.iter().all(|b| !b.profitable && b.revenue == 0.0));
    }
}
