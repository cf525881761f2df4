//! 折扣解析
//!
//! `effective_price` 按固定顺序解析菜品现价：
//!
//! 1. 菜品级折扣 (`discounted_price` 优先于 `discount_percentage`)，
//!    仅在其可选时间窗口内生效 (缺失的边界 = 无界)；
//! 2. 否则所属分类的折扣百分比，同样受时间窗口约束；
//! 3. 否则基础价。
//!
//! 菜品级和分类级折扣不叠加 - 菜品级可用时总是独占生效。
//! 现价永不超过基础价。

use shared::models::{Category, MenuItem};

/// 时间窗口检查 - 缺失的边界视为无界
pub fn window_active(start: Option<i64>, end: Option<i64>, now: i64) -> bool {
    if let Some(s) = start
        && now < s
    {
        return false;
    }
    if let Some(e) = end
        && now > e
    {
        return false;
    }
    true
}

/// 解析菜品在 `now` 时刻的现价
pub fn effective_price(item: &MenuItem, category: Option<&Category>, now: i64) -> f64 {
    let base = item.price;

    // 1. 菜品级折扣
    if window_active(item.discount_start, item.discount_end, now) {
        if let Some(discounted) = item.discounted_price {
            return round2(discounted.clamp(0.0, base));
        }
        if let Some(pct) = item.discount_percentage {
            return round2(apply_percentage(base, pct));
        }
    }

    // 2. 分类级折扣
    if let Some(category) = category
        && let Some(pct) = category.discount_percentage
        && window_active(category.discount_start, category.discount_end, now)
    {
        return round2(apply_percentage(base, pct));
    }

    // 3. 基础价
    base
}

fn apply_percentage(base: f64, pct: f64) -> f64 {
    let pct = pct.clamp(0.0, 100.0);
    base * (1.0 - pct / 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64) -> MenuItem {
        MenuItem {
            id: "i1".into(),
            restaurant_id: "r1".into(),
            category_id: "c1".into(),
            name: "Tortilla".into(),
            description: None,
            price,
            is_available: true,
            kitchen_station: None,
            sort_order: 0,
            discounted_price: None,
            discount_percentage: None,
            discount_start: None,
            discount_end: None,
        }
    }

    fn category(pct: Option<f64>, start: Option<i64>, end: Option<i64>) -> Category {
        Category {
            id: "c1".into(),
            restaurant_id: "r1".into(),
            name: "Tapas".into(),
            sort_order: 0,
            is_active: true,
            discount_percentage: pct,
            discount_start: start,
            discount_end: end,
        }
    }

    #[test]
    fn test_base_price_without_discounts() {
        assert_eq!(effective_price(&item(8.0), None, 1000), 8.0);
    }

    #[test]
    fn test_item_absolute_discount_wins_over_percentage() {
        let mut i = item(10.0);
        i.discounted_price = Some(7.0);
        i.discount_percentage = Some(50.0);
        assert_eq!(effective_price(&i, None, 1000), 7.0);
    }

    #[test]
    fn test_item_percentage_discount() {
        let mut i = item(10.0);
        i.discount_percentage = Some(25.0);
        assert_eq!(effective_price(&i, None, 1000), 7.5);
    }

    #[test]
    fn test_window_bounds() {
        let mut i = item(10.0);
        i.discounted_price = Some(5.0);
        i.discount_start = Some(500);
        i.discount_end = Some(1500);

        assert_eq!(effective_price(&i, None, 400), 10.0); // before window
        assert_eq!(effective_price(&i, None, 1000), 5.0); // inside
        assert_eq!(effective_price(&i, None, 1600), 10.0); // after
    }

    #[test]
    fn test_missing_bound_is_unbounded() {
        let mut i = item(10.0);
        i.discounted_price = Some(5.0);
        i.discount_end = Some(1500);
        // no start bound: valid from the beginning of time
        assert_eq!(effective_price(&i, None, 0), 5.0);
    }

    #[test]
    fn test_category_discount_used_when_item_has_none() {
        let i = item(10.0);
        let c = category(Some(10.0), None, None);
        assert_eq!(effective_price(&i, Some(&c), 1000), 9.0);
    }

    #[test]
    fn test_item_discount_shadows_category_no_stacking() {
        let mut i = item(10.0);
        i.discount_percentage = Some(20.0);
        let c = category(Some(50.0), None, None);
        // item-level 20% wins outright; category 50% is NOT applied on top
        assert_eq!(effective_price(&i, Some(&c), 1000), 8.0);
    }

    #[test]
    fn test_expired_item_window_falls_back_to_category() {
        let mut i = item(10.0);
        i.discounted_price = Some(5.0);
        i.discount_end = Some(500);
        let c = category(Some(10.0), None, None);
        assert_eq!(effective_price(&i, Some(&c), 1000), 9.0);
    }

    #[test]
    fn test_never_exceeds_base_price() {
        let mut i = item(10.0);
        i.discounted_price = Some(12.0); // bogus "discount" above base
        assert_eq!(effective_price(&i, None, 1000), 10.0);

        let mut j = item(10.0);
        j.discount_percentage = Some(-5.0); // negative pct clamps to 0
        assert_eq!(effective_price(&j, None, 1000), 10.0);
    }
}
