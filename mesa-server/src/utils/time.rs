//! 时间工具函数 — 业务时区转换
//!
//! 报表的所有日历窗口都在餐厅业务时区内计算，
//! 存储层只接触 `i64` Unix millis。

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// 解析 cutoff 时间字符串 (HH:MM)，失败返回 00:00
pub fn parse_cutoff(cutoff: &str) -> NaiveTime {
    NaiveTime::parse_from_str(cutoff, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse business_day_cutoff '{}': {}, falling back to 00:00",
            cutoff,
            e
        );
        NaiveTime::MIN
    })
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap_or_else(|| {
        date.and_time(NaiveTime::MIN)
    });
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

/// 当前业务时区日期
pub fn today_in(tz: Tz, now_millis: i64) -> NaiveDate {
    to_local(now_millis, tz).date_naive()
}

/// 周一作为一周起始
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday();
    date - Duration::days(weekday as i64)
}

/// 当月第一天
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// 上月第一天
pub fn prev_month_start(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    let last_of_prev = first.pred_opt().unwrap_or(first);
    month_start(last_of_prev)
}

/// Unix millis → 业务时区当地时间
pub fn to_local(millis: i64, tz: Tz) -> chrono::DateTime<Tz> {
    tz.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(|| tz.timestamp_millis_opt(0).unwrap())
}

/// Unix millis → 业务时区小时 (0-23)
pub fn local_hour(millis: i64, tz: Tz) -> u32 {
    to_local(millis, tz).hour()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ: Tz = chrono_tz::Europe::Madrid;

    #[test]
    fn test_parse_cutoff() {
        assert_eq!(parse_cutoff("02:00"), NaiveTime::from_hms_opt(2, 0, 0).unwrap());
        assert_eq!(parse_cutoff("garbage"), NaiveTime::MIN);
    }

    #[test]
    fn test_day_bounds_exclusive() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let start = day_start_millis(date, TZ);
        let end = day_end_millis(date, TZ);
        assert_eq!(end - start, 24 * 3600 * 1000);
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-03-15 is a Friday
        let friday = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let monday = week_start(friday);
        assert_eq!(monday, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_month_boundaries() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(month_start(date), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(
            prev_month_start(date),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_local_hour() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let noon = date_hms_to_millis(date, 12, 30, 0, TZ);
        assert_eq!(local_hour(noon, TZ), 12);
    }
}
