//! 客户端日期解析
//!
//! 接受 RFC 3339、`YYYY-MM-DDTHH:MM`（datetime-local 输入框）和 `YYYY-MM-DD`。
//! 不带时区的值按 UTC 处理。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use crate::errors::{LinkpageError, Result};

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// 严格解析，失败返回 DateParse 错误（统计查询参数使用）
pub fn parse_client_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(naive.and_utc());
    }

    Err(LinkpageError::date_parse(format!(
        "Invalid date '{}'. Use RFC3339 or YYYY-MM-DD",
        input
    )))
}

/// 宽松解析链接的开放/结束时间
///
/// 空字符串视为未设置；无法解析的值视为未设置并记录警告，
/// 这样的链接永远不会被锁定。
pub fn parse_schedule_date(field: &str, input: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = input.map(str::trim).filter(|s| !s.is_empty())?;
    match parse_client_date(raw) {
        Ok(dt) => Some(dt),
        Err(_) => {
            warn!("Ignoring malformed {} value: {:?}", field, raw);
            None
        }
    }
}

/// 区间终点：纯日期输入取当天最后一纳秒，使整天都被包含
pub fn parse_range_end(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    {
        return Ok(naive.and_utc());
    }
    parse_client_date(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_range_end_covers_last_second_of_day() {
        let end = parse_range_end("2024-01-31").unwrap();
        let late =
            Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap() + Duration::milliseconds(500);
        let next_day = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert!(late <= end);
        assert!(end < next_day);
        assert_eq!(end + Duration::nanoseconds(1), next_day);
    }

    #[test]
    fn test_range_end_keeps_explicit_time() {
        let end = parse_range_end("2024-01-31T12:00:00Z").unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_formats() {
        let expected = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_client_date("2030-01-01").unwrap(), expected);
        assert_eq!(parse_client_date("2030-01-01T00:00").unwrap(), expected);
        assert_eq!(parse_client_date("2030-01-01T00:00:00Z").unwrap(), expected);
        assert_eq!(
            parse_client_date("2030-01-01T09:00:00+09:00").unwrap(),
            expected
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_client_date("next tuesday").unwrap_err();
        assert!(matches!(err, LinkpageError::DateParse(_)));
        assert!(parse_client_date("2024-13-45").is_err());
    }

    #[test]
    fn test_schedule_date_degrades_to_none() {
        assert_eq!(parse_schedule_date("start_date", None), None);
        assert_eq!(parse_schedule_date("start_date", Some("")), None);
        assert_eq!(parse_schedule_date("start_date", Some("soon")), None);
        assert!(parse_schedule_date("start_date", Some("2030-01-01")).is_some());
    }
}
