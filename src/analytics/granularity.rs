//! 统计粒度
//!
//! 每个粒度固定映射到一个截断函数和一个默认回溯窗口，查询层不拼接任何时间单位字符串。

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Granularity {
    Hour,
    #[default]
    Day,
    Month,
    Quarter,
    Year,
}

/// 默认回溯窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Fixed(Duration),
    Months(u32),
}

impl Granularity {
    /// 将时间戳截断到所属桶的起点（UTC 日历语义）
    pub fn truncate(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        let start = match self {
            Granularity::Hour => date.and_hms_opt(ts.hour(), 0, 0),
            Granularity::Day => date.and_hms_opt(0, 0, 0),
            Granularity::Month => first_of_month(date.year(), date.month()),
            Granularity::Quarter => first_of_month(date.year(), quarter_start_month(date.month())),
            Granularity::Year => first_of_month(date.year(), 1),
        };
        start.map(|naive| naive.and_utc()).unwrap_or(ts)
    }

    pub fn lookback(self) -> Lookback {
        match self {
            Granularity::Hour => Lookback::Fixed(Duration::hours(24)),
            Granularity::Day => Lookback::Fixed(Duration::days(30)),
            Granularity::Month => Lookback::Months(12),
            Granularity::Quarter => Lookback::Months(24),
            Granularity::Year => Lookback::Months(60),
        }
    }

    /// 单链接详情视图的默认窗口起点
    pub fn default_window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.lookback() {
            Lookback::Fixed(duration) => now - duration,
            Lookback::Months(months) => now
                .checked_sub_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// 图表标签
    pub fn label(self, bucket_start: DateTime<Utc>) -> String {
        match self {
            Granularity::Hour => bucket_start.format("%Y-%m-%d %H:00").to_string(),
            Granularity::Day => bucket_start.format("%Y-%m-%d").to_string(),
            Granularity::Month => bucket_start.format("%Y-%m").to_string(),
            Granularity::Quarter => format!(
                "{}-Q{}",
                bucket_start.year(),
                (bucket_start.month() - 1) / 3 + 1
            ),
            Granularity::Year => bucket_start.format("%Y").to_string(),
        }
    }
}

fn quarter_start_month(month: u32) -> u32 {
    (month - 1) / 3 * 3 + 1
}

fn first_of_month(year: i32, month: u32) -> Option<chrono::NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_truncate_each_granularity() {
        let ts = at(2024, 8, 17, 13, 45, 12);
        assert_eq!(Granularity::Hour.truncate(ts), at(2024, 8, 17, 13, 0, 0));
        assert_eq!(Granularity::Day.truncate(ts), at(2024, 8, 17, 0, 0, 0));
        assert_eq!(Granularity::Month.truncate(ts), at(2024, 8, 1, 0, 0, 0));
        assert_eq!(Granularity::Quarter.truncate(ts), at(2024, 7, 1, 0, 0, 0));
        assert_eq!(Granularity::Year.truncate(ts), at(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_quarter_boundaries() {
        for (month, expected) in [
            (1, 1),
            (2, 1),
            (3, 1),
            (4, 4),
            (6, 4),
            (7, 7),
            (9, 7),
            (10, 10),
            (12, 10),
        ] {
            let ts = at(2023, month, 15, 8, 0, 0);
            assert_eq!(
                Granularity::Quarter.truncate(ts),
                at(2023, expected, 1, 0, 0, 0),
                "month {}",
                month
            );
        }
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let ts = at(2024, 2, 29, 23, 59, 59);
        for g in [
            Granularity::Hour,
            Granularity::Day,
            Granularity::Month,
            Granularity::Quarter,
            Granularity::Year,
        ] {
            let once = g.truncate(ts);
            assert_eq!(g.truncate(once), once);
        }
    }

    #[test]
    fn test_default_windows() {
        let now = at(2024, 6, 15, 12, 0, 0);
        assert_eq!(
            Granularity::Hour.default_window_start(now),
            at(2024, 6, 14, 12, 0, 0)
        );
        assert_eq!(
            Granularity::Day.default_window_start(now),
            at(2024, 5, 16, 12, 0, 0)
        );
        assert_eq!(
            Granularity::Month.default_window_start(now),
            at(2023, 6, 15, 12, 0, 0)
        );
        assert_eq!(
            Granularity::Quarter.default_window_start(now),
            at(2022, 6, 15, 12, 0, 0)
        );
        assert_eq!(
            Granularity::Year.default_window_start(now),
            at(2019, 6, 15, 12, 0, 0)
        );
    }

    #[test]
    fn test_parse_from_str() {
        assert_eq!("hour".parse::<Granularity>().ok(), Some(Granularity::Hour));
        assert_eq!("Quarter".parse::<Granularity>().ok(), Some(Granularity::Quarter));
        assert!("week".parse::<Granularity>().is_err());
        assert_eq!(Granularity::Month.to_string(), "month");
    }

    #[test]
    fn test_labels() {
        let ts = at(2024, 11, 1, 0, 0, 0);
        assert_eq!(Granularity::Day.label(ts), "2024-11-01");
        assert_eq!(Granularity::Month.label(ts), "2024-11");
        assert_eq!(Granularity::Quarter.label(ts), "2024-Q4");
        assert_eq!(Granularity::Year.label(ts), "2024");
    }
}
