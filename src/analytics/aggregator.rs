//! 时间分桶与链接排行
//!
//! 纯函数，不做任何 I/O。输入是已经从事件存储取出的原始时间戳。

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::Granularity;
use crate::errors::{LinkpageError, Result};

/// 已删除链接在排行中显示的标题
pub const UNKNOWN_LINK_TITLE: &str = "Unknown";

/// 闭区间 `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(LinkpageError::invalid_range(format!(
                "Range start {} is later than range end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// 截止到 `now` 的最近 N 天
    ///
    /// 超出可表示范围时起点退到 `DateTime::<Utc>::MIN_UTC`。
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        let start = Duration::try_days(days.max(0))
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    /// 按粒度默认窗口截止到 `now`
    pub fn default_for(granularity: Granularity, now: DateTime<Utc>) -> Self {
        Self {
            start: granularity.default_window_start(now),
            end: now,
        }
    }

    #[inline]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub bucket_start: DateTime<Utc>,
    pub count: u64,
}

/// 单条点击事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRank {
    pub link_id: i32,
    pub title: String,
    pub count: u64,
}

/// 按粒度分桶计数
///
/// 只统计落在 `range` 内的事件，按桶起点升序返回；没有事件的桶不出现。
pub fn bucket_counts<I>(timestamps: I, range: &TimeRange, granularity: Granularity) -> Vec<BucketCount>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut buckets: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();

    for ts in timestamps {
        if range.contains(ts) {
            *buckets.entry(granularity.truncate(ts)).or_insert(0) += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(bucket_start, count)| BucketCount {
            bucket_start,
            count,
        })
        .collect()
}

/// 区间内出现过的链接 id（升序，去重）
pub fn link_ids_in_range(clicks: &[ClickEvent], range: &TimeRange) -> Vec<i32> {
    let mut ids: Vec<i32> = clicks
        .iter()
        .filter(|c| range.contains(c.timestamp))
        .map(|c| c.link_id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// 链接点击排行
///
/// 按点击数降序，点击数相同时按 link_id 升序。
/// `title_of` 返回 None 的链接（已被删除）标题为 "Unknown"。
pub fn rank_links<F>(clicks: &[ClickEvent], range: &TimeRange, title_of: F) -> Vec<LinkRank>
where
    F: Fn(i32) -> Option<String>,
{
    let mut counts: HashMap<i32, u64> = HashMap::new();
    for click in clicks.iter().filter(|c| range.contains(c.timestamp)) {
        *counts.entry(click.link_id).or_insert(0) += 1;
    }

    let mut ranked: Vec<LinkRank> = counts
        .into_iter()
        .map(|(link_id, count)| LinkRank {
            link_id,
            title: title_of(link_id).unwrap_or_else(|| UNKNOWN_LINK_TITLE.to_string()),
            count,
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.link_id.cmp(&b.link_id)));
    ranked
}
