use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{ClickEvent, TimeRange};
use crate::errors::Result;

/// 访问/点击事件存储（只追加）
///
/// 写入与聚合查询互不阻塞；查询只需看到开始时已提交的数据。
#[async_trait::async_trait]
pub trait EventStore: Send + Sync {
    async fn record_visit(&self, at: DateTime<Utc>) -> Result<()>;

    async fn record_click(&self, link_id: i32, at: DateTime<Utc>) -> Result<()>;

    /// 区间内所有访问时间戳
    async fn visit_timestamps(&self, range: &TimeRange) -> Result<Vec<DateTime<Utc>>>;

    /// 区间内的点击事件，`link_id` 为 Some 时只返回该链接
    async fn click_events(
        &self,
        range: &TimeRange,
        link_id: Option<i32>,
    ) -> Result<Vec<ClickEvent>>;
}

/// 链接标题查询（排行榜使用）
#[async_trait::async_trait]
pub trait LinkTitleLookup: Send + Sync {
    /// 返回存在的链接 id → 当前标题；不存在的 id 不出现在结果中
    async fn link_titles(&self, ids: &[i32]) -> Result<HashMap<i32, String>>;
}
