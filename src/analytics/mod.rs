//! 统计核心
//!
//! - `granularity`: 粒度枚举及截断/默认窗口表
//! - `aggregator`: 纯函数分桶与排行
//! - `event_store`: 事件存储抽象（由 storage 层实现）

pub mod aggregator;
pub mod event_store;
pub mod granularity;

pub use aggregator::{
    BucketCount, ClickEvent, LinkRank, TimeRange, UNKNOWN_LINK_TITLE, bucket_counts,
    link_ids_in_range, rank_links,
};
pub use event_store::{EventStore, LinkTitleLookup};
pub use granularity::Granularity;
