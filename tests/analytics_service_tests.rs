//! AnalyticsService tests
//!
//! Uses in-memory event stores so time ranges are fully controlled, plus
//! one pass over the SQLite store.

use std::collections::HashMap;
use std::sync::{Arc, Once};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use linkpage::analytics::{ClickEvent, EventStore, Granularity, LinkTitleLookup, TimeRange};
use linkpage::config::init_config;
use linkpage::errors::{LinkpageError, Result};
use linkpage::services::{AnalyticsService, CreateLinkRequest, LinkService};
use linkpage::storage::StorageFactory;
use tempfile::TempDir;
use tokio::sync::RwLock;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
}

// =============================================================================
// Mock stores
// =============================================================================

#[derive(Default)]
struct MemoryEvents {
    visits: RwLock<Vec<DateTime<Utc>>>,
    clicks: RwLock<Vec<ClickEvent>>,
}

#[async_trait]
impl EventStore for MemoryEvents {
    async fn record_visit(&self, at: DateTime<Utc>) -> Result<()> {
        self.visits.write().await.push(at);
        Ok(())
    }

    async fn record_click(&self, link_id: i32, at: DateTime<Utc>) -> Result<()> {
        self.clicks.write().await.push(ClickEvent {
            link_id,
            timestamp: at,
        });
        Ok(())
    }

    async fn visit_timestamps(&self, range: &TimeRange) -> Result<Vec<DateTime<Utc>>> {
        Ok(self
            .visits
            .read()
            .await
            .iter()
            .copied()
            .filter(|t| range.contains(*t))
            .collect())
    }

    async fn click_events(
        &self,
        range: &TimeRange,
        link_id: Option<i32>,
    ) -> Result<Vec<ClickEvent>> {
        Ok(self
            .clicks
            .read()
            .await
            .iter()
            .copied()
            .filter(|c| range.contains(c.timestamp))
            .filter(|c| link_id.is_none_or(|id| c.link_id == id))
            .collect())
    }
}

/// Store whose reads always fail
struct BrokenEvents;

#[async_trait]
impl EventStore for BrokenEvents {
    async fn record_visit(&self, _at: DateTime<Utc>) -> Result<()> {
        Err(LinkpageError::database_connection("connection refused"))
    }

    async fn record_click(&self, _link_id: i32, _at: DateTime<Utc>) -> Result<()> {
        Err(LinkpageError::database_connection("connection refused"))
    }

    async fn visit_timestamps(&self, _range: &TimeRange) -> Result<Vec<DateTime<Utc>>> {
        Err(LinkpageError::database_connection("connection refused"))
    }

    async fn click_events(
        &self,
        _range: &TimeRange,
        _link_id: Option<i32>,
    ) -> Result<Vec<ClickEvent>> {
        Err(LinkpageError::database_connection("connection refused"))
    }
}

struct FixedTitles(HashMap<i32, String>);

#[async_trait]
impl LinkTitleLookup for FixedTitles {
    async fn link_titles(&self, ids: &[i32]) -> Result<HashMap<i32, String>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.0.get(id).map(|t| (*id, t.clone())))
            .collect())
    }
}

fn titles() -> Arc<FixedTitles> {
    Arc::new(FixedTitles(HashMap::from([
        (1, "Blog".to_string()),
        (2, "Shop".to_string()),
    ])))
}

async fn populated_events() -> Arc<MemoryEvents> {
    let events = Arc::new(MemoryEvents::default());
    for ts in [at(2024, 3, 1, 9), at(2024, 3, 1, 18), at(2024, 3, 3, 7)] {
        events.record_visit(ts).await.unwrap();
    }
    for (id, ts) in [
        (1, at(2024, 3, 1, 9)),
        (2, at(2024, 3, 1, 10)),
        (2, at(2024, 3, 3, 8)),
        (3, at(2024, 3, 3, 9)),
        (1, at(2024, 2, 1, 9)),
    ] {
        events.record_click(id, ts).await.unwrap();
    }
    events
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_statistics_over_range() {
    let service = AnalyticsService::new(populated_events().await, titles());
    let range = TimeRange::new(at(2024, 3, 1, 0), at(2024, 3, 31, 0)).unwrap();

    let stats = service.statistics(range).await.expect("statistics");

    assert_eq!(stats.granularity, Granularity::Day);
    assert_eq!(stats.total_visits, 3);
    assert_eq!(stats.total_clicks, 4);
    assert_eq!(stats.visits.len(), 2);
    assert_eq!(stats.visits[0].label, "2024-03-01");
    assert_eq!(stats.visits[0].count, 2);

    let ranked: Vec<(i32, &str, u64)> = stats
        .links
        .iter()
        .map(|r| (r.link_id, r.title.as_str(), r.count))
        .collect();
    assert_eq!(ranked, vec![(2, "Shop", 2), (1, "Blog", 1), (3, "Unknown", 1)]);
}

#[tokio::test]
async fn test_empty_range_is_not_an_error() {
    let service = AnalyticsService::new(Arc::new(MemoryEvents::default()), titles());
    let range = TimeRange::new(at(2020, 1, 1, 0), at(2020, 1, 2, 0)).unwrap();

    let stats = service.statistics(range).await.expect("statistics");
    assert_eq!(stats.total_visits, 0);
    assert!(stats.visits.is_empty());
    assert!(stats.links.is_empty());
}

#[tokio::test]
async fn test_statistics_for_days_rejects_non_positive() {
    let service = AnalyticsService::new(Arc::new(MemoryEvents::default()), titles());
    let err = service
        .statistics_for_days(0, at(2024, 3, 1, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkpageError::Validation(_)));
}

#[tokio::test]
async fn test_statistics_for_huge_day_counts() {
    let service = AnalyticsService::new(populated_events().await, titles());
    let now = at(2024, 3, 31, 0);

    for days in [1_000_000_000, i64::MAX] {
        let stats = service
            .statistics_for_days(days, now)
            .await
            .expect("statistics");
        assert_eq!(stats.range.start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.total_clicks, 5);
    }
}

#[tokio::test]
async fn test_unreachable_store_reports_data_unavailable() {
    let service = AnalyticsService::new(Arc::new(BrokenEvents), titles());
    let range = TimeRange::new(at(2024, 3, 1, 0), at(2024, 3, 2, 0)).unwrap();

    let err = service.statistics(range).await.unwrap_err();
    assert!(matches!(err, LinkpageError::DataUnavailable(_)));

    let err = service
        .link_statistics(1, Granularity::Hour, None, at(2024, 3, 1, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkpageError::DataUnavailable(_)));
}

#[tokio::test]
async fn test_link_statistics_uses_granularity_window() {
    let service = AnalyticsService::new(populated_events().await, titles());

    let stats = service
        .link_statistics(1, Granularity::Month, None, at(2024, 3, 15, 0))
        .await
        .expect("link statistics");
    assert_eq!(stats.title, "Blog");
    assert_eq!(stats.total_clicks, 2);
    let labels: Vec<&str> = stats.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["2024-02", "2024-03"]);

    let stats = service
        .link_statistics(1, Granularity::Hour, None, at(2024, 3, 1, 12))
        .await
        .expect("link statistics");
    assert_eq!(stats.total_clicks, 1);
    assert_eq!(stats.buckets[0].label, "2024-03-01 09:00");
}

#[tokio::test]
async fn test_link_statistics_for_missing_link() {
    let service = AnalyticsService::new(populated_events().await, titles());
    let err = service
        .link_statistics(3, Granularity::Day, None, at(2024, 3, 15, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkpageError::NotFound(_)));
}

#[tokio::test]
async fn test_sqlite_event_store_roundtrip() {
    init_test_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("events.db").display()
    );
    let storage = StorageFactory::create_with_url(&db_url)
        .await
        .expect("Failed to create storage");

    let link = LinkService::new(storage.clone())
        .create_link(CreateLinkRequest {
            title: "Newsletter".to_string(),
            url: "https://news.example.com".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    storage.record_visit(at(2024, 5, 1, 8)).await.unwrap();
    storage.record_click(link.id, at(2024, 5, 1, 9)).await.unwrap();
    storage.record_click(link.id, at(2024, 5, 2, 9)).await.unwrap();
    storage.record_click(link.id, at(2023, 5, 2, 9)).await.unwrap();

    let service = AnalyticsService::new(storage.clone(), storage.clone());
    let range = TimeRange::new(at(2024, 5, 1, 0), at(2024, 5, 31, 0)).unwrap();
    let stats = service.statistics(range).await.expect("statistics");

    assert_eq!(stats.total_visits, 1);
    assert_eq!(stats.total_clicks, 2);
    assert_eq!(stats.links.len(), 1);
    assert_eq!(stats.links[0].title, "Newsletter");

    LinkService::new(storage.clone()).delete_link(link.id).await.unwrap();
    let stats = service.statistics(range).await.expect("statistics");
    assert_eq!(stats.total_clicks, 2);
    assert_eq!(stats.links[0].title, "Unknown");
}
