//! Analytics service
//!
//! Pulls raw events for a range from the event store and hands them to the
//! aggregator. An unreachable store is reported as `DataUnavailable`,
//! never as an empty result.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};

use crate::analytics::{
    BucketCount, EventStore, Granularity, LinkRank, LinkTitleLookup, TimeRange, bucket_counts,
    link_ids_in_range, rank_links,
};
use crate::errors::{LinkpageError, Result};

/// One point of a chart series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub bucket_start: DateTime<Utc>,
    pub label: String,
    pub count: u64,
}

impl SeriesPoint {
    fn from_bucket(bucket: BucketCount, granularity: Granularity) -> Self {
        Self {
            label: granularity.label(bucket.bucket_start),
            bucket_start: bucket.bucket_start,
            count: bucket.count,
        }
    }
}

/// Dashboard overview
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub range: TimeRange,
    pub granularity: Granularity,
    pub visits: Vec<SeriesPoint>,
    pub clicks: Vec<SeriesPoint>,
    pub total_visits: u64,
    pub total_clicks: u64,
    pub links: Vec<LinkRank>,
}

/// Click history of a single link
#[derive(Debug, Clone, Serialize)]
pub struct LinkStatistics {
    pub link_id: i32,
    pub title: String,
    pub range: TimeRange,
    pub granularity: Granularity,
    pub buckets: Vec<SeriesPoint>,
    pub total_clicks: u64,
}

fn unavailable(err: LinkpageError) -> LinkpageError {
    error!("Event store query failed: {}", err);
    LinkpageError::data_unavailable(format!("Analytics data unavailable: {}", err.message()))
}

fn series(buckets: Vec<BucketCount>, granularity: Granularity) -> (Vec<SeriesPoint>, u64) {
    let total = buckets.iter().map(|b| b.count).sum();
    let points = buckets
        .into_iter()
        .map(|b| SeriesPoint::from_bucket(b, granularity))
        .collect();
    (points, total)
}

pub struct AnalyticsService {
    events: Arc<dyn EventStore>,
    titles: Arc<dyn LinkTitleLookup>,
}

impl AnalyticsService {
    pub fn new(events: Arc<dyn EventStore>, titles: Arc<dyn LinkTitleLookup>) -> Self {
        Self { events, titles }
    }

    /// Visits and clicks per day, plus links ranked by clicks.
    pub async fn statistics(&self, range: TimeRange) -> Result<Statistics> {
        let visit_times = self
            .events
            .visit_timestamps(&range)
            .await
            .map_err(unavailable)?;
        let clicks = self
            .events
            .click_events(&range, None)
            .await
            .map_err(unavailable)?;

        let ids = link_ids_in_range(&clicks, &range);
        let titles = self.titles.link_titles(&ids).await.map_err(unavailable)?;

        let granularity = Granularity::Day;
        let (visits, total_visits) = series(bucket_counts(visit_times, &range, granularity), granularity);
        let (click_series, total_clicks) = series(
            bucket_counts(clicks.iter().map(|c| c.timestamp), &range, granularity),
            granularity,
        );
        let links = rank_links(&clicks, &range, |id| titles.get(&id).cloned());

        debug!(
            "Statistics {}..{}: {} visits, {} clicks, {} links",
            range.start, range.end, total_visits, total_clicks, links.len()
        );

        Ok(Statistics {
            range,
            granularity,
            visits,
            clicks: click_series,
            total_visits,
            total_clicks,
            links,
        })
    }

    /// Overview for the trailing `days` days ending at `now`.
    pub async fn statistics_for_days(&self, days: i64, now: DateTime<Utc>) -> Result<Statistics> {
        if days <= 0 {
            return Err(LinkpageError::validation("days must be a positive number"));
        }
        self.statistics(TimeRange::trailing_days(now, days)).await
    }

    /// Click buckets for one link. Without an explicit range the window
    /// depends on the granularity (24h for hour up to 5 years for year).
    pub async fn link_statistics(
        &self,
        link_id: i32,
        granularity: Granularity,
        range: Option<TimeRange>,
        now: DateTime<Utc>,
    ) -> Result<LinkStatistics> {
        let range = range.unwrap_or_else(|| TimeRange::default_for(granularity, now));

        let titles = self
            .titles
            .link_titles(&[link_id])
            .await
            .map_err(unavailable)?;
        let title = titles
            .get(&link_id)
            .cloned()
            .ok_or_else(|| LinkpageError::not_found(format!("Link not found: {}", link_id)))?;

        let clicks = self
            .events
            .click_events(&range, Some(link_id))
            .await
            .map_err(unavailable)?;

        let (buckets, total_clicks) = series(
            bucket_counts(
                clicks
                    .iter()
                    .filter(|c| c.link_id == link_id)
                    .map(|c| c.timestamp),
                &range,
                granularity,
            ),
            granularity,
        );

        Ok(LinkStatistics {
            link_id,
            title,
            range,
            granularity,
            buckets,
            total_clicks,
        })
    }
}
