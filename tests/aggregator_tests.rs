//! Aggregator tests
//!
//! Bucketing and ranking over fixed timestamps.

use chrono::{DateTime, Duration, TimeZone, Utc};
use strum::IntoEnumIterator;

use linkpage::analytics::aggregator::{BucketCount, ClickEvent, UNKNOWN_LINK_TITLE};
use linkpage::analytics::{Granularity, TimeRange, bucket_counts, rank_links};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn year_2024() -> TimeRange {
    TimeRange::new(at(2024, 1, 1, 0, 0), at(2024, 12, 31, 23, 59)).unwrap()
}

fn click(link_id: i32, ts: DateTime<Utc>) -> ClickEvent {
    ClickEvent {
        link_id,
        timestamp: ts,
    }
}

#[test]
fn test_daily_clicks_for_january() {
    let clicks = vec![
        click(1, at(2024, 1, 2, 10, 0)),
        click(1, at(2024, 1, 2, 14, 0)),
        click(2, at(2024, 1, 3, 9, 0)),
    ];
    let range = TimeRange::new(at(2024, 1, 1, 0, 0), at(2024, 1, 31, 0, 0)).unwrap();

    let buckets = bucket_counts(clicks.iter().map(|c| c.timestamp), &range, Granularity::Day);
    assert_eq!(
        buckets,
        vec![
            BucketCount {
                bucket_start: at(2024, 1, 2, 0, 0),
                count: 2
            },
            BucketCount {
                bucket_start: at(2024, 1, 3, 0, 0),
                count: 1
            },
        ]
    );

    let ranked: Vec<(i32, u64)> = rank_links(&clicks, &range, |id| Some(format!("link-{}", id)))
        .iter()
        .map(|r| (r.link_id, r.count))
        .collect();
    assert_eq!(ranked, vec![(1, 2), (2, 1)]);
}

/// Mix of in-range and out-of-range events spread over hours and months
fn mixed_events() -> Vec<DateTime<Utc>> {
    let mut events = Vec::new();
    let base = at(2023, 11, 20, 0, 0);
    for i in 0..400 {
        events.push(base + Duration::hours(i * 37) + Duration::minutes(i % 60));
    }
    events.push(at(2024, 1, 1, 0, 0));
    events.push(at(2024, 12, 31, 23, 59));
    events.push(at(2025, 1, 1, 0, 0));
    events
}

#[test]
fn test_bucket_counts_is_repeatable() {
    let events = mixed_events();
    for granularity in Granularity::iter() {
        let first = bucket_counts(events.clone(), &year_2024(), granularity);
        let second = bucket_counts(events.clone(), &year_2024(), granularity);
        assert_eq!(first, second, "{}", granularity);
    }
}

#[test]
fn test_bucket_totals_match_in_range_events() {
    let events = mixed_events();
    let range = year_2024();
    let in_range = events.iter().filter(|t| range.contains(**t)).count() as u64;
    assert!(in_range > 0);
    assert!(in_range < events.len() as u64);

    for granularity in Granularity::iter() {
        let buckets = bucket_counts(events.clone(), &range, granularity);
        let total: u64 = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, in_range, "{}", granularity);
        assert!(buckets.iter().all(|b| b.count > 0));
    }
}

#[test]
fn test_hour_buckets() {
    let events = vec![
        at(2024, 3, 1, 10, 5),
        at(2024, 3, 1, 10, 59),
        at(2024, 3, 1, 11, 0),
    ];
    let buckets = bucket_counts(events, &year_2024(), Granularity::Hour);
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].bucket_start, at(2024, 3, 1, 10, 0));
    assert_eq!(buckets[0].count, 2);
    assert_eq!(buckets[1].bucket_start, at(2024, 3, 1, 11, 0));
    assert_eq!(buckets[1].count, 1);
}

#[test]
fn test_quarter_buckets() {
    let events = vec![
        at(2024, 1, 15, 0, 0),
        at(2024, 3, 31, 23, 0),
        at(2024, 4, 1, 0, 0),
        at(2024, 11, 2, 8, 0),
    ];
    let buckets = bucket_counts(events, &year_2024(), Granularity::Quarter);
    let starts: Vec<_> = buckets.iter().map(|b| (b.bucket_start, b.count)).collect();
    assert_eq!(
        starts,
        vec![
            (at(2024, 1, 1, 0, 0), 2),
            (at(2024, 4, 1, 0, 0), 1),
            (at(2024, 10, 1, 0, 0), 1),
        ]
    );
}

#[test]
fn test_buckets_are_sorted_and_sparse() {
    let events = vec![
        at(2024, 5, 3, 0, 0),
        at(2024, 1, 9, 0, 0),
        at(2024, 5, 1, 0, 0),
    ];
    let buckets = bucket_counts(events, &year_2024(), Granularity::Month);
    assert_eq!(buckets.len(), 2);
    assert!(buckets[0].bucket_start < buckets[1].bucket_start);
    assert_eq!(buckets[1].count, 2);
}

#[test]
fn test_events_outside_range_are_ignored() {
    let range = TimeRange::new(at(2024, 6, 1, 0, 0), at(2024, 6, 30, 0, 0)).unwrap();
    let events = vec![
        at(2024, 5, 31, 23, 59),
        at(2024, 6, 30, 0, 0),
        at(2024, 6, 30, 0, 1),
    ];
    let buckets = bucket_counts(events, &range, Granularity::Year);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].count, 1);
}

#[test]
fn test_empty_input_gives_no_buckets() {
    let buckets = bucket_counts(Vec::new(), &year_2024(), Granularity::Day);
    assert!(buckets.is_empty());
}

#[test]
fn test_rank_orders_by_count_then_id() {
    let t = at(2024, 2, 2, 12, 0);
    let clicks = vec![
        click(7, t),
        click(3, t),
        click(7, t),
        click(5, t),
        click(3, t),
        click(9, t),
        click(9, t),
        click(9, t),
    ];
    let ranked = rank_links(&clicks, &year_2024(), |id| Some(format!("link-{}", id)));
    let order: Vec<(i32, u64)> = ranked.iter().map(|r| (r.link_id, r.count)).collect();
    assert_eq!(order, vec![(9, 3), (3, 2), (7, 2), (5, 1)]);
    assert_eq!(ranked[0].title, "link-9");
}

#[test]
fn test_rank_keeps_deleted_links_as_unknown() {
    let t = at(2024, 2, 2, 12, 0);
    let clicks = vec![click(1, t), click(2, t), click(2, t)];
    let ranked = rank_links(&clicks, &year_2024(), |id| {
        (id == 1).then(|| "Portfolio".to_string())
    });
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].link_id, 2);
    assert_eq!(ranked[0].title, UNKNOWN_LINK_TITLE);
    assert_eq!(ranked[1].title, "Portfolio");
}

#[test]
fn test_default_windows_per_granularity() {
    let now = at(2024, 6, 15, 12, 0);
    assert_eq!(
        TimeRange::default_for(Granularity::Hour, now).start,
        at(2024, 6, 14, 12, 0)
    );
    assert_eq!(
        TimeRange::default_for(Granularity::Day, now).start,
        at(2024, 5, 16, 12, 0)
    );
    assert_eq!(
        TimeRange::default_for(Granularity::Month, now).start,
        at(2023, 6, 15, 12, 0)
    );
    assert_eq!(
        TimeRange::default_for(Granularity::Quarter, now).start,
        at(2022, 6, 15, 12, 0)
    );
    assert_eq!(
        TimeRange::default_for(Granularity::Year, now).start,
        at(2019, 6, 15, 12, 0)
    );
}

#[test]
fn test_granularity_parses_case_insensitively() {
    assert_eq!("HOUR".parse::<Granularity>().unwrap(), Granularity::Hour);
    assert_eq!("quarter".parse::<Granularity>().unwrap(), Granularity::Quarter);
    assert!("week".parse::<Granularity>().is_err());
}
