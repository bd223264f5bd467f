//! 统计聚合性能基准测试

use std::hint::black_box;

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use linkpage::analytics::{ClickEvent, Granularity, TimeRange, bucket_counts, rank_links};

fn sample_timestamps(n: usize) -> (Vec<DateTime<Utc>>, TimeRange) {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    // 一年内均匀分布
    let step = Duration::seconds(365 * 24 * 3600 / n as i64);
    let timestamps = (0..n).map(|i| start + step * i as i32).collect();
    let range = TimeRange::trailing_days(start + Duration::days(365), 365);
    (timestamps, range)
}

// ============== bucket_counts 基准测试 ==============

fn bench_bucket_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator/bucket_counts");

    for size in [1_000usize, 100_000] {
        let (timestamps, range) = sample_timestamps(size);
        for granularity in [Granularity::Hour, Granularity::Day, Granularity::Quarter] {
            group.bench_with_input(
                BenchmarkId::new(granularity.to_string(), size),
                &timestamps,
                |b, ts| {
                    b.iter(|| bucket_counts(black_box(ts.iter().copied()), &range, granularity));
                },
            );
        }
    }

    group.finish();
}

// ============== rank_links 基准测试 ==============

fn bench_rank_links(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator/rank_links");

    let (timestamps, range) = sample_timestamps(100_000);
    let clicks: Vec<ClickEvent> = timestamps
        .into_iter()
        .enumerate()
        .map(|(i, timestamp)| ClickEvent {
            link_id: (i % 50) as i32,
            timestamp,
        })
        .collect();

    group.bench_function("50_links_100k_clicks", |b| {
        b.iter(|| rank_links(black_box(&clicks), &range, |id| Some(format!("link-{}", id))));
    });

    group.finish();
}

criterion_group!(benches, bench_bucket_counts, bench_rank_links);
criterion_main!(benches);
