//! Criterion benchmarks for chart preparation hot paths.
//!
//! Benchmarks:
//! 1. Moving-average enrichment over the full timeline
//! 2. Critical-point sampling (plan only, and materialized)
//! 3. Full pipeline (tag baselines, hash, enrich, sample)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use foliochart_core::data::{synthetic_timeline, SyntheticOptions};
use foliochart_core::domain::Timeline;
use foliochart_core::indicators::{enrich_with_dma, DmaConfig};
use foliochart_core::sampling::plan_sample;
use foliochart_core::{prepare_chart_timeline, sample_timeline, ChartConfig, SamplingParams};

fn make_timeline(days: usize) -> Timeline {
    let opts = SyntheticOptions {
        gap_days: vec![days / 3],
        ..Default::default()
    };
    synthetic_timeline(days, 7, &opts)
}

fn bench_enrichment(c: &mut Criterion) {
    let mut group = c.benchmark_group("dma_enrichment");
    let config = DmaConfig::default();

    for &days in &[365, 1_095, 2_000] {
        let timeline = make_timeline(days);
        group.bench_with_input(BenchmarkId::new("dma_200", days), &days, |b, _| {
            b.iter(|| enrich_with_dma(black_box(&timeline), black_box(&config)));
        });
    }

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("critical_sampling");
    let params = SamplingParams::default();

    for &days in &[365, 1_095, 2_000] {
        let timeline = make_timeline(days);
        group.bench_with_input(BenchmarkId::new("plan", days), &days, |b, _| {
            b.iter(|| plan_sample(black_box(&timeline), black_box(&params)));
        });
        group.bench_with_input(BenchmarkId::new("materialize", days), &days, |b, _| {
            b.iter(|| sample_timeline(black_box(&timeline), black_box(&params)).len());
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_chart_timeline");
    group.sample_size(20);
    let config = ChartConfig::default();

    let timeline = make_timeline(2_000);
    group.bench_function("2000_days", |b| {
        b.iter(|| prepare_chart_timeline(black_box(timeline.clone()), black_box(&config)));
    });

    group.finish();
}

criterion_group!(benches, bench_enrichment, bench_sampling, bench_pipeline);
criterion_main!(benches);
