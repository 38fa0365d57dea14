//! Criterion benchmarks for the analysis hot path.
//!
//! Benchmarks:
//! 1. Indicator frame computation
//! 2. Consensus fusion over a precomputed frame
//! 3. Full `analyze` (frame + strategies + fusion + report) at several lengths

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chaseprofit_core::domain::{Candle, Series};
use chaseprofit_core::{
    analyze, fuse, AnalysisConfig, AnalysisRequest, IndicatorFrame, StrategyContext,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> Series {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let candles = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            Candle {
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: close + 1.5,
                low: open - 1.5,
                close,
                volume: 1_000.0 + (i % 50) as f64 * 20.0,
            }
        })
        .collect();
    Series::new(candles).unwrap()
}

// ── 1. Indicator frame ───────────────────────────────────────────────

fn bench_frame(c: &mut Criterion) {
    let series = make_series(200);
    let config = AnalysisConfig::default();
    c.bench_function("indicator_frame_200", |b| {
        b.iter(|| IndicatorFrame::compute(black_box(&series), black_box(&config)))
    });
}

// ── 2. Fusion ────────────────────────────────────────────────────────

fn bench_fusion(c: &mut Criterion) {
    let series = make_series(200);
    let config = AnalysisConfig::default();
    let frame = IndicatorFrame::compute(&series, &config);
    c.bench_function("consensus_fuse_200", |b| {
        b.iter(|| {
            let ctx = StrategyContext::new(series.candles(), &frame, &config);
            fuse(black_box(&ctx))
        })
    });
}

// ── 3. Full analysis ─────────────────────────────────────────────────

fn bench_analyze(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let request = AnalysisRequest::new("BENCH", "1h");
    let mut group = c.benchmark_group("analyze");
    for n in [60, 200, 1000] {
        let series = make_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, series| {
            b.iter(|| analyze(black_box(&request), black_box(series), black_box(&config)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_frame, bench_fusion, bench_analyze);
criterion_main!(benches);
