//! End-to-end scenarios through the public API.
//!
//! A. Flat series: every strategy neutral, consensus NEUTRAL, TP = SL = price.
//! B. Steady uptrend: moving averages bullish; HIGH on the golden-cross candle.
//! C. Close exactly on the upper Bollinger band: bearish, HIGH.
//! D. Volume spike through a prior resistance: bullish resistance breakout.

use chaseprofit_core::domain::{Candle, Confidence, Direction, Series};
use chaseprofit_core::{
    analyze, fuse, AnalysisConfig, AnalysisOutcome, AnalysisRequest, IndicatorFrame, IndicatorKey,
    StrategyContext, StrategyKind, StrategySelection,
};
use chrono::{NaiveDate, NaiveDateTime};

// ── Helpers ──────────────────────────────────────────────────────────

fn ts(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::hours(i as i64)
}

fn candle(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
    Candle {
        timestamp: ts(i),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Candles from closes: open = previous close, wicks of 0.5 either side.
fn from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            candle(
                i,
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                1000.0,
            )
        })
        .collect()
}

fn single(kind: StrategyKind, series: &Series) -> chaseprofit_core::domain::Signal {
    let config = AnalysisConfig::default();
    let frame = IndicatorFrame::compute(series, &config);
    kind.evaluate(&StrategyContext::new(series.candles(), &frame, &config))
}

// ── A. Flat series ───────────────────────────────────────────────────

#[test]
fn scenario_a_flat_series_is_neutral() {
    let candles: Vec<Candle> = (0..60)
        .map(|i| candle(i, 100.0, 100.0, 100.0, 100.0, 1000.0))
        .collect();
    let series = Series::new(candles).unwrap();
    let config = AnalysisConfig::default();
    let frame = IndicatorFrame::compute(&series, &config);
    let result = fuse(&StrategyContext::new(series.candles(), &frame, &config));

    for (kind, signal) in &result.strategies {
        assert!(
            matches!(signal.direction, Direction::Neutral | Direction::NoData),
            "{kind} should not take a side on a flat series, got {:?}",
            signal.direction
        );
    }
    assert_eq!(result.overall.direction, Direction::Neutral);
    assert_eq!(result.overall.confidence, Confidence::Medium);
    assert!((result.overall.take_profit - 100.0).abs() < 1e-9);
    assert!((result.overall.stop_loss - 100.0).abs() < 1e-9);
    assert!((result.overall.probabilities.neutral - 100.0).abs() < 1e-9);

    let bb = &result.strategies[&StrategyKind::BollingerBands];
    assert_eq!(bb.evidence.text("bb_signal"), Some("DEGENERATE_BANDS"));
}

// ── B. Steady uptrend ────────────────────────────────────────────────

#[test]
fn scenario_b_uptrend_moving_averages_bullish() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let series = Series::new(from_closes(&closes)).unwrap();
    let signal = single(StrategyKind::MovingAverages, &series);

    assert_eq!(signal.direction, Direction::Bullish);
    // Trend already established: aligned averages without a fresh cross.
    assert_eq!(signal.confidence, Confidence::Medium);
    assert_eq!(signal.evidence.text("ema_signal"), Some("BULLISH"));
    assert_eq!(signal.evidence.text("sma_signal"), Some("UPTREND"));
    assert!(signal.take_profit > signal.current_price);
    assert!(signal.stop_loss < signal.current_price);
}

#[test]
fn scenario_b_golden_cross_candle_is_high() {
    // Decline long enough for both SMAs to exist, then a sharp recovery.
    let mut closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
    closes.extend((1..=40).map(|i| 141.0 + 3.0 * i as f64));
    let candles = from_closes(&closes);

    let config = AnalysisConfig::default();
    let full = IndicatorFrame::compute(&Series::new(candles.clone()).unwrap(), &config);
    let fast = full.column(IndicatorKey::SmaFast);
    let slow = full.column(IndicatorKey::SmaSlow);
    let cross_at = (50..closes.len())
        .find(|&i| {
            let (Some(f), Some(s), Some(fp), Some(sp)) = (fast[i], slow[i], fast[i - 1], slow[i - 1])
            else {
                return false;
            };
            f > s && fp <= sp
        })
        .expect("recovery should produce a golden cross");

    // Cut the series at the cross so it lands on the latest candle.
    let series = Series::new(candles[..=cross_at].to_vec()).unwrap();
    let signal = single(StrategyKind::MovingAverages, &series);

    assert_eq!(signal.evidence.text("sma_signal"), Some("GOLDEN_CROSS_BULLISH"));
    assert_eq!(signal.direction, Direction::Bullish);
    assert_eq!(signal.confidence, Confidence::High);
}

// ── C. Close on the upper band ───────────────────────────────────────

#[test]
fn scenario_c_close_on_upper_band_is_bearish_high() {
    let candles = from_closes(&[100.0, 101.0, 103.5]);
    let n = candles.len();
    let mut upper = vec![None; n];
    let mut middle = vec![None; n];
    let mut lower = vec![None; n];
    upper[n - 1] = Some(103.5);
    middle[n - 1] = Some(100.0);
    lower[n - 1] = Some(96.5);

    let frame = IndicatorFrame::empty(n)
        .with_column(IndicatorKey::BbUpper, upper)
        .with_column(IndicatorKey::BbMiddle, middle)
        .with_column(IndicatorKey::BbLower, lower);
    let config = AnalysisConfig::default();
    let signal =
        StrategyKind::BollingerBands.evaluate(&StrategyContext::new(&candles, &frame, &config));

    assert_eq!(signal.direction, Direction::Bearish);
    assert_eq!(signal.confidence, Confidence::High);
    // range 7: TP = 103.5 - 3.5, SL = 103.5 + 1.75
    assert!((signal.take_profit - 100.0).abs() < 1e-9);
    assert!((signal.stop_loss - 105.25).abs() < 1e-9);
}

// ── D. Resistance breakout ───────────────────────────────────────────

fn breakout_series() -> Series {
    let mut candles: Vec<Candle> = (0..59)
        .map(|i| candle(i, 100.0, 101.0, 99.0, 100.0, 1000.0))
        .collect();
    // Prior resistance well inside the centered level window.
    candles[30] = candle(30, 101.0, 106.0, 100.0, 104.0, 1200.0);
    // Latest candle: close through 106 at a new high on 5x volume.
    candles.push(candle(59, 101.0, 108.0, 100.5, 107.5, 5000.0));
    Series::new(candles).unwrap()
}

#[test]
fn scenario_d_volume_breakout_is_bullish() {
    let signal = single(StrategyKind::Breakout, &breakout_series());

    assert_eq!(signal.direction, Direction::Bullish);
    assert_eq!(signal.confidence, Confidence::High);
    assert_eq!(signal.evidence.text("breakout_type"), Some("RESISTANCE_BREAKOUT"));
    assert_eq!(signal.evidence.number("reference_resistance"), Some(106.0));
    assert_eq!(signal.evidence.number("consolidation_range"), Some(2.0));
    // TP = level + consolidation range; SL = min(consolidation low, level - 10%).
    assert_eq!(signal.take_profit, 108.0);
    assert_eq!(signal.stop_loss, 99.0);
    assert_eq!(signal.evidence.text("volume_profile"), Some("HIGH"));
}

#[test]
fn scenario_d_through_the_report() {
    let request = AnalysisRequest::new("ETHUSDT", "4h")
        .with_selection(StrategySelection::Single(StrategyKind::Breakout));
    let report = analyze(&request, &breakout_series(), &AnalysisConfig::default());

    assert!(report.success);
    assert_eq!(report.data_points, 60);
    match report.result {
        Some(AnalysisOutcome::Single {
            strategy,
            signal,
            risk_reward,
        }) => {
            assert_eq!(strategy, StrategyKind::Breakout);
            assert_eq!(signal.direction, Direction::Bullish);
            // reward 0.5, risk 8.5
            let rr = risk_reward.expect("directional result carries risk/reward");
            assert!((rr.ratio - 0.5 / 8.5).abs() < 1e-6);
        }
        other => panic!("expected single-strategy outcome, got {other:?}"),
    }
}
