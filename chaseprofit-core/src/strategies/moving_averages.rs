//! Moving averages — SMA golden/death cross confirmed by the EMA pair.
//!
//! - Fresh SMA cross agreeing with the EMA side: that direction, HIGH.
//! - SMA trend (fast above/below slow) agreeing with the EMA side without a
//!   fresh cross: that direction, MEDIUM.
//! - Otherwise neutral.
//!
//! Targets: TP = price +/- 3 ATR, SL = price -/+ 1.5 ATR.

use super::{atr_targets, build_signal, cross, side, StrategyContext};
use crate::domain::{Confidence, Direction, Evidence, Signal};
use crate::error::AnalysisError;
use crate::frame::IndicatorKey;

pub(super) fn evaluate(ctx: &StrategyContext<'_>) -> Result<Signal, AnalysisError> {
    let sma_fast = ctx.latest(IndicatorKey::SmaFast)?;
    let sma_slow = ctx.latest(IndicatorKey::SmaSlow)?;
    let ema_fast = ctx.latest(IndicatorKey::EmaFast)?;
    let ema_slow = ctx.latest(IndicatorKey::EmaSlow)?;
    let sma_fast_prev = ctx.previous(IndicatorKey::SmaFast)?;
    let sma_slow_prev = ctx.previous(IndicatorKey::SmaSlow)?;

    let sma_cross = cross(sma_fast, sma_slow, sma_fast_prev, sma_slow_prev);
    let sma_trend = side(sma_fast, sma_slow);
    let ema_side = side(ema_fast, ema_slow);

    let sma_label = match (sma_cross, sma_trend) {
        (Some(Direction::Bullish), _) => "GOLDEN_CROSS_BULLISH",
        (Some(Direction::Bearish), _) => "DEATH_CROSS_BEARISH",
        (_, Direction::Bullish) => "UPTREND",
        (_, Direction::Bearish) => "DOWNTREND",
        _ => "NEUTRAL",
    };

    let (direction, confidence) = match sma_cross {
        Some(d) if d == ema_side => (d, Confidence::High),
        _ if ema_side.is_directional() && sma_trend == ema_side => (ema_side, Confidence::Medium),
        _ => (Direction::Neutral, Confidence::Low),
    };

    let mut evidence = Evidence::new()
        .with("sma_fast", sma_fast)
        .with("sma_slow", sma_slow)
        .with("ema_fast", ema_fast)
        .with("ema_slow", ema_slow)
        .with("sma_signal", sma_label)
        .with("ema_signal", ema_side.label());
    let targets = atr_targets(ctx, direction, 3.0, 1.5, &mut evidence);

    Ok(build_signal(ctx, direction, confidence, targets, evidence))
}
