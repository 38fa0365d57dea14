//! Bollinger Bands — mean reversion at the band edges.
//!
//! close <= lower band: bullish. close >= upper band: bearish. Both HIGH.
//! Targets scale with the band range: TP = price +/- 0.5 range,
//! SL = price -/+ 0.25 range. A zero-width band is neutral with TP = SL = price.

use tracing::warn;

use super::{build_signal, direction_sign, StrategyContext};
use crate::domain::{Confidence, Direction, Evidence, EvidenceValue, Signal};
use crate::error::AnalysisError;
use crate::frame::IndicatorKey;

pub(super) fn evaluate(ctx: &StrategyContext<'_>) -> Result<Signal, AnalysisError> {
    let upper = ctx.latest(IndicatorKey::BbUpper)?;
    let middle = ctx.latest(IndicatorKey::BbMiddle)?;
    let lower = ctx.latest(IndicatorKey::BbLower)?;
    let price = ctx.current_price();
    let band_range = upper - lower;

    let (direction, confidence, label) = if band_range <= 0.0 {
        warn!(upper, lower, "zero-width Bollinger bands");
        (Direction::Neutral, Confidence::Low, "DEGENERATE_BANDS")
    } else if price <= lower {
        (Direction::Bullish, Confidence::High, "LOWER_BAND_OVERSOLD")
    } else if price >= upper {
        (Direction::Bearish, Confidence::High, "UPPER_BAND_OVERBOUGHT")
    } else {
        (Direction::Neutral, Confidence::Low, "INSIDE_BANDS")
    };

    let width_pct = if middle != 0.0 {
        EvidenceValue::Number(band_range / middle * 100.0)
    } else {
        EvidenceValue::Missing
    };

    let targets = match direction_sign(direction) {
        Some(sign) => (
            price + sign * 0.5 * band_range,
            price - sign * 0.25 * band_range,
        ),
        None => (price, price),
    };

    let evidence = Evidence::new()
        .with("bb_signal", label)
        .with("bb_upper", upper)
        .with("bb_middle", middle)
        .with("bb_lower", lower)
        .with("bb_width_pct", width_pct)
        .with("target_basis", "BAND_RANGE");

    Ok(build_signal(ctx, direction, confidence, targets, evidence))
}
