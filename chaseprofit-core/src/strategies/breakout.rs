//! Breakout — the latest candle clearing a prior level on volume.
//!
//! The reference levels are those standing before the latest candle. On a
//! resistance breakout: TP = level + consolidation range and
//! SL = min(consolidation low, level - 10% of the range). Support breakouts
//! mirror it. Without a breakout the signal is neutral with a symmetric
//! 2 ATR band as targets.

use super::{build_signal, StrategyContext};
use crate::domain::{Confidence, Direction, Evidence, Signal};
use crate::error::AnalysisError;
use crate::frame::IndicatorKey;
use crate::levels::{BreakoutDetector, LevelDetector};

pub(super) fn evaluate(ctx: &StrategyContext<'_>) -> Result<Signal, AnalysisError> {
    let levels = &ctx.config.levels;
    let Some((latest, history)) = ctx.candles.split_last() else {
        return Err(AnalysisError::InsufficientData {
            what: "breakout".into(),
            required: 1,
            available: 0,
        });
    };

    let reference = LevelDetector::detect(history, levels.window);
    let breakout = BreakoutDetector::new(levels.breakout_lookback, levels.volume_confirmation_ratio)
        .detect(ctx.candles, &reference);
    let range = breakout.consolidation_range();
    let price = latest.close;
    let atr = ctx.frame.latest(IndicatorKey::Atr);

    let (direction, confidence, breakout_type, level) = match (
        breakout.resistance_breakout,
        breakout.support_breakout,
    ) {
        (true, _) => (
            Direction::Bullish,
            Confidence::High,
            "RESISTANCE_BREAKOUT",
            breakout.resistance_level,
        ),
        (_, true) => (
            Direction::Bearish,
            Confidence::High,
            "SUPPORT_BREAKOUT",
            breakout.support_level,
        ),
        _ => (Direction::Neutral, Confidence::Low, "CONSOLIDATION", None),
    };

    let (targets, basis) = match (direction, level) {
        (Direction::Bullish, Some(level)) => (
            (
                level + range,
                breakout.consolidation_low.min(level - 0.1 * range),
            ),
            "CONSOLIDATION_RANGE",
        ),
        (Direction::Bearish, Some(level)) => (
            (
                level - range,
                breakout.consolidation_high.max(level + 0.1 * range),
            ),
            "CONSOLIDATION_RANGE",
        ),
        _ => match atr {
            Some(atr) => ((price + 2.0 * atr, price - 2.0 * atr), "ATR"),
            None => ((price, price), "NONE"),
        },
    };

    let profile_window = levels.volume_profile_window.min(ctx.candles.len());
    let recent = &ctx.candles[ctx.candles.len() - profile_window..];
    let mean_volume = recent.iter().map(|c| c.volume).sum::<f64>() / profile_window as f64;
    let volume_profile = if latest.volume > mean_volume {
        "HIGH"
    } else {
        "AVERAGE"
    };
    let volatility = match atr {
        Some(atr) if range > atr => "HIGH",
        Some(_) => "NORMAL",
        None => "UNKNOWN",
    };

    let evidence = Evidence::new()
        .with("breakout_type", breakout_type)
        .with("breakout_level", level)
        .with("consolidation_high", breakout.consolidation_high)
        .with("consolidation_low", breakout.consolidation_low)
        .with("consolidation_range", range)
        .with("reference_resistance", breakout.resistance_level)
        .with("reference_support", breakout.support_level)
        .with("nearest_resistance", ctx.frame.latest(IndicatorKey::NearestResistance))
        .with("nearest_support", ctx.frame.latest(IndicatorKey::NearestSupport))
        .with("volume", latest.volume)
        .with("window_mean_volume", breakout.window_mean_volume)
        .with("volume_confirmed", breakout.volume_confirmed)
        .with("volume_profile", volume_profile)
        .with("volatility", volatility)
        .with("atr", atr)
        .with("target_basis", basis);

    Ok(build_signal(ctx, direction, confidence, targets, evidence))
}
