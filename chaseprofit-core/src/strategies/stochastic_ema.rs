//! Stochastic + EMA.
//!
//! The stochastic reading is labelled by the first rule that matches:
//! both lines oversold, both overbought, %K crossing above %D, %K crossing
//! below %D. The close relative to the fast EMA must agree with it.
//! A fresh cross in the agreed direction gives HIGH; a zone reading alone
//! gives MEDIUM. Targets: TP = price +/- 2.5 ATR, SL = price -/+ 1.2 ATR.

use super::{atr_targets, build_signal, cross, side, StrategyContext};
use crate::domain::{Confidence, Direction, Evidence, Signal};
use crate::error::AnalysisError;
use crate::frame::IndicatorKey;

pub(super) fn evaluate(ctx: &StrategyContext<'_>) -> Result<Signal, AnalysisError> {
    let t = &ctx.config.thresholds;

    let k = ctx.latest(IndicatorKey::StochK)?;
    let d = ctx.latest(IndicatorKey::StochD)?;
    let k_prev = ctx.previous(IndicatorKey::StochK)?;
    let d_prev = ctx.previous(IndicatorKey::StochD)?;
    let ema = ctx.latest(IndicatorKey::EmaFast)?;
    let price = ctx.current_price();

    let fresh_cross = cross(k, d, k_prev, d_prev);
    let (stoch_bias, stoch_label) = if k < t.stoch_oversold && d < t.stoch_oversold {
        (Direction::Bullish, "OVERSOLD_BULLISH")
    } else if k > t.stoch_overbought && d > t.stoch_overbought {
        (Direction::Bearish, "OVERBOUGHT_BEARISH")
    } else {
        match fresh_cross {
            Some(Direction::Bullish) => (Direction::Bullish, "CROSS_UP_BULLISH"),
            Some(Direction::Bearish) => (Direction::Bearish, "CROSS_DOWN_BEARISH"),
            _ => (Direction::Neutral, "NEUTRAL"),
        }
    };
    let ema_side = side(price, ema);

    let (direction, confidence) = if stoch_bias.is_directional() && stoch_bias == ema_side {
        if fresh_cross == Some(stoch_bias) {
            (stoch_bias, Confidence::High)
        } else {
            (stoch_bias, Confidence::Medium)
        }
    } else {
        (Direction::Neutral, Confidence::Low)
    };

    let mut evidence = Evidence::new()
        .with("stoch_k", k)
        .with("stoch_d", d)
        .with("stoch_signal", stoch_label)
        .with("ema_fast", ema)
        .with("ema_signal", ema_side.label());
    let targets = atr_targets(ctx, direction, 2.5, 1.2, &mut evidence);

    Ok(build_signal(ctx, direction, confidence, targets, evidence))
}
