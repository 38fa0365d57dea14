//! Parabolic SAR + ADX — trend side from SAR, conviction from ADX.
//!
//! close > SAR: bullish; close < SAR: bearish; exactly on the SAR: neutral.
//! Confidence is HIGH when ADX is above the strong-trend threshold, LOW
//! otherwise (including when ADX has no value). TP = price +/- 4 ATR and
//! the stop trails at the current SAR.

use super::{atr_targets, build_signal, side, StrategyContext};
use crate::domain::{Confidence, Direction, Evidence, Signal};
use crate::error::AnalysisError;
use crate::frame::IndicatorKey;

pub(super) fn evaluate(ctx: &StrategyContext<'_>) -> Result<Signal, AnalysisError> {
    let t = &ctx.config.thresholds;
    let sar = ctx.latest(IndicatorKey::ParabolicSar)?;
    let adx = ctx.frame.latest(IndicatorKey::Adx);
    let price = ctx.current_price();

    let direction = side(price, sar);
    let sar_label = match direction {
        Direction::Bullish => "BULLISH_TREND",
        Direction::Bearish => "BEARISH_TREND",
        _ => "ON_SAR",
    };

    let strength = match adx {
        None => "UNAVAILABLE",
        Some(v) if v > t.adx_very_strong => "VERY_STRONG",
        Some(v) if v > t.adx_strong => "STRONG",
        Some(_) => "WEAK",
    };
    let confidence = if adx.is_some_and(|v| v > t.adx_strong) {
        Confidence::High
    } else {
        Confidence::Low
    };

    let mut evidence = Evidence::new()
        .with("sar_signal", sar_label)
        .with("sar_value", sar)
        .with("adx", adx)
        .with("adx_strength", strength);
    let (take_profit, _) = atr_targets(ctx, direction, 4.0, 0.0, &mut evidence);
    let stop_loss = if direction.is_directional() { sar } else { price };

    Ok(build_signal(
        ctx,
        direction,
        confidence,
        (take_profit, stop_loss),
        evidence,
    ))
}

#[cfg(test)]
mod tests {
    use crate::domain::{Confidence, Direction};
    use crate::frame::IndicatorKey;
    use crate::strategies::test_support::Fixture;
    use crate::strategies::StrategyKind;

    #[test]
    fn price_above_sar_with_strong_adx() {
        let fx = Fixture::new(40, 100.0)
            .set(IndicatorKey::ParabolicSar, 95.0, 96.0)
            .set(IndicatorKey::Adx, 30.0, 30.0)
            .set(IndicatorKey::Atr, 1.5, 1.5);
        let s = StrategyKind::ParabolicSarAdx.evaluate(&fx.ctx());
        assert_eq!(s.direction, Direction::Bullish);
        assert_eq!(s.confidence, Confidence::High);
        assert_eq!(s.take_profit, 106.0);
        assert_eq!(s.stop_loss, 96.0);
        assert_eq!(s.evidence.text("adx_strength"), Some("STRONG"));
    }

    #[test]
    fn price_below_sar_with_weak_adx() {
        let fx = Fixture::new(40, 100.0)
            .set(IndicatorKey::ParabolicSar, 105.0, 104.0)
            .set(IndicatorKey::Adx, 18.0, 18.0)
            .set(IndicatorKey::Atr, 1.0, 1.0);
        let s = StrategyKind::ParabolicSarAdx.evaluate(&fx.ctx());
        assert_eq!(s.direction, Direction::Bearish);
        assert_eq!(s.confidence, Confidence::Low);
        assert_eq!(s.take_profit, 96.0);
        assert_eq!(s.stop_loss, 104.0);
    }

    #[test]
    fn very_strong_label() {
        let fx = Fixture::new(40, 100.0)
            .set(IndicatorKey::ParabolicSar, 95.0, 96.0)
            .set(IndicatorKey::Adx, 45.0, 45.0);
        let s = StrategyKind::ParabolicSarAdx.evaluate(&fx.ctx());
        assert_eq!(s.evidence.text("adx_strength"), Some("VERY_STRONG"));
        // No ATR: percent fallback for the target, SAR still the stop.
        assert!((s.take_profit - 102.0).abs() < 1e-9);
        assert_eq!(s.stop_loss, 96.0);
    }

    #[test]
    fn missing_adx_is_low_confidence() {
        let fx = Fixture::new(40, 100.0).set(IndicatorKey::ParabolicSar, 95.0, 96.0);
        let s = StrategyKind::ParabolicSarAdx.evaluate(&fx.ctx());
        assert_eq!(s.direction, Direction::Bullish);
        assert_eq!(s.confidence, Confidence::Low);
        assert_eq!(s.evidence.text("adx_strength"), Some("UNAVAILABLE"));
    }

    #[test]
    fn close_on_sar_is_neutral() {
        let fx = Fixture::new(40, 100.0).set(IndicatorKey::ParabolicSar, 100.0, 100.0);
        let s = StrategyKind::ParabolicSarAdx.evaluate(&fx.ctx());
        assert_eq!(s.direction, Direction::Neutral);
        assert_eq!((s.take_profit, s.stop_loss), (100.0, 100.0));
    }
}
