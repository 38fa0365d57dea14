//! RSI + MACD — momentum extreme confirmed by a fresh MACD cross.
//!
//! Bullish: RSI below the oversold threshold and MACD crossing above its
//! signal line on the latest candle. Bearish mirrors it. Anything else is
//! neutral. Targets: TP = price +/- 2 ATR, SL = price -/+ 1 ATR.

use super::{atr_targets, build_signal, cross, StrategyContext};
use crate::domain::{Confidence, Direction, Evidence, Signal};
use crate::error::AnalysisError;
use crate::frame::IndicatorKey;

pub(super) fn evaluate(ctx: &StrategyContext<'_>) -> Result<Signal, AnalysisError> {
    let t = &ctx.config.thresholds;

    let rsi = ctx.latest(IndicatorKey::Rsi)?;
    let macd = ctx.latest(IndicatorKey::Macd)?;
    let signal_line = ctx.latest(IndicatorKey::MacdSignal)?;
    let macd_prev = ctx.previous(IndicatorKey::Macd)?;
    let signal_prev = ctx.previous(IndicatorKey::MacdSignal)?;

    let (rsi_bias, rsi_label) = if rsi < t.rsi_oversold {
        (Direction::Bullish, "OVERSOLD_BULLISH")
    } else if rsi > t.rsi_overbought {
        (Direction::Bearish, "OVERBOUGHT_BEARISH")
    } else {
        (Direction::Neutral, "NEUTRAL")
    };

    let macd_cross = cross(macd, signal_line, macd_prev, signal_prev);
    let macd_label = match macd_cross {
        Some(Direction::Bullish) => "CROSS_UP_BULLISH",
        Some(Direction::Bearish) => "CROSS_DOWN_BEARISH",
        _ => "NEUTRAL",
    };

    let (direction, confidence) = match macd_cross {
        Some(d) if d == rsi_bias => (d, Confidence::High),
        _ => (Direction::Neutral, Confidence::Low),
    };

    let mut evidence = Evidence::new()
        .with("rsi", rsi)
        .with("rsi_signal", rsi_label)
        .with("macd", macd)
        .with("macd_signal_line", signal_line)
        .with("macd_histogram", ctx.frame.latest(IndicatorKey::MacdHistogram))
        .with("macd_signal", macd_label);
    let targets = atr_targets(ctx, direction, 2.0, 1.0, &mut evidence);

    Ok(build_signal(ctx, direction, confidence, targets, evidence))
}

#[cfg(test)]
mod tests {
    use crate::domain::{Confidence, Direction};
    use crate::frame::IndicatorKey;
    use crate::strategies::test_support::Fixture;
    use crate::strategies::StrategyKind;

    fn fixture(rsi: f64, macd: (f64, f64), signal: (f64, f64)) -> Fixture {
        Fixture::new(40, 100.0)
            .set(IndicatorKey::Rsi, rsi, rsi)
            .set(IndicatorKey::Macd, macd.0, macd.1)
            .set(IndicatorKey::MacdSignal, signal.0, signal.1)
            .set(IndicatorKey::Atr, 2.0, 2.0)
    }

    #[test]
    fn oversold_with_cross_up_is_bullish_high() {
        let fx = fixture(25.0, (-1.0, 0.5), (0.0, 0.0));
        let s = StrategyKind::RsiMacd.evaluate(&fx.ctx());
        assert_eq!(s.direction, Direction::Bullish);
        assert_eq!(s.confidence, Confidence::High);
        assert_eq!(s.take_profit, 104.0);
        assert_eq!(s.stop_loss, 98.0);
        assert_eq!(s.evidence.text("macd_signal"), Some("CROSS_UP_BULLISH"));
        assert_eq!(s.evidence.number("rsi"), Some(25.0));
    }

    #[test]
    fn overbought_with_cross_down_is_bearish_high() {
        let fx = fixture(75.0, (1.0, -0.5), (0.0, 0.0));
        let s = StrategyKind::RsiMacd.evaluate(&fx.ctx());
        assert_eq!(s.direction, Direction::Bearish);
        assert_eq!(s.take_profit, 96.0);
        assert_eq!(s.stop_loss, 102.0);
    }

    #[test]
    fn oversold_without_cross_is_neutral() {
        let fx = fixture(25.0, (0.5, 0.6), (0.0, 0.0));
        let s = StrategyKind::RsiMacd.evaluate(&fx.ctx());
        assert_eq!(s.direction, Direction::Neutral);
        assert_eq!(s.confidence, Confidence::Low);
        assert_eq!((s.take_profit, s.stop_loss), (100.0, 100.0));
    }

    #[test]
    fn disagreement_is_neutral() {
        let fx = fixture(75.0, (-1.0, 0.5), (0.0, 0.0));
        let s = StrategyKind::RsiMacd.evaluate(&fx.ctx());
        assert_eq!(s.direction, Direction::Neutral);
        assert_eq!(s.evidence.text("rsi_signal"), Some("OVERBOUGHT_BEARISH"));
    }
}
