//! Consensus fusion — weighted vote of the six strategy signals.
//!
//! Each strategy adds its weight to the bucket of its direction (NO_DATA
//! counts as neutral). Bucket probabilities are weight shares in percent and
//! always sum to 100. The overall direction is the strict maximum bucket;
//! any tie resolves to NEUTRAL. Targets are weight-averaged over the
//! strategies that produced a positive take-profit.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::StrategyWeights;
use crate::domain::{round_to, Confidence, Direction, Signal};
use crate::strategies::{StrategyContext, StrategyKind};

/// Share of total weight per direction, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Probabilities {
    pub bullish: f64,
    pub bearish: f64,
    pub neutral: f64,
}

impl Probabilities {
    pub fn sum(&self) -> f64 {
        self.bullish + self.bearish + self.neutral
    }
}

/// The fused decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSignal {
    pub direction: Direction,
    pub confidence: Confidence,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub current_price: f64,
    pub probabilities: Probabilities,
}

/// Fused decision plus every strategy's own signal for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusResult {
    pub overall: OverallSignal,
    pub strategies: BTreeMap<StrategyKind, Signal>,
}

impl ConsensusResult {
    /// Copy with prices, probabilities and numeric evidence rounded for output.
    pub fn rounded(&self, digits: u32) -> Self {
        let o = &self.overall;
        Self {
            overall: OverallSignal {
                direction: o.direction,
                confidence: o.confidence,
                take_profit: round_to(o.take_profit, digits),
                stop_loss: round_to(o.stop_loss, digits),
                current_price: round_to(o.current_price, digits),
                probabilities: Probabilities {
                    bullish: round_to(o.probabilities.bullish, digits),
                    bearish: round_to(o.probabilities.bearish, digits),
                    neutral: round_to(o.probabilities.neutral, digits),
                },
            },
            strategies: self
                .strategies
                .iter()
                .map(|(kind, signal)| (*kind, signal.rounded(digits)))
                .collect(),
        }
    }
}

/// Evaluate all six strategies on `ctx` and fuse them.
pub fn fuse(ctx: &StrategyContext<'_>) -> ConsensusResult {
    let strategies: BTreeMap<StrategyKind, Signal> = StrategyKind::ALL
        .iter()
        .map(|kind| (*kind, kind.evaluate(ctx)))
        .collect();
    let overall = fuse_signals(&strategies, &ctx.config.weights, ctx.current_price());
    ConsensusResult {
        overall,
        strategies,
    }
}

/// Fuse already-computed strategy signals.
pub fn fuse_signals(
    signals: &BTreeMap<StrategyKind, Signal>,
    weights: &StrategyWeights,
    current_price: f64,
) -> OverallSignal {
    let mut bullish = 0.0;
    let mut bearish = 0.0;
    let mut neutral = 0.0;
    let mut target_weight = 0.0;
    let mut tp_sum = 0.0;
    let mut sl_sum = 0.0;

    for (kind, signal) in signals {
        let weight = kind.weight(weights);
        match signal.direction {
            Direction::Bullish => bullish += weight,
            Direction::Bearish => bearish += weight,
            Direction::Neutral | Direction::NoData => neutral += weight,
        }
        if signal.take_profit > 0.0 {
            target_weight += weight;
            tp_sum += signal.take_profit * weight;
            sl_sum += signal.stop_loss * weight;
        }
    }

    let total = bullish + bearish + neutral;
    let probabilities = if total > 0.0 {
        Probabilities {
            bullish: bullish / total * 100.0,
            bearish: bearish / total * 100.0,
            neutral: neutral / total * 100.0,
        }
    } else {
        Probabilities {
            bullish: 0.0,
            bearish: 0.0,
            neutral: 100.0,
        }
    };

    let Probabilities {
        bullish: bull,
        bearish: bear,
        neutral: neut,
    } = probabilities;
    let (direction, confidence) = if bull > bear && bull > neut {
        (Direction::Bullish, directional_confidence(bull))
    } else if bear > bull && bear > neut {
        (Direction::Bearish, directional_confidence(bear))
    } else {
        let confidence = if neut > 50.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        };
        (Direction::Neutral, confidence)
    };

    let (take_profit, stop_loss) = if target_weight > 0.0 {
        (tp_sum / target_weight, sl_sum / target_weight)
    } else {
        (current_price, current_price)
    };

    debug!(
        direction = direction.label(),
        confidence = ?confidence,
        bullish = bull,
        bearish = bear,
        neutral = neut,
        "consensus fused"
    );

    OverallSignal {
        direction,
        confidence,
        take_profit,
        stop_loss,
        current_price,
        probabilities,
    }
}

fn directional_confidence(probability: f64) -> Confidence {
    if probability > 60.0 {
        Confidence::High
    } else if probability > 40.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Evidence;

    fn signal(direction: Direction, take_profit: f64, stop_loss: f64) -> Signal {
        Signal {
            direction,
            confidence: Confidence::Medium,
            take_profit,
            stop_loss,
            current_price: 100.0,
            evidence: Evidence::new(),
        }
    }

    fn all(directions: [Direction; 6]) -> BTreeMap<StrategyKind, Signal> {
        StrategyKind::ALL
            .into_iter()
            .zip(directions)
            .map(|(kind, d)| (kind, signal(d, 100.0, 100.0)))
            .collect()
    }

    #[test]
    fn all_neutral_is_neutral_medium() {
        let out = fuse_signals(
            &all([Direction::Neutral; 6]),
            &StrategyWeights::default(),
            100.0,
        );
        assert_eq!(out.direction, Direction::Neutral);
        assert_eq!(out.confidence, Confidence::Medium);
        assert!((out.probabilities.neutral - 100.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_majority_wins() {
        use Direction::*;
        // Bullish: MA 1.2 + SAR 1.1 + BREAKOUT 1.3 = 3.6 of 6.3 → 57.1%
        let out = fuse_signals(
            &all([Bearish, Bullish, Neutral, Neutral, Bullish, Bullish]),
            &StrategyWeights::default(),
            100.0,
        );
        assert_eq!(out.direction, Bullish);
        assert_eq!(out.confidence, Confidence::Medium);
        assert!((out.probabilities.bullish - 3.6 / 6.3 * 100.0).abs() < 1e-9);
        assert!((out.probabilities.sum() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn tie_resolves_to_neutral() {
        let weights = StrategyWeights {
            rsi_macd: 1.0,
            moving_averages: 1.0,
            bollinger_bands: 1.0,
            stochastic_ema: 1.0,
            parabolic_sar_adx: 1.0,
            breakout: 1.0,
        };
        use Direction::*;
        let out = fuse_signals(
            &all([Bullish, Bullish, Bullish, Bearish, Bearish, Bearish]),
            &weights,
            100.0,
        );
        assert_eq!(out.direction, Neutral);
        assert_eq!(out.confidence, Confidence::Low);
    }

    #[test]
    fn no_data_counts_as_neutral_and_skips_targets() {
        let mut signals = all([Direction::Bullish; 6]);
        signals.insert(StrategyKind::Breakout, Signal::no_data(100.0, "short"));
        signals.insert(
            StrategyKind::RsiMacd,
            signal(Direction::Bullish, 110.0, 95.0),
        );
        let weights = StrategyWeights::default();
        let out = fuse_signals(&signals, &weights, 100.0);

        assert!((out.probabilities.neutral - 1.3 / 6.3 * 100.0).abs() < 1e-9);
        // Breakout (TP 0) is excluded from the target average.
        let expected_tp = (110.0 * 1.0 + 100.0 * (1.2 + 0.8 + 0.9 + 1.1)) / 5.0;
        assert!((out.take_profit - expected_tp).abs() < 1e-9);
    }

    #[test]
    fn no_positive_targets_falls_back_to_price() {
        let signals: BTreeMap<_, _> = StrategyKind::ALL
            .into_iter()
            .map(|k| (k, Signal::no_data(42.0, "short")))
            .collect();
        let out = fuse_signals(&signals, &StrategyWeights::default(), 42.0);
        assert_eq!((out.take_profit, out.stop_loss), (42.0, 42.0));
        assert_eq!(out.direction, Direction::Neutral);
    }

    #[test]
    fn rounding_applies_to_probabilities() {
        let out = ConsensusResult {
            overall: fuse_signals(
                &all([Direction::Bullish; 6]),
                &StrategyWeights::default(),
                100.123_456_789,
            ),
            strategies: BTreeMap::new(),
        }
        .rounded(6);
        assert_eq!(out.overall.current_price, 100.123457);
        assert_eq!(out.overall.probabilities.bullish, 100.0);
    }
}
