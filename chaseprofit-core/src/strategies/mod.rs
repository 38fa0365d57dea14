//! Strategy signal set — six independent indicator-family strategies.
//!
//! Each strategy reads the latest (and for crosses, the previous) row of a
//! shared `IndicatorFrame` and produces a fresh `Signal`. Strategies never
//! see each other's output. A strategy whose inputs are not yet available
//! returns a NO_DATA signal instead of failing the whole analysis.

pub mod bollinger;
pub mod breakout;
pub mod moving_averages;
pub mod parabolic_sar_adx;
pub mod rsi_macd;
pub mod stochastic_ema;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, StrategyWeights};
use crate::domain::{Candle, Confidence, Direction, Evidence, Signal};
use crate::error::AnalysisError;
use crate::frame::{IndicatorFrame, IndicatorKey};

/// The closed set of strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyKind {
    #[serde(rename = "RSI_MACD")]
    RsiMacd,
    #[serde(rename = "MA")]
    MovingAverages,
    #[serde(rename = "BB")]
    BollingerBands,
    #[serde(rename = "STOCH_EMA")]
    StochasticEma,
    #[serde(rename = "SAR_ADX")]
    ParabolicSarAdx,
    #[serde(rename = "BREAKOUT")]
    Breakout,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        Self::RsiMacd,
        Self::MovingAverages,
        Self::BollingerBands,
        Self::StochasticEma,
        Self::ParabolicSarAdx,
        Self::Breakout,
    ];

    /// Wire name.
    pub fn key(&self) -> &'static str {
        match self {
            Self::RsiMacd => "RSI_MACD",
            Self::MovingAverages => "MA",
            Self::BollingerBands => "BB",
            Self::StochasticEma => "STOCH_EMA",
            Self::ParabolicSarAdx => "SAR_ADX",
            Self::Breakout => "BREAKOUT",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::RsiMacd => "RSI + MACD",
            Self::MovingAverages => "Moving averages (SMA cross + EMA)",
            Self::BollingerBands => "Bollinger Bands",
            Self::StochasticEma => "Stochastic + EMA",
            Self::ParabolicSarAdx => "Parabolic SAR + ADX",
            Self::Breakout => "Support/resistance breakout",
        }
    }

    /// Fusion weight of this strategy.
    pub fn weight(&self, weights: &StrategyWeights) -> f64 {
        match self {
            Self::RsiMacd => weights.rsi_macd,
            Self::MovingAverages => weights.moving_averages,
            Self::BollingerBands => weights.bollinger_bands,
            Self::StochasticEma => weights.stochastic_ema,
            Self::ParabolicSarAdx => weights.parabolic_sar_adx,
            Self::Breakout => weights.breakout,
        }
    }

    /// Run this strategy against the latest candle of `ctx`.
    pub fn evaluate(&self, ctx: &StrategyContext<'_>) -> Signal {
        let outcome = match self {
            Self::RsiMacd => rsi_macd::evaluate(ctx),
            Self::MovingAverages => moving_averages::evaluate(ctx),
            Self::BollingerBands => bollinger::evaluate(ctx),
            Self::StochasticEma => stochastic_ema::evaluate(ctx),
            Self::ParabolicSarAdx => parabolic_sar_adx::evaluate(ctx),
            Self::Breakout => breakout::evaluate(ctx),
        };

        let signal = outcome.unwrap_or_else(|err| {
            debug!(strategy = self.key(), error = %err, "strategy has no data");
            Signal::no_data(ctx.current_price(), err.to_string())
        });

        debug!(
            strategy = self.key(),
            direction = signal.direction.label(),
            confidence = ?signal.confidence,
            take_profit = signal.take_profit,
            stop_loss = signal.stop_loss,
            "strategy evaluated"
        );
        signal
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StrategyKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AnalysisError::UnknownStrategy(s.to_string()))
    }
}

/// Everything a strategy may read: the candles, their indicator frame, and
/// the configuration they were computed with.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub candles: &'a [Candle],
    pub frame: &'a IndicatorFrame,
    pub config: &'a AnalysisConfig,
}

impl<'a> StrategyContext<'a> {
    pub fn new(candles: &'a [Candle], frame: &'a IndicatorFrame, config: &'a AnalysisConfig) -> Self {
        Self {
            candles,
            frame,
            config,
        }
    }

    /// Close of the latest candle.
    pub fn current_price(&self) -> f64 {
        self.candles.last().map_or(0.0, |c| c.close)
    }

    /// Value of `key` at the latest candle, or `InsufficientData`.
    pub fn latest(&self, key: IndicatorKey) -> Result<f64, AnalysisError> {
        self.frame
            .latest(key)
            .ok_or_else(|| self.insufficient(key, "latest"))
    }

    /// Value of `key` at the candle before the latest, or `InsufficientData`.
    pub fn previous(&self, key: IndicatorKey) -> Result<f64, AnalysisError> {
        self.frame
            .previous(key)
            .ok_or_else(|| self.insufficient(key, "previous"))
    }

    fn insufficient(&self, key: IndicatorKey, position: &str) -> AnalysisError {
        let back = usize::from(position == "previous");
        AnalysisError::InsufficientData {
            what: format!("{} at the {position} candle", key.name()),
            required: required_candles(key, self.config) + back,
            available: self.frame.len(),
        }
    }
}

/// Candles needed before `key` has its first value.
fn required_candles(key: IndicatorKey, config: &AnalysisConfig) -> usize {
    let p = &config.indicators;
    match key {
        IndicatorKey::Rsi => p.rsi_period + 1,
        IndicatorKey::Macd => p.macd_slow,
        IndicatorKey::MacdSignal | IndicatorKey::MacdHistogram => p.macd_slow + p.macd_signal - 1,
        IndicatorKey::SmaFast => p.sma_fast,
        IndicatorKey::SmaSlow => p.sma_slow,
        IndicatorKey::EmaFast => p.ema_fast,
        IndicatorKey::EmaSlow => p.ema_slow,
        IndicatorKey::BbUpper | IndicatorKey::BbMiddle | IndicatorKey::BbLower => {
            p.bollinger_period
        }
        IndicatorKey::StochK => p.stoch_k_period,
        IndicatorKey::StochD => p.stoch_k_period + p.stoch_d_period - 1,
        IndicatorKey::ParabolicSar => 2,
        IndicatorKey::Adx => 2 * p.adx_period,
        IndicatorKey::Atr => p.atr_period + 1,
        IndicatorKey::Resistance
        | IndicatorKey::Support
        | IndicatorKey::NearestResistance
        | IndicatorKey::NearestSupport => config.levels.window,
    }
}

/// Strict crossover of `fast` over `slow` on the latest candle.
///
/// Bullish: fast > slow now and fast <= slow before.
/// Bearish: fast < slow now and fast >= slow before.
pub(crate) fn cross(fast_now: f64, slow_now: f64, fast_prev: f64, slow_prev: f64) -> Option<Direction> {
    if fast_now > slow_now && fast_prev <= slow_prev {
        Some(Direction::Bullish)
    } else if fast_now < slow_now && fast_prev >= slow_prev {
        Some(Direction::Bearish)
    } else {
        None
    }
}

/// Bullish when `a > b`, bearish when `a < b`, neutral when equal.
pub(crate) fn side(a: f64, b: f64) -> Direction {
    if a > b {
        Direction::Bullish
    } else if a < b {
        Direction::Bearish
    } else {
        Direction::Neutral
    }
}

/// +1 for bullish, -1 for bearish, `None` otherwise.
pub(crate) fn direction_sign(direction: Direction) -> Option<f64> {
    match direction {
        Direction::Bullish => Some(1.0),
        Direction::Bearish => Some(-1.0),
        Direction::Neutral | Direction::NoData => None,
    }
}

/// ATR-multiple take-profit and stop-loss around the current price.
///
/// Non-directional signals get TP = SL = price. A missing or zero ATR falls
/// back to price +/- `fallback_pct`, recorded as `target_basis`.
pub(crate) fn atr_targets(
    ctx: &StrategyContext<'_>,
    direction: Direction,
    tp_multiple: f64,
    sl_multiple: f64,
    evidence: &mut Evidence,
) -> (f64, f64) {
    let price = ctx.current_price();
    let atr = ctx.frame.latest(IndicatorKey::Atr);
    evidence.push("atr", atr);

    let Some(sign) = direction_sign(direction) else {
        return (price, price);
    };

    match atr.filter(|a| *a > 0.0) {
        Some(atr) => {
            evidence.push("target_basis", "ATR");
            (
                price + sign * tp_multiple * atr,
                price - sign * sl_multiple * atr,
            )
        }
        None => {
            let pct = ctx.config.targets.fallback_pct;
            warn!(atr = ?atr, fallback_pct = pct, "degenerate ATR, using percent targets");
            evidence.push("target_basis", "PERCENT_FALLBACK");
            (price * (1.0 + sign * pct), price * (1.0 - sign * pct))
        }
    }
}

pub(crate) fn build_signal(
    ctx: &StrategyContext<'_>,
    direction: Direction,
    confidence: Confidence,
    (take_profit, stop_loss): (f64, f64),
    evidence: Evidence,
) -> Signal {
    Signal {
        direction,
        confidence,
        take_profit,
        stop_loss,
        current_price: ctx.current_price(),
        evidence,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Hand-built contexts for strategy unit tests.

    use super::*;
    use crate::indicators::make_candles;

    pub struct Fixture {
        pub candles: Vec<Candle>,
        pub frame: IndicatorFrame,
        pub config: AnalysisConfig,
    }

    impl Fixture {
        /// `len` candles closing at `price`, every frame column missing.
        pub fn new(len: usize, price: f64) -> Self {
            Self {
                candles: make_candles(&vec![price; len]),
                frame: IndicatorFrame::empty(len),
                config: AnalysisConfig::default(),
            }
        }

        /// Set the last two values of a column.
        pub fn set(mut self, key: IndicatorKey, previous: f64, latest: f64) -> Self {
            let len = self.frame.len();
            let mut column = self.frame.column(key).to_vec();
            if len >= 2 {
                column[len - 2] = Some(previous);
            }
            column[len - 1] = Some(latest);
            self.frame = self.frame.with_column(key, column);
            self
        }

        pub fn ctx(&self) -> StrategyContext<'_> {
            StrategyContext::new(&self.candles, &self.frame, &self.config)
        }
    }
}
