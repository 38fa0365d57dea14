//! Technical indicator library.
//!
//! Indicators are pure functions: candle history in, a series of the same
//! length out. Entries without enough history are `None`, never a sentinel
//! float, so missing values cannot leak into arithmetic.
//!
//! Multi-series indicators (MACD, Bollinger, Stochastic) are exposed as
//! separate instances per output line, keeping the single-series trait.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod parabolic_sar;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use adx::Adx;
pub use atr::{true_range, wilder_smooth, Atr};
pub use bollinger::{Bollinger, BollingerBand};
pub use ema::{ema_of_series, Ema};
pub use macd::{Macd, MacdLine};
pub use parabolic_sar::ParabolicSar;
pub use rsi::Rsi;
pub use sma::{sma_of_series, Sma};
pub use stochastic::{Stochastic, StochasticLine};

use crate::domain::Candle;

/// A rolling-window indicator over a candle series.
///
/// # Contract
/// `compute` returns exactly one entry per candle. The value at index `t`
/// depends only on candles `0..=t`, and the first `lookback()` entries are
/// `None`.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading entries that are always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>>;
}

/// Close prices as an optional series, the input shape of the series helpers.
pub(crate) fn closes(candles: &[Candle]) -> Vec<Option<f64>> {
    candles.iter().map(|c| Some(c.close)).collect()
}

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for the first candle),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Create candles from (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_ohlc(data: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Candle {
            timestamp: base + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Assert an optional value is present and approximately equal to `expected`.
#[cfg(test)]
pub fn assert_approx(actual: Option<f64>, expected: f64, epsilon: f64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
