//! ATR: Wilder-smoothed true range.
//!
//! True range needs the previous close, so index 0 has none and the first
//! ATR value (the mean of TR[1..=period]) sits at index `period`.
//! `true_range` and `wilder_smooth` are shared with ADX.

use super::ema::first_full_window;
use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// True Range series.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(candles: &[Candle]) -> Vec<Option<f64>> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let hl = c.high - c.low;
            if i == 0 {
                return Some(hl);
            }
            let pc = candles[i - 1].close;
            Some(hl.max((c.high - pc).abs()).max((c.low - pc).abs()))
        })
        .collect()
}

/// Wilder smoothing of an optional series. Alpha = 1/period.
///
/// Seed: mean of the first run of `period` consecutive values, placed at the
/// run's last index. A gap after the seed ends the series.
pub fn wilder_smooth(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period {
        return result;
    }

    let Some(seed_end) = first_full_window(values, period) else {
        return result;
    };

    let seed = values[seed_end + 1 - period..=seed_end]
        .iter()
        .flatten()
        .sum::<f64>()
        / period as f64;
    result[seed_end] = Some(seed);

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in (seed_end + 1)..n {
        let Some(v) = values[i] else {
            return result;
        };
        prev = alpha * v + (1.0 - alpha) * prev;
        result[i] = Some(prev);
    }

    result
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let mut tr = true_range(candles);
        // TR[0] is only high-low; start the seed at TR[1] so lookback == period.
        if let Some(first) = tr.first_mut() {
            *first = None;
        }
        wilder_smooth(&tr, self.period)
    }
}
