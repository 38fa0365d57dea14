//! EMA over closes, seeded with the SMA of the first `period` closes.
//!
//! alpha = 2 / (period + 1); first value at index `period - 1`. The
//! `ema_of_series` helper applies the same recurrence to an optional series
//! and seeds at its first full run of `period` values.

use super::{closes, Indicator};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        ema_of_series(&closes(candles), self.period)
    }
}

/// EMA of an arbitrary optional series.
///
/// The seed is the mean of the first run of `period` consecutive values, placed
/// at the run's last index. A gap after the seed ends the series: every later
/// entry is `None`. Used directly by MACD for its signal line.
pub fn ema_of_series(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period {
        return result;
    }

    let Some(seed_end) = first_full_window(values, period) else {
        return result;
    };

    let seed: f64 = values[seed_end + 1 - period..=seed_end]
        .iter()
        .flatten()
        .sum::<f64>()
        / period as f64;
    result[seed_end] = Some(seed);

    let alpha = 2.0 / (period as f64 + 1.0);
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

/// Index of the last element of the first run of `period` consecutive values.
pub(crate) fn first_full_window(values: &[Option<f64>], period: usize) -> Option<usize> {
    let mut run = 0;
    for (i, v) in values.iter().enumerate() {
        if v.is_some() {
            run += 1;
            if run == period {
                return Some(i);
            }
        } else {
            run = 0;
        }
    }
    None
}
