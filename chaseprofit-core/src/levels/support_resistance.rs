//! Rolling support and resistance.
//!
//! resistance[i] = max(high) over a centered window of size W
//! support[i]    = min(low)  over the same window
//!
//! The window for index i is `[i + off + 1 - W, i + off]` with
//! `off = (W - 1) / 2`. It is defined only when it lies fully inside the
//! series, so the first `W - off - 1` and the last `off` entries are `None`.
//!
//! Note: a centered window reads candles after `i`. These columns describe
//! where price turned, not what was knowable at `i`, and they are never used
//! as a per-bar signal.

use crate::domain::Candle;

/// Rolling levels plus the nearest level on each side of the latest candle.
#[derive(Debug, Clone, PartialEq)]
pub struct Levels {
    pub resistance: Vec<Option<f64>>,
    pub support: Vec<Option<f64>>,
    /// Smallest rolling resistance strictly above the latest high.
    pub nearest_resistance: Option<f64>,
    /// Largest rolling support strictly below the latest low.
    pub nearest_support: Option<f64>,
}

pub struct LevelDetector;

impl LevelDetector {
    pub fn detect(candles: &[Candle], window: usize) -> Levels {
        let resistance = centered_extreme(candles, window, |c| c.high, f64::max);
        let support = centered_extreme(candles, window, |c| c.low, f64::min);

        let (nearest_resistance, nearest_support) = match candles.last() {
            Some(latest) => (
                resistance
                    .iter()
                    .flatten()
                    .copied()
                    .filter(|&r| r > latest.high)
                    .reduce(f64::min),
                support
                    .iter()
                    .flatten()
                    .copied()
                    .filter(|&s| s < latest.low)
                    .reduce(f64::max),
            ),
            None => (None, None),
        };

        Levels {
            resistance,
            support,
            nearest_resistance,
            nearest_support,
        }
    }
}

fn centered_extreme(
    candles: &[Candle],
    window: usize,
    field: impl Fn(&Candle) -> f64,
    pick: fn(f64, f64) -> f64,
) -> Vec<Option<f64>> {
    let n = candles.len();
    let mut result = vec![None; n];
    if window == 0 || n < window {
        return result;
    }

    let offset = (window - 1) / 2;
    let first = window - offset - 1;
    let last = n - 1 - offset;

    for (i, slot) in result.iter_mut().enumerate().take(last + 1).skip(first) {
        let start = i + offset + 1 - window;
        *slot = candles[start..=i + offset].iter().map(&field).reduce(pick);
    }

    result
}
