//! ADX: Wilder's trend-strength index, direction-agnostic, in [0, 100].
//!
//! +DM/-DM and true range are Wilder-smoothed into +DI/-DI; DX is their
//! normalised spread, and ADX is DX smoothed again. Two smoothing passes give
//! a lookback of `2 * period - 1`. A zero smoothed true range leaves the row
//! without a value.

use super::atr::{true_range, wilder_smooth};
use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("adx_{period}"),
        }
    }
}

/// (+DM, -DM) per candle. Index 0 has no previous candle.
fn directional_movement(candles: &[Candle]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let n = candles.len();
    let mut plus_dm = vec![None; n];
    let mut minus_dm = vec![None; n];

    for i in 1..n {
        let high_diff = candles[i].high - candles[i - 1].high;
        let low_diff = candles[i - 1].low - candles[i].low;

        plus_dm[i] = Some(if high_diff > low_diff && high_diff > 0.0 {
            high_diff
        } else {
            0.0
        });
        minus_dm[i] = Some(if low_diff > high_diff && low_diff > 0.0 {
            low_diff
        } else {
            0.0
        });
    }

    (plus_dm, minus_dm)
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * self.period - 1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let n = candles.len();
        if n < 2 {
            return vec![None; n];
        }

        let (plus_dm, minus_dm) = directional_movement(candles);

        let mut tr = true_range(candles);
        tr[0] = None;
        let smooth_tr = wilder_smooth(&tr, self.period);
        let smooth_plus_dm = wilder_smooth(&plus_dm, self.period);
        let smooth_minus_dm = wilder_smooth(&minus_dm, self.period);

        let dx: Vec<Option<f64>> = (0..n)
            .map(|i| {
                let tr = smooth_tr[i]?;
                if tr == 0.0 {
                    return None;
                }
                let plus_di = 100.0 * smooth_plus_dm[i]? / tr;
                let minus_di = 100.0 * smooth_minus_dm[i]? / tr;
                let di_sum = plus_di + minus_di;
                Some(if di_sum == 0.0 {
                    0.0
                } else {
                    100.0 * (plus_di - minus_di).abs() / di_sum
                })
            })
            .collect();

        wilder_smooth(&dx, self.period)
    }
}
