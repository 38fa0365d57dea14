//! Parabolic SAR: a trailing stop that accelerates toward price.
//!
//! The walk keeps a side, an extreme point and an acceleration factor that
//! grows by `af_step` on each new extreme up to `af_max`. Price crossing the
//! SAR flips the side and resets the factor. Index 0 has no value; the walk
//! seeds from the first two candles.

use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct ParabolicSar {
    af_start: f64,
    af_step: f64,
    af_max: f64,
    name: String,
}

/// Running state of the SAR walk.
#[derive(Debug, Clone, Copy)]
struct SarState {
    is_long: bool,
    af: f64,
    ep: f64,
    sar: f64,
}

impl ParabolicSar {
    pub fn new(af_start: f64, af_step: f64, af_max: f64) -> Self {
        assert!(af_start > 0.0, "AF start must be > 0");
        assert!(af_step > 0.0, "AF step must be > 0");
        assert!(af_max >= af_start, "AF max must be >= AF start");
        Self {
            af_start,
            af_step,
            af_max,
            name: format!("psar_{af_start}_{af_step}_{af_max}"),
        }
    }

    /// Default parameters: 0.02, 0.02, 0.20
    pub fn default_params() -> Self {
        Self::new(0.02, 0.02, 0.20)
    }

    fn step(&self, state: SarState, candles: &[Candle], i: usize) -> SarState {
        let SarState {
            mut is_long,
            mut af,
            mut ep,
            sar,
        } = state;
        let bar = &candles[i];
        let mut new_sar = sar + af * (ep - sar);

        if is_long {
            // SAR may not sit above the two previous lows.
            new_sar = new_sar.min(candles[i - 1].low);
            if i >= 2 {
                new_sar = new_sar.min(candles[i - 2].low);
            }

            if bar.low < new_sar {
                is_long = false;
                new_sar = ep;
                ep = bar.low;
                af = self.af_start;
            } else if bar.high > ep {
                ep = bar.high;
                af = (af + self.af_step).min(self.af_max);
            }
        } else {
            new_sar = new_sar.max(candles[i - 1].high);
            if i >= 2 {
                new_sar = new_sar.max(candles[i - 2].high);
            }

            if bar.high > new_sar {
                is_long = true;
                new_sar = ep;
                ep = bar.high;
                af = self.af_start;
            } else if bar.low < ep {
                ep = bar.low;
                af = (af + self.af_step).min(self.af_max);
            }
        }

        SarState {
            is_long,
            af,
            ep,
            sar: new_sar,
        }
    }
}

impl Indicator for ParabolicSar {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let n = candles.len();
        let mut result = vec![None; n];

        if n < 2 {
            return result;
        }

        // Initial direction from the first two candles.
        let is_long = candles[1].close >= candles[0].close;
        let mut state = if is_long {
            SarState {
                is_long,
                af: self.af_start,
                ep: candles[1].high,
                sar: candles[0].low,
            }
        } else {
            SarState {
                is_long,
                af: self.af_start,
                ep: candles[1].low,
                sar: candles[0].high,
            }
        };
        result[1] = Some(state.sar);

        for (i, slot) in result.iter_mut().enumerate().skip(2) {
            state = self.step(state, candles, i);
            *slot = Some(state.sar);
        }

        result
    }
}
