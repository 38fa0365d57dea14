//! Stochastic Oscillator.
//!
//! %K = 100 * (close - lowest_low(k)) / (highest_high(k) - lowest_low(k))
//! %D = SMA(%K, d)
//!
//! A flat window (highest_high == lowest_low) yields %K = 50.
//! Lookback: k - 1 for %K, k + d - 2 for %D.

use super::sma::sma_of_series;
use super::Indicator;
use crate::domain::Candle;

/// Which stochastic line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize, line: StochasticLine) -> Self {
        assert!(k_period >= 1 && d_period >= 1, "Stochastic periods must be >= 1");
        let label = match line {
            StochasticLine::K => "k",
            StochasticLine::D => "d",
        };
        Self {
            k_period,
            d_period,
            line,
            name: format!("stoch_{label}_{k_period}_{d_period}"),
        }
    }

    /// %K series.
    pub fn percent_k(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let n = candles.len();
        let mut result = vec![None; n];

        if n < self.k_period {
            return result;
        }

        for (i, slot) in result.iter_mut().enumerate().skip(self.k_period - 1) {
            let window = &candles[i + 1 - self.k_period..=i];
            let lowest = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
            let highest = window
                .iter()
                .map(|c| c.high)
                .fold(f64::NEG_INFINITY, f64::max);

            let range = highest - lowest;
            *slot = Some(if range > 0.0 {
                (100.0 * (candles[i].close - lowest) / range).clamp(0.0, 100.0)
            } else {
                50.0
            });
        }

        result
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            StochasticLine::K => self.k_period - 1,
            StochasticLine::D => self.k_period + self.d_period - 2,
        }
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let k = self.percent_k(candles);
        match self.line {
            StochasticLine::K => k,
            StochasticLine::D => sma_of_series(&k, self.d_period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc, DEFAULT_EPSILON};

    #[test]
    fn percent_k_basic() {
        let candles = make_ohlc(&[
            (10.0, 12.0, 8.0, 11.0),
            (11.0, 14.0, 10.0, 13.0),
            (13.0, 15.0, 11.0, 14.0),
        ]);
        let k = Stochastic::new(3, 2, StochasticLine::K).compute(&candles);
        assert_eq!(k[1], None);
        // lowest 8, highest 15, close 14 → 100 * 6 / 7
        assert_approx(k[2], 600.0 / 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn percent_d_is_sma_of_k() {
        let candles = make_ohlc(&[
            (10.0, 12.0, 8.0, 11.0),
            (11.0, 14.0, 10.0, 13.0),
            (13.0, 15.0, 11.0, 14.0),
            (14.0, 16.0, 12.0, 12.0),
        ]);
        let stoch = Stochastic::new(3, 2, StochasticLine::D);
        let k = stoch.percent_k(&candles);
        let d = stoch.compute(&candles);
        assert_eq!(d[2], None);
        assert_approx(d[3], (k[2].unwrap() + k[3].unwrap()) / 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_window_is_midpoint() {
        let candles = make_ohlc(&[(5.0, 5.0, 5.0, 5.0); 4]);
        let k = Stochastic::new(3, 2, StochasticLine::K).compute(&candles);
        assert_approx(k[3], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn stochastic_lookback() {
        assert_eq!(Stochastic::new(14, 3, StochasticLine::K).lookback(), 13);
        assert_eq!(Stochastic::new(14, 3, StochasticLine::D).lookback(), 15);
    }
}
