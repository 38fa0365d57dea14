//! Bollinger Bands over closes.
//!
//! Middle is SMA(period); upper and lower sit `mult` population standard
//! deviations away. Each band is its own indicator instance so the frame can
//! store them as separate columns. First value at index `period - 1`.

use super::Indicator;
use crate::domain::Candle;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }

    /// Mean and population standard deviation of the window ending at `i`.
    fn window_stats(&self, candles: &[Candle], i: usize) -> (f64, f64) {
        let window = &candles[i + 1 - self.period..=i];
        let mean = window.iter().map(|c| c.close).sum::<f64>() / self.period as f64;
        let variance = window
            .iter()
            .map(|c| {
                let diff = c.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / self.period as f64;
        (mean, variance.sqrt())
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let n = candles.len();
        let mut result = vec![None; n];

        if n < self.period {
            return result;
        }

        for (i, slot) in result.iter_mut().enumerate().skip(self.period - 1) {
            let (mean, stddev) = self.window_stats(candles, i);
            *slot = Some(match self.band {
                BollingerBand::Upper => mean + self.multiplier * stddev,
                BollingerBand::Middle => mean,
                BollingerBand::Lower => mean - self.multiplier * stddev,
            });
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn bollinger_period_4() {
        // Closes 2, 4, 4, 6 → mean 4, population variance (4+0+0+4)/4 = 2
        let candles = make_candles(&[2.0, 4.0, 4.0, 6.0]);
        let upper = Bollinger::upper(4, 2.0).compute(&candles);
        let middle = Bollinger::middle(4, 2.0).compute(&candles);
        let lower = Bollinger::lower(4, 2.0).compute(&candles);

        assert_eq!(upper[2], None);
        assert_approx(middle[3], 4.0, DEFAULT_EPSILON);
        assert_approx(upper[3], 4.0 + 2.0 * 2f64.sqrt(), DEFAULT_EPSILON);
        assert_approx(lower[3], 4.0 - 2.0 * 2f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn bands_ordered() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).cos() * 4.0).collect();
        let candles = make_candles(&closes);
        let upper = Bollinger::upper(20, 2.0).compute(&candles);
        let middle = Bollinger::middle(20, 2.0).compute(&candles);
        let lower = Bollinger::lower(20, 2.0).compute(&candles);
        for i in 19..60 {
            assert!(upper[i].unwrap() >= middle[i].unwrap());
            assert!(middle[i].unwrap() >= lower[i].unwrap());
        }
    }

    #[test]
    fn flat_series_collapses_bands() {
        let candles = make_candles(&[10.0; 25]);
        let upper = Bollinger::upper(20, 2.0).compute(&candles);
        let lower = Bollinger::lower(20, 2.0).compute(&candles);
        assert_approx(upper[24], 10.0, DEFAULT_EPSILON);
        assert_approx(lower[24], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
    }
}
