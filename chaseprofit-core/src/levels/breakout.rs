//! Breakout classification of the latest candle.
//!
//! Resistance breakout, all of:
//! - latest close > resistance level
//! - latest high > max(high) over the consolidation window
//! - latest volume > volume_ratio * mean(volume) over the consolidation window
//!
//! Support breakout mirrors it with close <, low < and the same volume gate.
//! The consolidation window is the `lookback` candles preceding the latest
//! one, clamped to the available history.

use super::support_resistance::Levels;
use crate::domain::Candle;

/// Breakout verdict plus the consolidation extremes used for target sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakout {
    pub resistance_breakout: bool,
    pub support_breakout: bool,
    pub consolidation_high: f64,
    pub consolidation_low: f64,
    /// Resistance the latest candle was tested against.
    pub resistance_level: Option<f64>,
    /// Support the latest candle was tested against.
    pub support_level: Option<f64>,
    pub window_mean_volume: f64,
    /// Latest volume cleared the ratio gate against the window mean.
    pub volume_confirmed: bool,
}

impl Breakout {
    pub fn consolidation_range(&self) -> f64 {
        self.consolidation_high - self.consolidation_low
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BreakoutDetector {
    pub lookback: usize,
    pub volume_ratio: f64,
}

impl BreakoutDetector {
    pub fn new(lookback: usize, volume_ratio: f64) -> Self {
        Self {
            lookback,
            volume_ratio,
        }
    }

    /// Classify the last candle of `candles` against `reference` levels.
    ///
    /// `reference` should describe the levels standing before the latest
    /// candle; levels computed with the latest candle included always lie
    /// beyond its high and low.
    pub fn detect(&self, candles: &[Candle], reference: &Levels) -> Breakout {
        let Some((latest, history)) = candles.split_last() else {
            return Breakout {
                resistance_breakout: false,
                support_breakout: false,
                consolidation_high: 0.0,
                consolidation_low: 0.0,
                resistance_level: reference.nearest_resistance,
                support_level: reference.nearest_support,
                window_mean_volume: 0.0,
                volume_confirmed: false,
            };
        };

        let window = &history[history.len() - self.lookback.min(history.len())..];
        if window.is_empty() {
            return Breakout {
                resistance_breakout: false,
                support_breakout: false,
                consolidation_high: latest.high,
                consolidation_low: latest.low,
                resistance_level: reference.nearest_resistance,
                support_level: reference.nearest_support,
                window_mean_volume: 0.0,
                volume_confirmed: false,
            };
        }

        let consolidation_high = window
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let consolidation_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let window_mean_volume =
            window.iter().map(|c| c.volume).sum::<f64>() / window.len() as f64;
        let volume_confirmed = latest.volume > self.volume_ratio * window_mean_volume;

        let resistance_breakout = reference.nearest_resistance.is_some_and(|level| {
            latest.close > level && latest.high > consolidation_high && volume_confirmed
        });
        // Caller-supplied levels may be inverted; resistance takes precedence.
        let support_breakout = !resistance_breakout
            && reference.nearest_support.is_some_and(|level| {
                latest.close < level && latest.low < consolidation_low && volume_confirmed
            });

        Breakout {
            resistance_breakout,
            support_breakout,
            consolidation_high,
            consolidation_low,
            resistance_level: reference.nearest_resistance,
            support_level: reference.nearest_support,
            window_mean_volume,
            volume_confirmed,
        }
    }
}
