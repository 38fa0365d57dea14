//! Indicator frame — every indicator column for one series, computed once.
//!
//! Built once per analysis request, then queried by index. Strategies only
//! read from it; nothing patches a frame after construction.

use std::collections::HashMap;

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::domain::{Candle, Series};
use crate::indicators::{
    sma_of_series, Adx, Atr, Bollinger, Ema, Indicator, Macd, MacdLine, ParabolicSar, Rsi, Sma,
    Stochastic, StochasticLine,
};
use crate::levels::LevelDetector;

/// The frame's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorKey {
    Rsi,
    Macd,
    MacdSignal,
    MacdHistogram,
    SmaFast,
    SmaSlow,
    EmaFast,
    EmaSlow,
    BbUpper,
    BbMiddle,
    BbLower,
    StochK,
    StochD,
    ParabolicSar,
    Adx,
    Atr,
    Resistance,
    Support,
    NearestResistance,
    NearestSupport,
}

impl IndicatorKey {
    pub const ALL: [IndicatorKey; 20] = [
        Self::Rsi,
        Self::Macd,
        Self::MacdSignal,
        Self::MacdHistogram,
        Self::SmaFast,
        Self::SmaSlow,
        Self::EmaFast,
        Self::EmaSlow,
        Self::BbUpper,
        Self::BbMiddle,
        Self::BbLower,
        Self::StochK,
        Self::StochD,
        Self::ParabolicSar,
        Self::Adx,
        Self::Atr,
        Self::Resistance,
        Self::Support,
        Self::NearestResistance,
        Self::NearestSupport,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::MacdSignal => "macd_signal",
            Self::MacdHistogram => "macd_histogram",
            Self::SmaFast => "sma_fast",
            Self::SmaSlow => "sma_slow",
            Self::EmaFast => "ema_fast",
            Self::EmaSlow => "ema_slow",
            Self::BbUpper => "bb_upper",
            Self::BbMiddle => "bb_middle",
            Self::BbLower => "bb_lower",
            Self::StochK => "stoch_k",
            Self::StochD => "stoch_d",
            Self::ParabolicSar => "parabolic_sar",
            Self::Adx => "adx",
            Self::Atr => "atr",
            Self::Resistance => "resistance",
            Self::Support => "support",
            Self::NearestResistance => "nearest_resistance",
            Self::NearestSupport => "nearest_support",
        }
    }
}

/// Immutable per-request table of indicator columns aligned with the series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    len: usize,
    columns: HashMap<IndicatorKey, Vec<Option<f64>>>,
}

impl IndicatorFrame {
    /// Compute every column for `series` with the periods in `config`.
    pub fn compute(series: &Series, config: &AnalysisConfig) -> Self {
        Self::from_candles(series.candles(), config)
    }

    pub(crate) fn from_candles(candles: &[Candle], config: &AnalysisConfig) -> Self {
        let p = &config.indicators;
        let n = candles.len();

        let (macd, macd_signal, macd_histogram) =
            Macd::new(p.macd_fast, p.macd_slow, p.macd_signal, MacdLine::Line).compute_all(candles);
        let stoch_k = Stochastic::new(p.stoch_k_period, p.stoch_d_period, StochasticLine::K)
            .percent_k(candles);
        let stoch_d = sma_of_series(&stoch_k, p.stoch_d_period);
        let levels = LevelDetector::detect(candles, config.levels.window);

        let frame = Self::empty(n)
            .with_column(IndicatorKey::Rsi, Rsi::new(p.rsi_period).compute(candles))
            .with_column(IndicatorKey::Macd, macd)
            .with_column(IndicatorKey::MacdSignal, macd_signal)
            .with_column(IndicatorKey::MacdHistogram, macd_histogram)
            .with_column(IndicatorKey::SmaFast, Sma::new(p.sma_fast).compute(candles))
            .with_column(IndicatorKey::SmaSlow, Sma::new(p.sma_slow).compute(candles))
            .with_column(IndicatorKey::EmaFast, Ema::new(p.ema_fast).compute(candles))
            .with_column(IndicatorKey::EmaSlow, Ema::new(p.ema_slow).compute(candles))
            .with_column(
                IndicatorKey::BbUpper,
                Bollinger::upper(p.bollinger_period, p.bollinger_multiplier).compute(candles),
            )
            .with_column(
                IndicatorKey::BbMiddle,
                Bollinger::middle(p.bollinger_period, p.bollinger_multiplier).compute(candles),
            )
            .with_column(
                IndicatorKey::BbLower,
                Bollinger::lower(p.bollinger_period, p.bollinger_multiplier).compute(candles),
            )
            .with_column(IndicatorKey::StochK, stoch_k)
            .with_column(IndicatorKey::StochD, stoch_d)
            .with_column(
                IndicatorKey::ParabolicSar,
                ParabolicSar::new(p.sar_af_start, p.sar_af_step, p.sar_af_max).compute(candles),
            )
            .with_column(IndicatorKey::Adx, Adx::new(p.adx_period).compute(candles))
            .with_column(IndicatorKey::Atr, Atr::new(p.atr_period).compute(candles))
            .with_column(IndicatorKey::Resistance, levels.resistance)
            .with_column(IndicatorKey::Support, levels.support)
            .with_column(
                IndicatorKey::NearestResistance,
                vec![levels.nearest_resistance; n],
            )
            .with_column(IndicatorKey::NearestSupport, vec![levels.nearest_support; n]);

        debug!(
            candles = n,
            rsi = ?frame.latest(IndicatorKey::Rsi),
            atr = ?frame.latest(IndicatorKey::Atr),
            nearest_resistance = ?levels.nearest_resistance,
            nearest_support = ?levels.nearest_support,
            "indicator frame computed"
        );

        frame
    }

    /// A frame of `len` rows with every column missing.
    pub fn empty(len: usize) -> Self {
        let columns = IndicatorKey::ALL
            .iter()
            .map(|&key| (key, vec![None; len]))
            .collect();
        Self { len, columns }
    }

    /// Replace one column.
    ///
    /// # Panics
    /// If `values` does not have exactly one entry per row.
    pub fn with_column(mut self, key: IndicatorKey, values: Vec<Option<f64>>) -> Self {
        assert_eq!(
            values.len(),
            self.len,
            "column '{}' has {} values for {} rows",
            key.name(),
            values.len(),
            self.len
        );
        self.columns.insert(key, values);
        self
    }

    pub fn get(&self, key: IndicatorKey, index: usize) -> Option<f64> {
        self.columns
            .get(&key)
            .and_then(|column| column.get(index).copied().flatten())
    }

    pub fn latest(&self, key: IndicatorKey) -> Option<f64> {
        self.len.checked_sub(1).and_then(|i| self.get(key, i))
    }

    pub fn previous(&self, key: IndicatorKey) -> Option<f64> {
        self.len.checked_sub(2).and_then(|i| self.get(key, i))
    }

    pub fn column(&self, key: IndicatorKey) -> &[Option<f64>] {
        self.columns.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;

    fn wave(n: usize) -> Vec<Candle> {
        let closes: Vec<f64> = (0..n)
            .map(|i| 100.0 + (i as f64 * 0.25).sin() * 8.0 + i as f64 * 0.1)
            .collect();
        make_candles(&closes)
    }

    #[test]
    fn every_column_has_one_entry_per_candle() {
        let candles = wave(80);
        let frame = IndicatorFrame::from_candles(&candles, &AnalysisConfig::default());
        assert_eq!(frame.len(), 80);
        for key in IndicatorKey::ALL {
            assert_eq!(frame.column(key).len(), 80, "{}", key.name());
        }
    }

    #[test]
    fn first_available_indices() {
        let candles = wave(80);
        let frame = IndicatorFrame::from_candles(&candles, &AnalysisConfig::default());
        let expected = [
            (IndicatorKey::Rsi, 14),
            (IndicatorKey::Macd, 25),
            (IndicatorKey::MacdSignal, 33),
            (IndicatorKey::MacdHistogram, 33),
            (IndicatorKey::SmaFast, 19),
            (IndicatorKey::SmaSlow, 49),
            (IndicatorKey::EmaFast, 11),
            (IndicatorKey::EmaSlow, 25),
            (IndicatorKey::BbUpper, 19),
            (IndicatorKey::StochK, 13),
            (IndicatorKey::StochD, 15),
            (IndicatorKey::ParabolicSar, 1),
            (IndicatorKey::Atr, 14),
            (IndicatorKey::Adx, 27),
            (IndicatorKey::Resistance, 10),
        ];
        for (key, first) in expected {
            let column = frame.column(key);
            let found = column.iter().position(Option::is_some);
            assert_eq!(found, Some(first), "{}", key.name());
        }
    }

    #[test]
    fn latest_and_previous() {
        let frame = IndicatorFrame::empty(3).with_column(
            IndicatorKey::Rsi,
            vec![None, Some(40.0), Some(45.0)],
        );
        assert_eq!(frame.latest(IndicatorKey::Rsi), Some(45.0));
        assert_eq!(frame.previous(IndicatorKey::Rsi), Some(40.0));
        assert_eq!(frame.get(IndicatorKey::Rsi, 0), None);
        assert_eq!(frame.get(IndicatorKey::Rsi, 9), None);
        assert_eq!(frame.latest(IndicatorKey::Atr), None);
    }

    #[test]
    fn single_row_has_no_previous() {
        let frame = IndicatorFrame::empty(1).with_column(IndicatorKey::Rsi, vec![Some(50.0)]);
        assert_eq!(frame.previous(IndicatorKey::Rsi), None);
    }

    #[test]
    #[should_panic(expected = "column 'atr'")]
    fn with_column_rejects_wrong_length() {
        let _ = IndicatorFrame::empty(3).with_column(IndicatorKey::Atr, vec![Some(1.0)]);
    }

    #[test]
    fn recomputation_is_identical() {
        let candles = wave(60);
        let config = AnalysisConfig::default();
        assert_eq!(
            IndicatorFrame::from_candles(&candles, &config),
            IndicatorFrame::from_candles(&candles, &config)
        );
    }
}
