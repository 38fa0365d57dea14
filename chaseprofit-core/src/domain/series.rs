//! Series — validated, ordered, non-empty candle history.

use serde::Serialize;

use super::candle::{Candle, RawCandle};
use crate::error::AnalysisError;

/// Ordered candle series, length ≥ 1.
///
/// Construction validates the input contract once, so every downstream
/// computation can assume finite, positive prices, non-negative volume and
/// non-decreasing timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    candles: Vec<Candle>,
}

impl Series {
    /// Validate and wrap a candle vector.
    pub fn new(candles: Vec<Candle>) -> Result<Self, AnalysisError> {
        if candles.is_empty() {
            return Err(AnalysisError::InsufficientData {
                what: "series".into(),
                required: 1,
                available: 0,
            });
        }

        for (index, c) in candles.iter().enumerate() {
            for (field, value) in [
                ("open", c.open),
                ("high", c.high),
                ("low", c.low),
                ("close", c.close),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(AnalysisError::InvalidValue {
                        index,
                        field,
                        value,
                    });
                }
            }
            if !c.volume.is_finite() || c.volume < 0.0 {
                return Err(AnalysisError::InvalidValue {
                    index,
                    field: "volume",
                    value: c.volume,
                });
            }
            if index > 0 && c.timestamp < candles[index - 1].timestamp {
                return Err(AnalysisError::UnsortedSeries { index });
            }
        }

        Ok(Self { candles })
    }

    /// Convert loader records, failing on the first absent field.
    pub fn from_raw(raw: &[RawCandle]) -> Result<Self, AnalysisError> {
        let candles = raw
            .iter()
            .enumerate()
            .map(|(index, r)| {
                let missing = |field| AnalysisError::MissingField { index, field };
                Ok(Candle {
                    timestamp: r.timestamp.ok_or_else(|| missing("timestamp"))?,
                    open: r.open.ok_or_else(|| missing("open"))?,
                    high: r.high.ok_or_else(|| missing("high"))?,
                    low: r.low.ok_or_else(|| missing("low"))?,
                    close: r.close.ok_or_else(|| missing("close"))?,
                    volume: r.volume.ok_or_else(|| missing("volume"))?,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;
        Self::new(candles)
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// The most recent candle.
    pub fn latest(&self) -> &Candle {
        // Non-empty by construction.
        &self.candles[self.candles.len() - 1]
    }
}
