//! Candle — one time interval of OHLCV market data.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLCV candle. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Candle as delivered by a loader, before boundary validation.
///
/// Every field may be absent. Converting into a `Series` rejects the first
/// missing field with `AnalysisError::MissingField`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandle {
    pub timestamp: Option<NaiveDateTime>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl From<&Candle> for RawCandle {
    fn from(c: &Candle) -> Self {
        Self {
            timestamp: Some(c.timestamp),
            open: Some(c.open),
            high: Some(c.high),
            low: Some(c.low),
            close: Some(c.close),
            volume: Some(c.volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Candle {
        Candle {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn raw_from_candle_keeps_every_field() {
        let raw = RawCandle::from(&sample());
        assert_eq!(raw.close, Some(103.0));
        assert_eq!(raw.volume, Some(50_000.0));
        assert!(raw.timestamp.is_some());
    }
}
