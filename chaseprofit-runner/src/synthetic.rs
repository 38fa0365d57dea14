//! Synthetic candles for demos and benchmarks.
//!
//! A seeded random walk: identical parameters always give identical
//! candles. Output is clearly fake and never a substitute for market data.

use std::path::Path;

use chaseprofit_core::domain::Candle;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::data_loader::LoadError;

/// Parameters of the generated walk.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub candles: usize,
    pub seed: u64,
    pub start_price: f64,
    pub start: NaiveDateTime,
    pub interval: Duration,
    /// Largest absolute per-candle return.
    pub max_return: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            candles: 200,
            seed: 42,
            start_price: 100.0,
            start: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            interval: Duration::hours(1),
            max_return: 0.03,
        }
    }
}

/// Generate `config.candles` candles.
pub fn generate(config: &SyntheticConfig) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut price = config.start_price;
    let mut timestamp = config.start;

    let mut candles = Vec::with_capacity(config.candles);
    for _ in 0..config.candles {
        let ret: f64 = rng.gen_range(-config.max_return..=config.max_return);
        let open = price;
        let close = price * (1.0 + ret);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500.0..5_000.0);

        candles.push(Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        timestamp += config.interval;
    }
    candles
}

/// Write candles as CSV with the header the loader expects.
pub fn write_csv(path: &Path, candles: &[Candle]) -> Result<(), LoadError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for c in candles {
        wtr.write_record([
            c.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            c.open.to_string(),
            c.high.to_string(),
            c.low.to_string(),
            c.close.to_string(),
            c.volume.to_string(),
        ])?;
    }
    wtr.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), candles = candles.len(), "wrote synthetic candles");
    Ok(())
}
