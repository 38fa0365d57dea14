//! CSV candle loading.
//!
//! Reads a header row naming `Timestamp, Open, High, Low, Close, Volume`
//! (any case, any order, extra columns ignored) and produces loader records.
//! Empty cells become absent fields, so the core rejects them with a
//! `missing_field` reason when the records are turned into a series. Cells
//! that are present but unparseable fail here.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chaseprofit_core::domain::{RawCandle, Series};
use chaseprofit_core::AnalysisError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column '{0}' in header")]
    MissingColumn(&'static str),

    #[error("row {row}: unrecognised timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: column '{column}' is not a number: '{value}'")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl LoadError {
    /// Stable identifier, matching the core's reasons where one applies.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_error",
            Self::Csv(_) => "csv_error",
            Self::MissingColumn(_) => "missing_column",
            Self::BadTimestamp { .. } => "bad_timestamp",
            Self::BadNumber { .. } => "bad_number",
            Self::Analysis(err) => err.reason(),
        }
    }
}

const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Load loader records from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<RawCandle>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_csv(file)?;
    info!(path = %path.display(), rows = records.len(), "loaded candles");
    Ok(records)
}

/// Load a CSV file and validate it into a series in one step.
pub fn load_series(path: &Path) -> Result<Series, LoadError> {
    let raw = load_csv(path)?;
    Ok(Series::from_raw(&raw)?)
}

/// Parse loader records from any CSV source.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawCandle>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut index = [0usize; 6];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(LoadError::MissingColumn(name))?;
    }
    debug!(?index, "resolved csv columns");

    let mut out = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let cell = |i: usize| record.get(index[i]).filter(|s| !s.is_empty());

        let timestamp = cell(0)
            .map(|s| {
                parse_timestamp(s).ok_or_else(|| LoadError::BadTimestamp {
                    row,
                    value: s.to_string(),
                })
            })
            .transpose()?;

        let mut numbers = [None; 5];
        for (k, slot) in numbers.iter_mut().enumerate() {
            let column = COLUMNS[k + 1];
            *slot = cell(k + 1)
                .map(|s| {
                    s.parse::<f64>().map_err(|_| LoadError::BadNumber {
                        row,
                        column,
                        value: s.to_string(),
                    })
                })
                .transpose()?;
        }
        let [open, high, low, close, volume] = numbers;

        out.push(RawCandle {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }
    Ok(out)
}

/// Parse a timestamp cell.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD`,
/// RFC 3339 (converted to UTC), or integer epoch milliseconds.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_utc());
    }
    s.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|ts| ts.naive_utc())
}
