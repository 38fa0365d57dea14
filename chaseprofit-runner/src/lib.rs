//! ChaseProfit Runner — loading and orchestration around the signal engine.
//!
//! This crate builds on `chaseprofit-core` to provide:
//! - CSV candle loading with boundary validation
//! - Seeded synthetic candle generation
//! - Parallel batch analysis of independent inputs

pub mod batch;
pub mod data_loader;
pub mod synthetic;

pub use batch::{analyze_files, analyze_many, load_error_payload, BatchInput};
pub use data_loader::{load_csv, load_series, parse_timestamp, read_csv, LoadError};
pub use synthetic::{generate, write_csv, SyntheticConfig};
