//! Support/resistance levels and breakout classification.
//!
//! Levels come from centered rolling extrema of highs and lows. The breakout
//! detector compares the latest candle against the levels that stood before
//! it and against the trailing consolidation window.

pub mod breakout;
pub mod support_resistance;

pub use breakout::{Breakout, BreakoutDetector};
pub use support_resistance::{LevelDetector, Levels};
