//! Domain types for the signal engine.

pub mod candle;
pub mod series;
pub mod signal;

pub use candle::{Candle, RawCandle};
pub use series::Series;
pub use signal::{round_to, Confidence, Direction, Evidence, EvidenceValue, Signal};
