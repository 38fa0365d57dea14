//! ChaseProfit Core — deterministic signal engine for OHLCV candle series.
//!
//! This crate turns one validated candle series into one recommendation:
//! - Domain types (candles, series, signals, evidence)
//! - Indicator library (RSI, MACD, SMA/EMA, Bollinger, Stochastic, PSAR, ADX, ATR)
//! - Support/resistance levels and breakout detection
//! - Six independent strategies over a shared indicator frame
//! - Weighted consensus fusion
//! - The report contract handed to CLI and batch callers
//!
//! Every call is self-contained: no global state, no caching between calls.

pub mod analysis;
pub mod config;
pub mod consensus;
pub mod domain;
pub mod error;
pub mod frame;
pub mod indicators;
pub mod levels;
pub mod strategies;

pub use analysis::{
    analyze, analyze_raw, AnalysisOutcome, AnalysisReport, AnalysisRequest, ErrorPayload,
    RiskQuality, RiskReward, StrategySelection,
};
pub use config::AnalysisConfig;
pub use consensus::{fuse, fuse_signals, ConsensusResult, OverallSignal, Probabilities};
pub use error::AnalysisError;
pub use frame::{IndicatorFrame, IndicatorKey};
pub use strategies::{StrategyContext, StrategyKind};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a batch worker moves across threads is
    /// Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Series>();
        require_sync::<domain::Series>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<AnalysisConfig>();
        require_sync::<AnalysisConfig>();
        require_send::<IndicatorFrame>();
        require_sync::<IndicatorFrame>();
        require_send::<AnalysisReport>();
        require_sync::<AnalysisReport>();
        require_send::<AnalysisError>();
        require_sync::<AnalysisError>();
    }
}
