//! Analysis entry points and the report handed to callers.
//!
//! `analyze` runs the whole pipeline (frame, strategies, optional fusion)
//! for one series and wraps the outcome in an `AnalysisReport`. Values keep
//! full precision inside the engine and are rounded here, on the way out.
//! Failures never escape as panics or raw errors: they become the report's
//! `error` payload with a machine-readable reason.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::consensus::{fuse, OverallSignal};
use crate::domain::{round_to, Direction, RawCandle, Series, Signal};
use crate::error::AnalysisError;
use crate::frame::IndicatorFrame;
use crate::strategies::{StrategyContext, StrategyKind};

/// Which output the caller wants: the full consensus or one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategySelection {
    #[default]
    All,
    Single(StrategyKind),
}

impl fmt::Display for StrategySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Single(kind) => f.write_str(kind.key()),
        }
    }
}

impl FromStr for StrategySelection {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ALL") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Single)
        }
    }
}

impl Serialize for StrategySelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One analysis request. Symbol and timeframe are echoed, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub timeframe: String,
    pub selection: StrategySelection,
}

impl AnalysisRequest {
    pub fn new(symbol: impl Into<String>, timeframe: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            selection: StrategySelection::All,
        }
    }

    pub fn with_selection(mut self, selection: StrategySelection) -> Self {
        self.selection = selection;
        self
    }
}

/// Structured failure: a stable reason plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub reason: String,
    pub message: String,
}

impl ErrorPayload {
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            message: message.into(),
        }
    }
}

impl From<&AnalysisError> for ErrorPayload {
    fn from(err: &AnalysisError) -> Self {
        Self::new(err.reason(), err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskQuality {
    Good,
    Average,
    Poor,
}

/// Reward-to-risk of a directional recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskReward {
    pub ratio: f64,
    pub quality: RiskQuality,
}

impl RiskReward {
    /// `|TP - price| / |price - SL|`, or 0 when there is no risk.
    pub fn assess(price: f64, take_profit: f64, stop_loss: f64) -> Self {
        let reward = (take_profit - price).abs();
        let risk = (price - stop_loss).abs();
        let ratio = if risk > 0.0 { reward / risk } else { 0.0 };
        let quality = if ratio >= 2.0 {
            RiskQuality::Good
        } else if ratio >= 1.0 {
            RiskQuality::Average
        } else {
            RiskQuality::Poor
        };
        Self { ratio, quality }
    }

    /// Assessment for a directional result; `None` for NEUTRAL and NO_DATA.
    pub fn for_direction(
        direction: Direction,
        price: f64,
        take_profit: f64,
        stop_loss: f64,
    ) -> Option<Self> {
        direction
            .is_directional()
            .then(|| Self::assess(price, take_profit, stop_loss))
    }

    fn rounded(&self, digits: u32) -> Self {
        Self {
            ratio: round_to(self.ratio, digits),
            quality: self.quality,
        }
    }
}

/// The successful payload of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Consensus {
        overall: OverallSignal,
        strategies: BTreeMap<StrategyKind, Signal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        risk_reward: Option<RiskReward>,
    },
    Single {
        strategy: StrategyKind,
        signal: Signal,
        #[serde(skip_serializing_if = "Option::is_none")]
        risk_reward: Option<RiskReward>,
    },
}

/// What every caller receives, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub timeframe: String,
    pub strategy: StrategySelection,
    pub success: bool,
    pub data_points: usize,
    pub as_of: Option<NaiveDateTime>,
    pub config_fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisOutcome>,
}

impl AnalysisReport {
    /// A failed report for `request`.
    pub fn failed(
        request: &AnalysisRequest,
        config: &AnalysisConfig,
        data_points: usize,
        error: ErrorPayload,
    ) -> Self {
        warn!(
            symbol = %request.symbol,
            reason = %error.reason,
            message = %error.message,
            "analysis failed"
        );
        Self {
            symbol: request.symbol.clone(),
            timeframe: request.timeframe.clone(),
            strategy: request.selection,
            success: false,
            data_points,
            as_of: None,
            config_fingerprint: config.fingerprint(),
            error: Some(error),
            result: None,
        }
    }

    /// Direction of the result, if any.
    pub fn direction(&self) -> Option<Direction> {
        match self.result.as_ref()? {
            AnalysisOutcome::Consensus { overall, .. } => Some(overall.direction),
            AnalysisOutcome::Single { signal, .. } => Some(signal.direction),
        }
    }
}

/// Analyse a validated series.
pub fn analyze(
    request: &AnalysisRequest,
    series: &Series,
    config: &AnalysisConfig,
) -> AnalysisReport {
    if let Err(err) = config.validate() {
        return AnalysisReport::failed(request, config, series.len(), ErrorPayload::from(&err));
    }

    let frame = IndicatorFrame::compute(series, config);
    let ctx = StrategyContext::new(series.candles(), &frame, config);
    let digits = config.targets.price_precision;

    let outcome = match request.selection {
        StrategySelection::All => {
            let consensus = fuse(&ctx);
            let o = &consensus.overall;
            let risk_reward =
                RiskReward::for_direction(o.direction, o.current_price, o.take_profit, o.stop_loss);
            let rounded = consensus.rounded(digits);
            AnalysisOutcome::Consensus {
                overall: rounded.overall,
                strategies: rounded.strategies,
                risk_reward: risk_reward.map(|rr| rr.rounded(digits)),
            }
        }
        StrategySelection::Single(kind) => {
            let signal = kind.evaluate(&ctx);
            let risk_reward = RiskReward::for_direction(
                signal.direction,
                signal.current_price,
                signal.take_profit,
                signal.stop_loss,
            );
            AnalysisOutcome::Single {
                strategy: kind,
                signal: signal.rounded(digits),
                risk_reward: risk_reward.map(|rr| rr.rounded(digits)),
            }
        }
    };

    let report = AnalysisReport {
        symbol: request.symbol.clone(),
        timeframe: request.timeframe.clone(),
        strategy: request.selection,
        success: true,
        data_points: series.len(),
        as_of: Some(series.latest().timestamp),
        config_fingerprint: config.fingerprint(),
        error: None,
        result: Some(outcome),
    };

    info!(
        symbol = %request.symbol,
        timeframe = %request.timeframe,
        strategy = %request.selection,
        candles = series.len(),
        direction = report.direction().map_or("NONE", |d| d.label()),
        "analysis complete"
    );
    report
}

/// Validate loader records at the boundary, then analyse.
///
/// A missing field or invalid value fails the whole request; no partial
/// analysis is attempted.
pub fn analyze_raw(
    request: &AnalysisRequest,
    raw: &[RawCandle],
    config: &AnalysisConfig,
) -> AnalysisReport {
    match Series::from_raw(raw) {
        Ok(series) => analyze(request, &series, config),
        Err(err) => AnalysisReport::failed(request, config, raw.len(), ErrorPayload::from(&err)),
    }
}
