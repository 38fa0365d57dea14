//! Analysis configuration.
//!
//! All window sizes, thresholds, fusion weights and fallback constants live in
//! one immutable `AnalysisConfig` passed by reference into the indicator,
//! strategy and fusion steps. Every section is `#[serde(default)]`, so a TOML
//! file only needs to name the values it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AnalysisError;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorParams,
    pub levels: LevelParams,
    pub thresholds: SignalThresholds,
    pub weights: StrategyWeights,
    pub targets: TargetParams,
}

/// Indicator periods and Parabolic SAR acceleration constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub stoch_k_period: usize,
    pub stoch_d_period: usize,
    pub sar_af_start: f64,
    pub sar_af_step: f64,
    pub sar_af_max: f64,
    pub adx_period: usize,
    pub atr_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            sma_fast: 20,
            sma_slow: 50,
            ema_fast: 12,
            ema_slow: 26,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            stoch_k_period: 14,
            stoch_d_period: 3,
            sar_af_start: 0.02,
            sar_af_step: 0.02,
            sar_af_max: 0.2,
            adx_period: 14,
            atr_period: 14,
        }
    }
}

/// Support/resistance and breakout detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParams {
    /// Centered rolling window for local extrema.
    pub window: usize,
    /// Candles preceding the latest one that form the consolidation window.
    pub breakout_lookback: usize,
    /// Latest volume must exceed `ratio * mean(window volume)`.
    pub volume_confirmation_ratio: f64,
    /// Trailing window for the breakout volume-profile label.
    pub volume_profile_window: usize,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            window: 20,
            breakout_lookback: 10,
            volume_confirmation_ratio: 1.0,
            volume_profile_window: 20,
        }
    }
}

/// Oscillator zone and trend-strength thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub stoch_oversold: f64,
    pub stoch_overbought: f64,
    pub adx_strong: f64,
    pub adx_very_strong: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            stoch_oversold: 20.0,
            stoch_overbought: 80.0,
            adx_strong: 25.0,
            adx_very_strong: 40.0,
        }
    }
}

/// Fixed consensus weights, one per strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyWeights {
    pub rsi_macd: f64,
    pub moving_averages: f64,
    pub bollinger_bands: f64,
    pub stochastic_ema: f64,
    pub parabolic_sar_adx: f64,
    pub breakout: f64,
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            rsi_macd: 1.0,
            moving_averages: 1.2,
            bollinger_bands: 0.8,
            stochastic_ema: 0.9,
            parabolic_sar_adx: 1.1,
            breakout: 1.3,
        }
    }
}

impl StrategyWeights {
    fn all(&self) -> [f64; 6] {
        [
            self.rsi_macd,
            self.moving_averages,
            self.bollinger_bands,
            self.stochastic_ema,
            self.parabolic_sar_adx,
            self.breakout,
        ]
    }

    pub fn total(&self) -> f64 {
        self.all().iter().sum()
    }
}

/// Target sizing fallbacks and output precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    /// Fractional offset used when a volatility-based target is degenerate.
    pub fallback_pct: f64,
    /// Fractional digits kept when prices leave the engine.
    pub price_precision: u32,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            fallback_pct: 0.02,
            price_precision: 6,
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidConfig(format!("read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, AnalysisError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AnalysisError::InvalidConfig(format!("parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural constraints between parameters.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let ind = &self.indicators;
        let periods = [
            ("rsi_period", ind.rsi_period),
            ("macd_fast", ind.macd_fast),
            ("macd_slow", ind.macd_slow),
            ("macd_signal", ind.macd_signal),
            ("sma_fast", ind.sma_fast),
            ("sma_slow", ind.sma_slow),
            ("ema_fast", ind.ema_fast),
            ("ema_slow", ind.ema_slow),
            ("bollinger_period", ind.bollinger_period),
            ("stoch_k_period", ind.stoch_k_period),
            ("stoch_d_period", ind.stoch_d_period),
            ("adx_period", ind.adx_period),
            ("atr_period", ind.atr_period),
            ("levels.window", self.levels.window),
            ("levels.breakout_lookback", self.levels.breakout_lookback),
            ("levels.volume_profile_window", self.levels.volume_profile_window),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(invalid(format!("{name} must be >= 1")));
            }
        }

        if ind.macd_slow <= ind.macd_fast {
            return Err(invalid("macd_slow must be > macd_fast"));
        }
        if ind.sma_slow <= ind.sma_fast {
            return Err(invalid("sma_slow must be > sma_fast"));
        }
        if ind.ema_slow <= ind.ema_fast {
            return Err(invalid("ema_slow must be > ema_fast"));
        }
        if !(ind.bollinger_multiplier > 0.0) {
            return Err(invalid("bollinger_multiplier must be > 0"));
        }
        if !(ind.sar_af_start > 0.0 && ind.sar_af_step > 0.0) {
            return Err(invalid("SAR acceleration start and step must be > 0"));
        }
        if ind.sar_af_max < ind.sar_af_start {
            return Err(invalid("sar_af_max must be >= sar_af_start"));
        }

        let t = &self.thresholds;
        if t.rsi_oversold >= t.rsi_overbought {
            return Err(invalid("rsi_oversold must be < rsi_overbought"));
        }
        if t.stoch_oversold >= t.stoch_overbought {
            return Err(invalid("stoch_oversold must be < stoch_overbought"));
        }
        if t.adx_strong > t.adx_very_strong {
            return Err(invalid("adx_strong must be <= adx_very_strong"));
        }

        let weights = self.weights.all();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("strategy weights must be finite and >= 0"));
        }
        if self.weights.total() <= 0.0 {
            return Err(invalid("at least one strategy weight must be > 0"));
        }

        if !(self.levels.volume_confirmation_ratio >= 0.0) {
            return Err(invalid("volume_confirmation_ratio must be >= 0"));
        }
        if !(self.targets.fallback_pct > 0.0 && self.targets.fallback_pct < 1.0) {
            return Err(invalid("fallback_pct must be in (0, 1)"));
        }
        if self.targets.price_precision > 12 {
            return Err(invalid("price_precision must be <= 12"));
        }

        Ok(())
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two reports carrying the same fingerprint were produced by identical
    /// parameters.
    pub fn fingerprint(&self) -> String {
        // Plain structs of numbers always serialize.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

fn invalid(msg: impl Into<String>) -> AnalysisError {
    AnalysisError::InvalidConfig(msg.into())
}
