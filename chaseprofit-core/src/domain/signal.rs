//! Signal — one strategy's directional verdict with targets and evidence.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Directional bias of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
    NoData,
}

impl Direction {
    pub fn is_directional(&self) -> bool {
        matches!(self, Self::Bullish | Self::Bearish)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "BULLISH",
            Self::Bearish => "BEARISH",
            Self::Neutral => "NEUTRAL",
            Self::NoData => "NO_DATA",
        }
    }
}

/// Categorical confidence attached to a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A single evidence value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvidenceValue {
    Number(f64),
    Text(String),
    Flag(bool),
    /// Serialized as `null`: the indicator had no value.
    Missing,
}

impl From<f64> for EvidenceValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Option<f64>> for EvidenceValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Self::Missing, Self::Number)
    }
}

impl From<&str> for EvidenceValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for EvidenceValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for EvidenceValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

/// Insertion-ordered label → value record explaining a decision.
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    entries: Vec<(String, EvidenceValue)>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, replacing the value if the label already exists.
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<EvidenceValue>) {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    /// Builder form of [`Evidence::push`].
    pub fn with(mut self, label: impl Into<String>, value: impl Into<EvidenceValue>) -> Self {
        self.push(label, value);
        self
    }

    pub fn get(&self, label: &str) -> Option<&EvidenceValue> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// Numeric value for `label`, if present and numeric.
    pub fn number(&self, label: &str) -> Option<f64> {
        match self.get(label) {
            Some(EvidenceValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    /// Text value for `label`, if present and textual.
    pub fn text(&self, label: &str) -> Option<&str> {
        match self.get(label) {
            Some(EvidenceValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn flag(&self, label: &str) -> Option<bool> {
        match self.get(label) {
            Some(EvidenceValue::Flag(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EvidenceValue)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy with every numeric value rounded to `digits` fractional digits.
    pub fn rounded(&self, digits: u32) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(l, v)| {
                let v = match v {
                    EvidenceValue::Number(n) => EvidenceValue::Number(round_to(*n, digits)),
                    other => other.clone(),
                };
                (l.clone(), v)
            })
            .collect();
        Self { entries }
    }
}

impl Serialize for Evidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// One strategy's verdict. Produced fresh by each strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub direction: Direction,
    pub confidence: Confidence,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub current_price: f64,
    pub evidence: Evidence,
}

impl Signal {
    /// Placeholder verdict for a strategy that lacks the history it needs.
    pub fn no_data(current_price: f64, reason: impl Into<String>) -> Self {
        Self {
            direction: Direction::NoData,
            confidence: Confidence::Low,
            take_profit: 0.0,
            stop_loss: 0.0,
            current_price,
            evidence: Evidence::new().with("error", reason.into()),
        }
    }

    /// Copy with prices and numeric evidence rounded for output.
    pub fn rounded(&self, digits: u32) -> Self {
        Self {
            direction: self.direction,
            confidence: self.confidence,
            take_profit: round_to(self.take_profit, digits),
            stop_loss: round_to(self.stop_loss, digits),
            current_price: round_to(self.current_price, digits),
            evidence: self.evidence.rounded(digits),
        }
    }
}

/// Round half away from zero to `digits` fractional digits.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
