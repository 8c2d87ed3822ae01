//! Data model shared by the catalog, gateway, projector and view state

use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tradable stock symbol and its human-readable company name.
///
/// Tickers are immutable; catalog entries guarantee symbol uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub display_name: String,
}

impl Ticker {
    pub fn new(symbol: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
        }
    }
}

/// Predicted market direction of one model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

/// Directional prediction with an associated confidence score.
///
/// `confidence` is `None` when the remote score is absent or not a finite
/// number; the adapters render that as `"N/A"` instead of a crashed
/// percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelVerdict {
    pub direction: Direction,
    pub confidence: Option<f64>,
}

impl ModelVerdict {
    pub fn new(direction: Direction, confidence: Option<f64>) -> Self {
        Self {
            direction,
            confidence,
        }
    }
}

/// A single descriptive field value as received from the info lookup.
///
/// Remote values that are not plain scalars (null, booleans, arrays,
/// objects) become `Unavailable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Unavailable,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Unavailable => f.write_str("N/A"),
        }
    }
}

/// Descriptive fields of a stock, in the order the remote sent them.
///
/// Wire order is preserved so the adapters can pair entries into display
/// rows without reshuffling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InfoRecord {
    fields: Vec<(String, FieldValue)>,
}

impl InfoRecord {
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Historical price payload exactly as received from the history lookup.
///
/// `labels` and `prices` are index-aligned; the projector tolerates a
/// length mismatch by truncating to the shorter side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub labels: Vec<String>,
    pub prices: Vec<f64>,
}

/// One chart-ready point of the price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub label: String,
    pub price: f64,
}

/// Chart-ready ordered price series, chronological order preserved
pub type PriceSeries = Vec<PricePoint>;

/// Settled (or not yet settled) result of one remote lookup
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Pending,
    Success(T),
    Failure(FetchError),
}

impl<T> FetchOutcome<T> {
    /// The payload if the lookup succeeded, `None` otherwise
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Pending | Self::Failure(_) => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// The three outcomes of one fan-out fetch cycle.
///
/// `predictions` carries the SVM verdict first and the random-forest
/// verdict second.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchBundle {
    pub predictions: FetchOutcome<(ModelVerdict, ModelVerdict)>,
    pub info: FetchOutcome<InfoRecord>,
    pub series: FetchOutcome<RawSeries>,
}

impl Default for FetchBundle {
    fn default() -> Self {
        Self {
            predictions: FetchOutcome::Pending,
            info: FetchOutcome::Pending,
            series: FetchOutcome::Pending,
        }
    }
}

impl FetchBundle {
    /// True once all three lookups have settled (success or failure)
    pub fn is_settled(&self) -> bool {
        self.predictions.is_settled() && self.info.is_settled() && self.series.is_settled()
    }
}
