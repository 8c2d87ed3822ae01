//! Error types for the StockSense data core

use thiserror::Error;

/// Failure reason attached to a settled fetch outcome.
///
/// Both variants are caught at the gateway boundary and carried inside
/// [`crate::model::FetchOutcome::Failure`]; they never propagate as raised
/// errors to the view-state controller. The reason is for logs only; the
/// front end renders a failed resource as an absent section.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level fault, including a non-success HTTP status
    #[error("network error: {0}")]
    Network(String),

    /// Payload was received but does not decode into the expected shape
    #[error("parse error: {0}")]
    Parse(String),
}

/// Construction-time errors of the StockSense core
#[derive(Debug, Error)]
pub enum SenseError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, SenseError>;
