//! Error types for signal generation.

use thiserror::Error;

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    /// Formula id that does not parse, or is absent from the registry.
    #[error("Unknown formula: {0}")]
    UnknownFormula(String),

    /// Domain spec that cannot be sampled.
    #[error("Invalid domain: {what}")]
    InvalidDomain { what: String },
}
