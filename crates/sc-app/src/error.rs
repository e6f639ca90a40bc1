//! Error types for the sc-app service layer.

use std::path::PathBuf;

use sc_core::{CoreError, DomainKind};
use sc_import::ImportError;
use sc_signals::SignalError;

/// Application error type that wraps errors from the backend crates
/// and gives the CLI one error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to load {handle}: {reason}")]
    SourceLoad { handle: String, reason: String },

    #[error("Unknown formula: {0}")]
    UnknownFormula(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("A round needs at least one series")]
    EmptyRound,

    #[error("Cannot plot '{label}' ({found}) alongside {expected} data")]
    IncompatibleDomains {
        label: String,
        expected: DomainKind,
        found: DomainKind,
    },

    #[error("Series not in catalog: {0}")]
    UnknownSeries(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Errors the interactive loop answers with a re-prompt.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::SourceLoad { .. }
                | AppError::InvalidRange(_)
                | AppError::UnknownFormula(_)
                | AppError::InvalidInput(_)
        )
    }
}

// Conversions from backend error types
impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        let (path, reason) = match &err {
            ImportError::FileRead { path, source } => (path, source.to_string()),
            ImportError::NoValidRows { path } => (path, "no valid data rows".to_string()),
            ImportError::InvalidSeries { path, source } => (path, source.to_string()),
        };
        AppError::SourceLoad {
            handle: path.display().to_string(),
            reason,
        }
    }
}

impl From<SignalError> for AppError {
    fn from(err: SignalError) -> Self {
        match err {
            SignalError::UnknownFormula(name) => AppError::UnknownFormula(name),
            SignalError::InvalidDomain { what } => AppError::InvalidInput(what),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidRange { .. } => AppError::InvalidRange(err.to_string()),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

impl From<sc_results::ResultsError> for AppError {
    fn from(err: sc_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
