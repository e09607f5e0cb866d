//! Unified error hierarchy for racepace
//!
//! The engine surfaces two deterministic failures to callers: malformed
//! pace/time strings and unrecognized race types. Everything else is a
//! caller input-validation concern or an edge error from the CLI layer.

use thiserror::Error;

/// Top-level error type for all racepace operations
#[derive(Debug, Error)]
pub enum RacePaceError {
    /// Malformed pace or time string
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Race type absent from the catalog
    #[error("Unknown race type: {name}")]
    UnknownRaceType { name: String },

    /// A strategy-specific input the selected race requires was not supplied
    #[error("Missing input: {field}")]
    MissingInput { field: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pace and time string parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Pace was not a single `M:SS` pair of non-negative integers
    #[error("invalid pace '{input}', expected M:SS")]
    InvalidPace { input: String },

    /// Time was neither `H:MM:SS` nor `M:SS`
    #[error("invalid time '{input}', expected H:MM:SS or M:SS")]
    InvalidTime { input: String },
}

/// Result type alias for racepace operations
pub type Result<T> = std::result::Result<T, RacePaceError>;

impl RacePaceError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RacePaceError::Format(_) => ErrorSeverity::Warning,
            RacePaceError::MissingInput { .. } => ErrorSeverity::Warning,
            RacePaceError::UnknownRaceType { .. } => ErrorSeverity::Error,
            RacePaceError::Configuration(_) => ErrorSeverity::Error,
            RacePaceError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message naming the field to correct
    pub fn user_message(&self) -> String {
        match self {
            RacePaceError::Format(FormatError::InvalidPace { input }) => {
                format!("'{}' is not a valid pace. Please enter it as M:SS (e.g. 1:45).", input)
            }
            RacePaceError::Format(FormatError::InvalidTime { input }) => {
                format!(
                    "'{}' is not a valid time. Please enter it as H:MM:SS or M:SS.",
                    input
                )
            }
            RacePaceError::UnknownRaceType { name } => {
                format!("Race type '{}' is not supported. Please choose a race from the list.", name)
            }
            RacePaceError::MissingInput { field } => {
                format!("Please provide a value for {}.", field)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the computation
    Error,
    /// Correctable input problem
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
