//! Telemetry error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or a per-crate directive is not a valid filter.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// The rejected level or directive.
        directive: String,
        /// Parser message.
        message: String,
    },

    /// The log directory could not be created.
    #[error("cannot create log directory {}: {source}", path.display())]
    LogDirectory {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The rolling file appender or the global subscriber failed to start.
    #[error("logging initialization failed: {0}")]
    InitError(String),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
