//! Ratify Telemetry - Logging for the Ratify approval tools.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats
//! - Stdout, stderr or rotating file output
//! - Integration with the tracing ecosystem
//!
//! # Example
//!
//! ```rust,no_run
//! use ratify_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), ratify_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("ratify_approval=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("evaluating change");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
