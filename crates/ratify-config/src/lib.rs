//! Layered configuration for Ratify.
//!
//! # Usage
//!
//! ```rust,no_run
//! use ratify_config::Config;
//!
//! // defaults → ~/.ratify/config.toml → explicit file → RATIFY_* env
//! let resolved = Config::load(None).unwrap();
//! println!("OWNERS links on branch {}", resolved.config.display.branch);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Explicit file** passed with `--config`
//! 2. **User** (`~/.ratify/config.toml`)
//! 3. **Environment variables** (`RATIFY_*`), fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into binary)
//!
//! This crate has no dependencies on other internal ratify crates; the CLI
//! converts config sections into domain types.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging with precedence.
pub mod merge;
/// Resolved configuration display and serialization.
pub mod show;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::LoadOptions;
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain, reading fallbacks
    /// from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        let options = LoadOptions {
            ratify_home: None,
            explicit,
        };
        loader::load(&options, &env::collect_env_vars())
    }
}
