//! CLI handlers for the `ratify config` subcommand.

use anyhow::Result;
use clap::ValueEnum;
use ratify_config::{ConfigResult, ResolvedConfig, ShowFormat};

use crate::theme::Theme;

/// Output format accepted by `config show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ShowArg {
    /// Annotated TOML.
    #[default]
    Toml,
    /// JSON with sources.
    Json,
}

impl From<ShowArg> for ShowFormat {
    fn from(arg: ShowArg) -> Self {
        match arg {
            ShowArg::Toml => Self::Toml,
            ShowArg::Json => Self::Json,
        }
    }
}

/// Show the resolved configuration with source annotations.
pub(crate) fn show_config(resolved: &ResolvedConfig, format: ShowArg) -> Result<()> {
    let output = resolved
        .show(format.into())
        .map_err(|e| anyhow::anyhow!("failed to format config: {e}"))?;
    println!("{output}");
    Ok(())
}

/// Report whether the configuration loaded cleanly. Returns `false` on error.
pub(crate) fn validate_config(loaded: &ConfigResult<ResolvedConfig>) -> bool {
    match loaded {
        Ok(resolved) => {
            println!("{}", Theme::success("Configuration is valid."));
            if resolved.config.display.org.is_none() || resolved.config.display.project.is_none()
            {
                let note = "display.org and display.project are unset; reports cannot be rendered";
                println!("{}", Theme::warning(note));
            }
            if !resolved.loaded_files.is_empty() {
                println!("\nLoaded files:");
                for path in &resolved.loaded_files {
                    println!("  - {path}");
                }
            }
            true
        },
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("Configuration error: {e}")));
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratify_config::{Config, ConfigError};

    fn resolved() -> ResolvedConfig {
        ResolvedConfig {
            config: Config::default(),
            field_sources: Default::default(),
            loaded_files: vec!["/tmp/ratify.toml".to_owned()],
        }
    }

    #[test]
    fn test_validate_reports_success() {
        assert!(validate_config(&Ok(resolved())));
    }

    #[test]
    fn test_validate_reports_failure() {
        let err = ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: "unknown format".to_owned(),
        };
        assert!(!validate_config(&Err(err)));
    }

    #[test]
    fn test_show_arg_maps_to_format() {
        assert_eq!(ShowFormat::from(ShowArg::Json), ShowFormat::Json);
        assert_eq!(ShowFormat::from(ShowArg::default()), ShowFormat::Toml);
    }
}
