//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_display(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn validate_display(config: &Config) -> ConfigResult<()> {
    let d = &config.display;

    if !(d.root_url.starts_with("https://") || d.root_url.starts_with("http://")) {
        return Err(invalid(
            "display.root_url",
            format!("'{}' must be an http(s) URL", d.root_url),
        ));
    }
    if d.root_url.ends_with('/') {
        return Err(invalid(
            "display.root_url",
            "must not end with a trailing slash",
        ));
    }

    for (field, value) in [("display.org", &d.org), ("display.project", &d.project)] {
        if let Some(value) = value {
            validate_segment(field, value)?;
        }
    }
    validate_segment("display.branch", &d.branch)?;

    Ok(())
}

/// A single non-empty URL path segment.
fn validate_segment(field: &str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    if value.contains('/') || value.chars().any(char::is_whitespace) {
        return Err(invalid(
            field,
            format!("'{value}' must not contain '/' or whitespace"),
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        ));
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        ));
    }

    let logging = &config.logging;
    match logging.target.as_str() {
        "stderr" | "stdout" => {},
        "file" => {
            if logging.directory.as_deref().is_none_or(|d| d.trim().is_empty()) {
                return Err(invalid(
                    "logging.directory",
                    "must be set when logging.target is \"file\"",
                ));
            }
        },
        other => {
            return Err(invalid(
                "logging.target",
                format!("unsupported log target '{other}'; expected one of: stderr, stdout, file"),
            ));
        },
    }

    let valid_rotations = ["daily", "hourly", "never"];
    if !valid_rotations.contains(&logging.rotation.as_str()) {
        return Err(invalid(
            "logging.rotation",
            format!(
                "unsupported rotation '{}'; expected one of: {}",
                logging.rotation,
                valid_rotations.join(", ")
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_root_url_scheme_and_trailing_slash() {
        let mut config = Config::default();
        config.display.root_url = "github.com".to_owned();
        assert_eq!(field_of(validate(&config)), "display.root_url");

        config.display.root_url = "https://github.com/".to_owned();
        assert_eq!(field_of(validate(&config)), "display.root_url");

        config.display.root_url = "http://git.internal.test".to_owned();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_org_and_project_must_be_single_segments() {
        let mut config = Config::default();
        config.display.org = Some(String::new());
        assert_eq!(field_of(validate(&config)), "display.org");

        config.display.org = Some("kubernetes".to_owned());
        config.display.project = Some("a/b".to_owned());
        assert_eq!(field_of(validate(&config)), "display.project");
    }

    #[test]
    fn test_empty_branch_rejected() {
        let mut config = Config::default();
        config.display.branch = String::new();
        assert_eq!(field_of(validate(&config)), "display.branch");
    }

    #[test]
    fn test_unknown_log_level_and_format() {
        let mut config = Config::default();
        config.logging.level = "loud".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.level");

        config.logging.level = "info".to_owned();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.format");
    }

    #[test]
    fn test_file_target_requires_directory() {
        let mut config = Config::default();
        config.logging.target = "file".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.directory");

        config.logging.directory = Some("/var/log/ratify".to_owned());
        assert!(validate(&config).is_ok());

        config.logging.rotation = "weekly".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.rotation");
    }

    #[test]
    fn test_unknown_log_target() {
        let mut config = Config::default();
        config.logging.target = "syslog".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.target");
    }
}
