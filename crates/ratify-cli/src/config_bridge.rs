//! Bridge from `ratify_config::Config` to domain types.

use anyhow::{Result, bail};
use ratify_approval::DisplayContext;
use ratify_config::Config;
use ratify_telemetry::{FileRotation, LogConfig, LogFormat, LogTarget};

/// Convert config to [`LogConfig`].
#[must_use]
pub fn to_log_config(cfg: &Config) -> LogConfig {
    let format = LogFormat::from_name(&cfg.logging.format).unwrap_or_default();
    let mut log_config = LogConfig::new(&cfg.logging.level).with_format(format);

    match (cfg.logging.target.as_str(), &cfg.logging.directory) {
        ("file", Some(directory)) => {
            let rotation = FileRotation::from_name(&cfg.logging.rotation).unwrap_or_default();
            log_config = log_config.with_file_logging(directory, "ratify", rotation);
        },
        ("stdout", _) => log_config = log_config.with_target(LogTarget::Stdout),
        _ => {},
    }

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }

    log_config
}

/// Convert config to a [`DisplayContext`] for OWNERS links.
///
/// # Errors
///
/// Fails when `display.org` or `display.project` is not configured.
pub fn to_display_context(cfg: &Config) -> Result<DisplayContext> {
    let display = &cfg.display;
    let (Some(org), Some(project)) = (&display.org, &display.project) else {
        bail!(
            "display.org and display.project must be set (config file, or RATIFY_ORG and \
             RATIFY_PROJECT) to render reports"
        );
    };

    Ok(DisplayContext::new(org.as_str(), project.as_str())
        .with_root_url(display.root_url.as_str())
        .with_branch(display.branch.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_from_defaults() {
        let lc = to_log_config(&Config::default());
        assert_eq!(lc.level, "warn");
        assert_eq!(lc.format, LogFormat::Compact);
    }

    #[test]
    fn test_log_config_directives() {
        let mut cfg = Config::default();
        cfg.logging.format = "json".to_owned();
        cfg.logging.directives = vec!["ratify_approval=debug".to_owned()];
        let lc = to_log_config(&cfg);
        assert_eq!(lc.format, LogFormat::Json);
        assert_eq!(lc.directives, vec!["ratify_approval=debug"]);
    }

    #[test]
    fn test_log_config_file_target() {
        let mut cfg = Config::default();
        cfg.logging.target = "file".to_owned();
        cfg.logging.directory = Some("/var/log/ratify".to_owned());
        cfg.logging.rotation = "hourly".to_owned();
        let lc = to_log_config(&cfg);
        assert_eq!(lc.target, LogTarget::File("/var/log/ratify".into()));
        assert_eq!(lc.file.rotation, FileRotation::Hourly);
        assert!(!lc.ansi);
    }

    #[test]
    fn test_log_config_defaults_to_stderr() {
        assert_eq!(to_log_config(&Config::default()).target, LogTarget::Stderr);
    }

    #[test]
    fn test_display_context_requires_org_and_project() {
        let mut cfg = Config::default();
        assert!(to_display_context(&cfg).is_err());

        cfg.display.org = Some("kubernetes".to_owned());
        cfg.display.project = Some("test-infra".to_owned());
        cfg.display.branch = "main".to_owned();
        let display = to_display_context(&cfg).unwrap();
        assert_eq!(
            display.owners_link(""),
            "https://github.com/kubernetes/test-infra/blob/main/OWNERS"
        );
    }
}
