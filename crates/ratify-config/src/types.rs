//! Configuration types.
//!
//! Every struct implements [`Default`] matching `defaults.toml`, so a bare
//! `[section]` header in a config file produces a working configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where OWNERS links in reports point.
    pub display: DisplaySection,
    /// Reviewer suggestion tuning.
    pub suggestion: SuggestionSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

/// Repository location used when rendering reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Code host base URL, without a trailing slash.
    pub root_url: String,
    /// Organization or owner. Required by commands that render reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    /// Repository name. Required by commands that render reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Branch OWNERS links point at.
    pub branch: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            root_url: "https://github.com".to_owned(),
            org: None,
            project: None,
            branch: "master".to_owned(),
        }
    }
}

/// Reviewer suggestion settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionSection {
    /// Seed for tie-breaking between equally good candidates. Hosts usually
    /// pass a per-change value (such as the change number) instead.
    pub seed: u64,
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["ratify_approval=debug"]`).
    pub directives: Vec<String>,
    /// Where logs go: `"stderr"`, `"stdout"`, or `"file"`.
    pub target: String,
    /// Log directory. Required when `target = "file"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// File rotation: `"daily"`, `"hourly"`, or `"never"`.
    pub rotation: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            target: "stderr".to_owned(),
            directory: None,
            rotation: "daily".to_owned(),
        }
    }
}
