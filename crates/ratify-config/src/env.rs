//! Environment variable fallbacks.
//!
//! Variables only fill fields that no config file set; a value written in a
//! file always wins over the environment.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::merge::{ConfigLayer, FieldSources};

/// Prefix shared by every variable this crate reads.
pub const ENV_PREFIX: &str = "RATIFY_";

/// Kind of value a variable carries.
#[derive(Debug, Clone, Copy)]
enum Kind {
    Text,
    Unsigned,
}

/// `(variable, dotted field path, kind)`.
const FALLBACKS: &[(&str, &str, Kind)] = &[
    ("RATIFY_ROOT_URL", "display.root_url", Kind::Text),
    ("RATIFY_ORG", "display.org", Kind::Text),
    ("RATIFY_PROJECT", "display.project", Kind::Text),
    ("RATIFY_BRANCH", "display.branch", Kind::Text),
    ("RATIFY_SEED", "suggestion.seed", Kind::Unsigned),
    ("RATIFY_LOG_LEVEL", "logging.level", Kind::Text),
    ("RATIFY_LOG_DIR", "logging.directory", Kind::Text),
];

/// Snapshot the `RATIFY_*` variables of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

/// Apply environment fallbacks to fields still at their default.
///
/// Returns how many fields were set.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String>,
) -> usize {
    let mut applied: usize = 0;

    for &(var, path, kind) in FALLBACKS {
        let Some(raw) = env_vars.get(var) else {
            continue;
        };
        if sources
            .get(path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults)
        {
            debug!(var, path, "config file value takes precedence over environment");
            continue;
        }
        let Some(value) = convert(raw, kind) else {
            warn!(var, value = %raw, "ignoring malformed environment variable");
            continue;
        };
        if set_path(merged, path, value) {
            sources.insert(path.to_owned(), ConfigLayer::Environment);
            applied = applied.saturating_add(1);
        }
    }

    applied
}

fn convert(raw: &str, kind: Kind) -> Option<toml::Value> {
    let raw = raw.trim();
    match kind {
        Kind::Text => Some(toml::Value::String(raw.to_owned())),
        // TOML integers are signed 64-bit.
        Kind::Unsigned => raw
            .parse::<u64>()
            .ok()
            .and_then(|n| i64::try_from(n).ok())
            .map(toml::Value::Integer),
    }
}

/// Set a dotted path, creating intermediate tables. Returns `false` if a
/// non-table value is in the way.
fn set_path(root: &mut toml::Value, path: &str, value: toml::Value) -> bool {
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let Some(table) = current.as_table_mut() else {
            return false;
        };
        if segments.peek().is_none() {
            table.insert(segment.to_owned(), value);
            return true;
        }
        current = table
            .entry(segment.to_owned())
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }
    false
}
