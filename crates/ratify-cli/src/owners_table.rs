//! Approver declarations loaded from a TOML file.
//!
//! ```toml
//! [owners]
//! "" = ["Alice", "Bob"]     # repository root
//! "pkg/api" = ["Art"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use ratify_approval::{ApproverSetProvider, BoxError};
use serde::Deserialize;
use tracing::debug;

/// Directory to approver list table.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OwnersTable {
    #[serde(default)]
    owners: BTreeMap<String, Vec<String>>,
}

impl OwnersTable {
    /// Read and parse an owners file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read owners file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse owners file {}", path.display()))
    }

    /// Parse owners TOML. Directory keys may carry stray slashes and `.`
    /// names the root.
    pub(crate) fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let raw: Self = toml::from_str(content)?;
        let mut owners: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (directory, approvers) in raw.owners {
            let key = normalize_directory(&directory);
            owners.entry(key).or_default().extend(approvers);
        }
        debug!(directories = owners.len(), "loaded owners table");
        Ok(Self { owners })
    }
}

fn normalize_directory(directory: &str) -> String {
    let trimmed = directory.trim().trim_matches('/');
    if trimmed == "." {
        String::new()
    } else {
        trimmed.to_owned()
    }
}

impl ApproverSetProvider for OwnersTable {
    fn approvers(&self, directory: &str) -> Result<Vec<String>, BoxError> {
        Ok(self.owners.get(directory).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root_and_nested() {
        let table = OwnersTable::parse(
            r#"
            [owners]
            "" = ["Alice", "Bob"]
            "a/d" = ["David"]
        "#,
        )
        .unwrap();
        assert_eq!(table.approvers("").unwrap(), vec!["Alice", "Bob"]);
        assert_eq!(table.approvers("a/d").unwrap(), vec!["David"]);
        assert!(table.approvers("a").unwrap().is_empty());
    }

    #[test]
    fn test_keys_are_normalized_and_merged() {
        let table = OwnersTable::parse(
            r#"
            [owners]
            "." = ["Alice"]
            "/" = ["Bob"]
            "docs/" = ["Dana"]
        "#,
        )
        .unwrap();
        assert_eq!(table.approvers("").unwrap().len(), 2);
        assert_eq!(table.approvers("docs").unwrap(), vec!["Dana"]);
    }

    #[test]
    fn test_missing_table_is_empty() {
        let table = OwnersTable::parse("").unwrap();
        assert!(table.approvers("").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_shape_rejected() {
        assert!(OwnersTable::parse("[owners]\na = \"Alice\"").is_err());
    }
}
