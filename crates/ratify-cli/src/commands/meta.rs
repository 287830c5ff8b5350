//! Meta command - read the suggestion metadata out of a posted report.

use std::path::Path;

use anyhow::{Context, Result};
use ratify_approval::ReportMetadata;

/// Extract metadata from the report in `path` as pretty JSON.
///
/// Returns `None` when the report carries no metadata block.
pub(crate) fn read_meta(path: &Path) -> Result<Option<String>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    let Some(meta) = ReportMetadata::extract(&body)
        .with_context(|| format!("malformed metadata in {}", path.display()))?
    else {
        return Ok(None);
    };
    Ok(Some(serde_json::to_string_pretty(&meta)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_trailing_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.md");
        std::fs::write(
            &path,
            "[APPROVALNOTIFIER] This PR is **NOT APPROVED**\n<!-- META={\"approvers\":[\"Alice\"]} -->",
        )
        .unwrap();

        let json = read_meta(&path).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["approvers"], serde_json::json!(["Alice"]));
    }

    #[test]
    fn test_missing_block_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.md");
        std::fs::write(&path, "no metadata here").unwrap();
        assert!(read_meta(&path).unwrap().is_none());
    }

    #[test]
    fn test_unterminated_block_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.md");
        std::fs::write(&path, "<!-- META={\"approvers\":[]}").unwrap();
        assert!(read_meta(&path).is_err());
    }
}
