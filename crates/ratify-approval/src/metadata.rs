//! Machine-readable metadata embedded in rendered reports.
//!
//! A report ends with an HTML comment of the form
//! `<!-- META={"approvers":["Alice"]} -->`. It is the only state carried from
//! one evaluation to the next: the host reads it back from the previously
//! posted report.
//!
//! # Format
//!
//! The JSON object has an ordered `approvers` list and an optional integer
//! `version`. A missing version means version 1, and version 1 is written
//! without the field. Unknown fields are ignored so newer writers stay
//! readable; versions newer than [`METADATA_VERSION`] are rejected.

use serde::{Deserialize, Serialize};

use crate::error::{ApprovalError, ApprovalResult};

/// Highest metadata version this crate reads and the version it writes.
pub const METADATA_VERSION: u32 = 1;

const OPEN: &str = "<!-- META=";
const CLOSE: &str = "-->";

/// Metadata carried between evaluations.
///
/// # Example
///
/// ```
/// use ratify_approval::ReportMetadata;
///
/// let meta = ReportMetadata::new(vec!["Alice".to_string()]);
/// let comment = meta.to_comment().unwrap();
/// assert_eq!(comment, r#"<!-- META={"approvers":["Alice"]} -->"#);
///
/// let body = format!("some report\n{comment}");
/// assert_eq!(ReportMetadata::extract(&body).unwrap(), Some(meta));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Format version.
    #[serde(default = "default_version", skip_serializing_if = "is_default_version")]
    pub version: u32,
    /// Suggested approvers at the time the report was rendered, in order.
    #[serde(default)]
    pub approvers: Vec<String>,
}

fn default_version() -> u32 {
    METADATA_VERSION
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_default_version(version: &u32) -> bool {
    *version == METADATA_VERSION
}

impl ReportMetadata {
    /// Metadata for the current format version.
    #[must_use]
    pub fn new(approvers: Vec<String>) -> Self {
        Self {
            version: METADATA_VERSION,
            approvers,
        }
    }

    /// Encode as the trailing HTML comment.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Metadata`] if serialization fails.
    pub fn to_comment(&self) -> ApprovalResult<String> {
        let json =
            serde_json::to_string(self).map_err(|e| ApprovalError::Metadata(e.to_string()))?;
        Ok(format!("{OPEN}{} {CLOSE}", escape_markup(&json)))
    }

    /// Decode the JSON payload of a metadata block.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Metadata`] for malformed JSON or an
    /// unsupported version.
    pub fn from_json(json: &str) -> ApprovalResult<Self> {
        let meta: Self =
            serde_json::from_str(json).map_err(|e| ApprovalError::Metadata(e.to_string()))?;
        if meta.version > METADATA_VERSION {
            return Err(ApprovalError::Metadata(format!(
                "unsupported metadata version {} (newest supported is {METADATA_VERSION})",
                meta.version
            )));
        }
        Ok(meta)
    }

    /// Find and decode the last metadata block in a report body.
    ///
    /// Returns `Ok(None)` when the body carries no metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Metadata`] if a block is present but
    /// unterminated, malformed, or of an unsupported version.
    pub fn extract(body: &str) -> ApprovalResult<Option<Self>> {
        let Some(start) = body.rfind(OPEN) else {
            return Ok(None);
        };
        let rest = body.get(start..).unwrap_or_default();
        let payload = rest.get(OPEN.len()..).unwrap_or_default();
        let Some(end) = payload.find(CLOSE) else {
            return Err(ApprovalError::Metadata(
                "metadata comment is not terminated".to_owned(),
            ));
        };
        let json = payload.get(..end).unwrap_or_default().trim();
        Self::from_json(json).map(Some)
    }
}

/// Escape the characters that could end the HTML comment early or be read
/// as markup. JSON decodes the `\u` forms back to the original text.
fn escape_markup(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Whether a freshly rendered report differs from the previously posted one.
///
/// Hosts skip the update when this is `false`. A missing previous report
/// always needs posting. Trailing line endings are ignored, since hosts and
/// shells append them when storing the body.
#[must_use]
pub fn needs_update(previous: Option<&str>, fresh: &str) -> bool {
    previous.is_none_or(|previous| trim_line_endings(previous) != trim_line_endings(fresh))
}

fn trim_line_endings(body: &str) -> &str {
    body.trim_end_matches(['\r', '\n'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_encodes_as_empty_array() {
        let comment = ReportMetadata::new(Vec::new()).to_comment().unwrap();
        assert_eq!(comment, r#"<!-- META={"approvers":[]} -->"#);
    }

    #[test]
    fn test_extract_without_metadata() {
        assert_eq!(ReportMetadata::extract("just text").unwrap(), None);
    }

    #[test]
    fn test_extract_uses_last_block() {
        let body = concat!(
            r#"<!-- META={"approvers":["Old"]} -->"#,
            "\nquoted reply\n",
            r#"<!-- META={"approvers":["New","Other"]} -->"#
        );
        let meta = ReportMetadata::extract(body).unwrap().unwrap();
        assert_eq!(meta.approvers, vec!["New", "Other"]);
    }

    #[test]
    fn test_extract_tolerates_spacing_and_unknown_fields() {
        let body = r#"<!-- META= {"approvers":["A"],"labels":["x"]}-->"#;
        let meta = ReportMetadata::extract(body).unwrap().unwrap();
        assert_eq!(meta.version, 1);
        assert_eq!(meta.approvers, vec!["A"]);
    }

    #[test]
    fn test_extract_rejects_unterminated_block() {
        let err = ReportMetadata::extract(r#"<!-- META={"approvers":[]}"#).unwrap_err();
        assert!(matches!(err, ApprovalError::Metadata(_)));
    }

    #[test]
    fn test_extract_rejects_malformed_json() {
        assert!(ReportMetadata::extract("<!-- META={approvers} -->").is_err());
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = ReportMetadata::from_json(r#"{"version":2,"approvers":[]}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported metadata version 2"));
    }

    #[test]
    fn test_explicit_v1_accepted_and_written_without_version() {
        let meta = ReportMetadata::from_json(r#"{"version":1,"approvers":["B"]}"#).unwrap();
        assert_eq!(
            meta.to_comment().unwrap(),
            r#"<!-- META={"approvers":["B"]} -->"#
        );
    }

    #[test]
    fn test_needs_update() {
        assert!(needs_update(None, "x"));
        assert!(needs_update(Some("x"), "y"));
        assert!(!needs_update(Some("x"), "x"));
    }

    #[test]
    fn test_needs_update_ignores_trailing_newline() {
        assert!(!needs_update(Some("report\n"), "report"));
        assert!(!needs_update(Some("report\r\n"), "report"));
        assert!(needs_update(Some("report\n\nmore"), "report"));
    }

    #[test]
    fn test_comment_terminator_in_identity_round_trips() {
        let meta = ReportMetadata::new(vec!["dev-->ops".to_owned(), "a<b&c".to_owned()]);
        let comment = meta.to_comment().unwrap();
        assert_eq!(comment.matches(CLOSE).count(), 1);
        assert!(!comment.contains("<b"));

        let body = format!("report\n{comment}");
        assert_eq!(ReportMetadata::extract(&body).unwrap(), Some(meta));
    }
}
