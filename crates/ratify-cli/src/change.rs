//! A change under review, loaded from a TOML file.
//!
//! ```toml
//! files = ["pkg/api/types.go", "README.md"]
//! assignees = ["art"]
//!
//! [[events]]
//! identity = "Alice"
//! action = "approve"
//! reference = "https://example.test/pr/1#issuecomment-1"
//!
//! [[events]]
//! identity = "Alice"
//! action = "cancel"
//! ```
//!
//! Events are replayed in file order, so a cancel only removes approvals
//! recorded before it.

use std::path::Path;

use anyhow::{Context, Result};
use ratify_approval::ApprovalLedger;
use serde::Deserialize;
use tracing::debug;

/// What an event does to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Action {
    /// Counts toward authorization.
    Approve,
    /// Informational endorsement such as an LGTM.
    Advisory,
    /// Withdraws an earlier approval.
    Cancel,
}

/// One classified host event.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Event {
    pub(crate) identity: String,
    pub(crate) action: Action,
    #[serde(default)]
    pub(crate) reference: String,
}

/// Changed files, assignees and endorsement events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ChangeFile {
    #[serde(default)]
    pub(crate) files: Vec<String>,
    #[serde(default)]
    pub(crate) assignees: Vec<String>,
    #[serde(default)]
    pub(crate) events: Vec<Event>,
}

impl ChangeFile {
    /// Read and parse a change file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read change file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse change file {}", path.display()))
    }

    /// Replay the events into a fresh ledger.
    pub(crate) fn ledger(&self) -> Result<ApprovalLedger> {
        let mut ledger = ApprovalLedger::new();
        for (index, event) in self.events.iter().enumerate() {
            let identity = event.identity.as_str();
            let applied = match event.action {
                Action::Approve => ledger.record_approval(identity, event.reference.clone()),
                Action::Advisory => ledger.record_advisory(identity, event.reference.clone()),
                Action::Cancel => ledger.cancel_approval(identity).map(|removed| {
                    if !removed {
                        debug!(identity, "cancel without a prior approval");
                    }
                }),
            };
            applied.with_context(|| format!("event {index} ({identity:?})"))?;
        }
        ledger.record_assignees(&self.assignees);
        Ok(ledger)
    }
}
