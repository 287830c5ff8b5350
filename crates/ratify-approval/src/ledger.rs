//! Endorsement ledger for a single change.
//!
//! The host classifies its own events (review comments, `/approve` commands,
//! LGTM labels) into [`EndorsementKind`]s and records them here. The ledger
//! is additive; an explicit approval cancel removes only the approval.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApprovalResult;
use crate::identity::Identity;

/// Kind of endorsement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndorsementKind {
    /// Counts toward authorization.
    Approval,
    /// Informational only (e.g. an LGTM); never satisfies a directory.
    Advisory,
}

impl EndorsementKind {
    /// Title used when rendering the endorsement.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Approval => "Approved",
            Self::Advisory => "LGTM",
        }
    }
}

/// A recorded endorsement and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementRecord {
    /// Who endorsed.
    pub identity: Identity,
    /// Provenance reference (usually a link to the comment or review).
    pub reference: String,
    /// Approval or advisory.
    pub kind: EndorsementKind,
}

/// Endorsements and assignees for one change.
///
/// # Example
///
/// ```
/// use ratify_approval::ApprovalLedger;
///
/// let mut ledger = ApprovalLedger::new();
/// ledger.record_approval("Alice", "https://example.test/c/1").unwrap();
/// ledger.record_approval("alice", "https://example.test/c/2").unwrap();
/// ledger.record_advisory("Bob", "https://example.test/c/3").unwrap();
///
/// assert_eq!(ledger.approvals().count(), 1);
/// assert!(ledger.record_approval(" ", "ref").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApprovalLedger {
    approvals: BTreeMap<Identity, EndorsementRecord>,
    advisories: BTreeMap<Identity, EndorsementRecord>,
    assignees: BTreeSet<Identity>,
}

impl ApprovalLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an approval. Re-approving replaces the previous reference.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidIdentity`](crate::ApprovalError::InvalidIdentity)
    /// for a malformed identity; the ledger is left unchanged.
    pub fn record_approval(
        &mut self,
        identity: &str,
        reference: impl Into<String>,
    ) -> ApprovalResult<()> {
        self.record(identity, reference.into(), EndorsementKind::Approval)
    }

    /// Record an advisory endorsement.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidIdentity`](crate::ApprovalError::InvalidIdentity)
    /// for a malformed identity; the ledger is left unchanged.
    pub fn record_advisory(
        &mut self,
        identity: &str,
        reference: impl Into<String>,
    ) -> ApprovalResult<()> {
        self.record(identity, reference.into(), EndorsementKind::Advisory)
    }

    /// Remove a previously recorded approval.
    ///
    /// Returns `true` if an approval was removed. Advisory endorsements by the
    /// same identity are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidIdentity`](crate::ApprovalError::InvalidIdentity)
    /// for a malformed identity.
    pub fn cancel_approval(&mut self, identity: &str) -> ApprovalResult<bool> {
        let identity = Identity::parse(identity)?;
        let removed = self.approvals.remove(&identity).is_some();
        debug!(identity = %identity, removed, "approval cancelled");
        Ok(removed)
    }

    /// Add identities to the assignee set. Malformed entries are skipped.
    pub fn record_assignees<I, S>(&mut self, identities: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in identities {
            match Identity::parse(raw.as_ref()) {
                Ok(identity) => {
                    self.assignees.insert(identity);
                },
                Err(_) => warn!(assignee = raw.as_ref(), "skipping malformed assignee"),
            }
        }
    }

    /// Approval records ordered by identity.
    pub fn approvals(&self) -> impl Iterator<Item = &EndorsementRecord> {
        self.approvals.values()
    }

    /// Advisory records ordered by identity, including identities that also
    /// approved.
    pub fn advisories(&self) -> impl Iterator<Item = &EndorsementRecord> {
        self.advisories.values()
    }

    /// The approval record for `identity`, if any.
    #[must_use]
    pub fn approval_of(&self, identity: &Identity) -> Option<&EndorsementRecord> {
        self.approvals.get(identity)
    }

    /// Whether `identity` has approved.
    #[must_use]
    pub fn has_approved(&self, identity: &Identity) -> bool {
        self.approvals.contains_key(identity)
    }

    /// Identities assigned to the change.
    #[must_use]
    pub fn assignees(&self) -> &BTreeSet<Identity> {
        &self.assignees
    }

    fn record(
        &mut self,
        identity: &str,
        reference: String,
        kind: EndorsementKind,
    ) -> ApprovalResult<()> {
        let identity = Identity::parse(identity)?;
        debug!(identity = %identity, ?kind, "recording endorsement");
        let record = EndorsementRecord {
            identity: identity.clone(),
            reference,
            kind,
        };
        let target = match kind {
            EndorsementKind::Approval => &mut self.approvals,
            EndorsementKind::Advisory => &mut self.advisories,
        };
        target.insert(identity, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApprovalError;

    fn id(name: &str) -> Identity {
        Identity::parse(name).unwrap()
    }

    #[test]
    fn test_repeat_approval_is_idempotent_last_reference_wins() {
        let mut ledger = ApprovalLedger::new();
        ledger.record_approval("Bill", "first").unwrap();
        ledger.record_approval("BILL", "second").unwrap();

        let records: Vec<_> = ledger.approvals().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reference, "second");
        assert_eq!(records[0].identity.as_str(), "BILL");
        assert!(ledger.has_approved(&id("bill")));
    }

    #[test]
    fn test_advisory_does_not_approve() {
        let mut ledger = ApprovalLedger::new();
        ledger.record_advisory("Bill", "ref").unwrap();
        assert!(!ledger.has_approved(&id("Bill")));
        assert_eq!(ledger.advisories().count(), 1);
    }

    #[test]
    fn test_malformed_identity_rejected_without_change() {
        let mut ledger = ApprovalLedger::new();
        let err = ledger.record_approval("", "ref").unwrap_err();
        assert!(matches!(err, ApprovalError::InvalidIdentity { .. }));
        assert!(ledger.record_advisory("a b", "ref").is_err());
        assert_eq!(ledger.approvals().count(), 0);
        assert_eq!(ledger.advisories().count(), 0);
    }

    #[test]
    fn test_cancel_removes_approval_only() {
        let mut ledger = ApprovalLedger::new();
        ledger.record_approval("Ann", "a").unwrap();
        ledger.record_advisory("Ann", "b").unwrap();

        assert!(ledger.cancel_approval("ann").unwrap());
        assert!(!ledger.has_approved(&id("Ann")));
        assert_eq!(ledger.advisories().count(), 1);
        assert!(!ledger.cancel_approval("ann").unwrap());
    }

    #[test]
    fn test_assignees_skip_malformed() {
        let mut ledger = ApprovalLedger::new();
        ledger.record_assignees(["Art", "", "ben", "ART"]);
        let names: Vec<_> = ledger.assignees().iter().map(Identity::as_str).collect();
        assert_eq!(names, vec!["Art", "ben"]);
    }

    #[test]
    fn test_kind_titles() {
        assert_eq!(EndorsementKind::Approval.title(), "Approved");
        assert_eq!(EndorsementKind::Advisory.title(), "LGTM");
    }
}
