//! Per-directory approval aggregation.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApprovalResult;
use crate::identity::Identity;
use crate::ledger::{ApprovalLedger, EndorsementRecord};
use crate::provider::ApproverSetProvider;
use crate::resolver::OwnersResolver;

/// Who may approve an owning directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryAuthority {
    /// Approvers declared at the directory itself.
    pub own: BTreeSet<Identity>,
    /// Approvers declared at the directory or any ancestor.
    pub chain: BTreeSet<Identity>,
}

/// Authority of every owning directory touched by a change.
pub type AuthorityTable = BTreeMap<String, DirectoryAuthority>;

/// Approval state of one owning directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DirectoryStatus {
    /// At least one identity from the authorized chain approved.
    Satisfied {
        /// The owning directory.
        directory: String,
        /// Approvers from the chain, in the chain's casing.
        endorsers: BTreeSet<Identity>,
    },
    /// Nobody from the authorized chain approved.
    Unsatisfied {
        /// The owning directory.
        directory: String,
        /// `false` when the chain is empty and nobody could ever approve.
        has_authority: bool,
    },
}

impl DirectoryStatus {
    /// The owning directory this status is about.
    #[must_use]
    pub fn directory(&self) -> &str {
        match self {
            Self::Satisfied { directory, .. } | Self::Unsatisfied { directory, .. } => directory,
        }
    }

    /// Whether the directory is satisfied.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }

    /// Whether anyone is authorized to approve the directory. Always true
    /// once satisfied.
    #[must_use]
    pub fn has_authority(&self) -> bool {
        match self {
            Self::Satisfied { .. } => true,
            Self::Unsatisfied { has_authority, .. } => *has_authority,
        }
    }

    /// Satisfying approvers; `None` when unsatisfied.
    #[must_use]
    pub fn endorsers(&self) -> Option<&BTreeSet<Identity>> {
        match self {
            Self::Satisfied { endorsers, .. } => Some(endorsers),
            Self::Unsatisfied { .. } => None,
        }
    }
}

/// Classifies every owning directory of a change against a ledger.
///
/// Built fresh for each evaluation; holds no references to its inputs.
#[derive(Debug, Clone)]
pub struct ApprovalAggregator {
    statuses: Vec<DirectoryStatus>,
    authority: AuthorityTable,
    endorsements: Vec<EndorsementRecord>,
}

impl ApprovalAggregator {
    /// Resolve `files` and classify their owning directories.
    ///
    /// # Errors
    ///
    /// Propagates path and provider errors from the resolver.
    pub fn build<P, I, S>(
        resolver: &OwnersResolver<P>,
        files: I,
        ledger: &ApprovalLedger,
    ) -> ApprovalResult<Self>
    where
        P: ApproverSetProvider,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let directories = resolver.resolve(files)?;

        let mut authority = AuthorityTable::new();
        for directory in &directories {
            authority.insert(directory.clone(), DirectoryAuthority {
                own: resolver.leaf_approvers(directory)?,
                chain: resolver.authorized_chain(directory)?,
            });
        }

        let statuses = directories
            .iter()
            .map(|directory| classify(directory, &authority, ledger))
            .collect();

        let endorsements = canonical_endorsements(&authority, ledger);

        Ok(Self {
            statuses,
            authority,
            endorsements,
        })
    }

    /// Status of `directory`, if it is one of the change's owning directories.
    #[must_use]
    pub fn status_of(&self, directory: &str) -> Option<&DirectoryStatus> {
        self.statuses.iter().find(|s| s.directory() == directory)
    }

    /// Every owning directory's status, in first-occurrence order.
    #[must_use]
    pub fn statuses(&self) -> &[DirectoryStatus] {
        &self.statuses
    }

    /// Owning directories nobody authorized has approved yet.
    #[must_use]
    pub fn unsatisfied_directories(&self) -> Vec<String> {
        self.statuses
            .iter()
            .filter(|s| !s.is_satisfied())
            .map(|s| s.directory().to_owned())
            .collect()
    }

    /// Unsatisfied directories whose authorized chain is empty.
    #[must_use]
    pub fn unauthorized_directories(&self) -> Vec<String> {
        self.statuses
            .iter()
            .filter(|s| !s.has_authority())
            .map(|s| s.directory().to_owned())
            .collect()
    }

    /// Whether every owning directory is satisfied. True for an empty change.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.statuses.iter().all(DirectoryStatus::is_satisfied)
    }

    /// Approvers counted for each owning directory (empty when none).
    #[must_use]
    pub fn per_directory_approvers(&self) -> BTreeMap<String, BTreeSet<Identity>> {
        self.statuses
            .iter()
            .map(|s| {
                (
                    s.directory().to_owned(),
                    s.endorsers().cloned().unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Endorsements for display: approvals, then advisory-only endorsements.
    #[must_use]
    pub fn endorsements(&self) -> &[EndorsementRecord] {
        &self.endorsements
    }

    /// Authority of each owning directory.
    #[must_use]
    pub fn authority(&self) -> &AuthorityTable {
        &self.authority
    }
}

fn classify(
    directory: &str,
    authority: &AuthorityTable,
    ledger: &ApprovalLedger,
) -> DirectoryStatus {
    let chain = authority
        .get(directory)
        .map(|a| &a.chain)
        .filter(|chain| !chain.is_empty());

    let Some(chain) = chain else {
        warn!(directory, "no approvers defined for owning directory");
        return DirectoryStatus::Unsatisfied {
            directory: directory.to_owned(),
            has_authority: false,
        };
    };

    let endorsers: BTreeSet<Identity> = chain
        .iter()
        .filter(|candidate| ledger.has_approved(candidate))
        .cloned()
        .collect();

    debug!(directory, endorsers = endorsers.len(), "classified directory");
    if endorsers.is_empty() {
        DirectoryStatus::Unsatisfied {
            directory: directory.to_owned(),
            has_authority: true,
        }
    } else {
        DirectoryStatus::Satisfied {
            directory: directory.to_owned(),
            endorsers,
        }
    }
}

/// Ledger records with identities rewritten to the declared casing of any
/// matching approver.
fn canonical_endorsements(
    authority: &AuthorityTable,
    ledger: &ApprovalLedger,
) -> Vec<EndorsementRecord> {
    let known: BTreeSet<&Identity> = authority.values().flat_map(|a| a.chain.iter()).collect();
    let canonical = |record: &EndorsementRecord| EndorsementRecord {
        identity: known
            .get(&record.identity)
            .map_or_else(|| record.identity.clone(), |&declared| declared.clone()),
        reference: record.reference.clone(),
        kind: record.kind,
    };

    let mut endorsements: Vec<EndorsementRecord> = ledger.approvals().map(canonical).collect();
    endorsements.extend(
        ledger
            .advisories()
            .filter(|r| !ledger.has_approved(&r.identity))
            .map(canonical),
    );
    endorsements
}
