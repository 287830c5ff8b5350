//! Reviewer suggestion: who to notify so every unsatisfied directory can be
//! approved.
//!
//! # Selection Order
//!
//! Unsatisfied directories are visited in first-occurrence order. For each:
//!
//! 1. Someone already suggested for an earlier directory whose chain covers
//!    this one -> reuse (no new name)
//! 2. An assignee in the chain -> the lexically first one
//! 3. The identity suggested for this directory last time, if still in the
//!    chain -> keep it
//! 4. Otherwise a seeded pick from the directory's own approvers (or the full
//!    chain when the directory declares none), narrowed to the candidates that
//!    cover the most directories still waiting for a suggestion
//!
//! The seeded pick is a BLAKE3 digest of `(seed, directory, sorted pool)`, so
//! an unchanged change always produces the same suggestions.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::AuthorityTable;
use crate::identity::Identity;

/// Outcome of a suggestion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Identities to notify, duplicate-free, in directory order.
    pub approvers: Vec<Identity>,
    /// The identity expected to cover each unsatisfied directory.
    pub assignments: BTreeMap<String, Identity>,
    /// Unsatisfied directories nobody is authorized to approve.
    pub unreachable: Vec<String>,
}

impl Suggestion {
    /// Whether nobody needs to be notified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.approvers.is_empty()
    }

    /// The identity covering `directory`, if one was found.
    #[must_use]
    pub fn assigned_to(&self, directory: &str) -> Option<&Identity> {
        self.assignments.get(directory)
    }
}

/// Deterministic suggestion engine for one evaluation.
///
/// # Example
///
/// ```
/// use std::collections::{BTreeMap, BTreeSet};
/// use ratify_approval::{DirectoryAuthority, Identity, SuggestionEngine};
///
/// let art = Identity::parse("Art").unwrap();
/// let mut authority = BTreeMap::new();
/// authority.insert("a".to_string(), DirectoryAuthority {
///     own: BTreeSet::from([art.clone()]),
///     chain: BTreeSet::from([art.clone()]),
/// });
///
/// let assignees = BTreeSet::new();
/// let engine = SuggestionEngine::new(&authority, &assignees, 7);
/// let suggestion = engine.suggest(&["a".to_string()], &BTreeMap::new());
/// assert_eq!(suggestion.approvers, vec![art]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SuggestionEngine<'a> {
    authority: &'a AuthorityTable,
    assignees: &'a BTreeSet<Identity>,
    seed: u64,
}

impl<'a> SuggestionEngine<'a> {
    /// Create an engine over the authority of a change's owning directories.
    #[must_use]
    pub fn new(
        authority: &'a AuthorityTable,
        assignees: &'a BTreeSet<Identity>,
        seed: u64,
    ) -> Self {
        Self {
            authority,
            assignees,
            seed,
        }
    }

    /// Suggest identities for `unsatisfied` directories.
    ///
    /// `already_suggested` maps directories to identities suggested by a
    /// previous run; they are kept when still eligible so suggestions do not
    /// churn between runs.
    #[must_use]
    pub fn suggest(
        &self,
        unsatisfied: &[String],
        already_suggested: &BTreeMap<String, Identity>,
    ) -> Suggestion {
        let mut suggestion = Suggestion::default();

        for (position, directory) in unsatisfied.iter().enumerate() {
            let chain = match self.authority.get(directory) {
                Some(authority) if !authority.chain.is_empty() => &authority.chain,
                _ => {
                    warn!(directory = %directory, "no candidate approvers for directory");
                    suggestion.unreachable.push(directory.clone());
                    continue;
                },
            };

            let pending = unsatisfied.get(position..).unwrap_or_default();
            let Some(pick) = reuse(&suggestion.approvers, chain)
                .or_else(|| self.assignee(chain))
                .or_else(|| previous(already_suggested.get(directory), chain))
                .or_else(|| self.seeded(directory, pending, &suggestion.approvers))
            else {
                suggestion.unreachable.push(directory.clone());
                continue;
            };

            debug!(directory = %directory, approver = %pick, "suggested approver");
            if !suggestion.approvers.contains(&pick) {
                suggestion.approvers.push(pick.clone());
            }
            suggestion.assignments.insert(directory.clone(), pick);
        }

        suggestion
    }

    fn assignee(&self, chain: &BTreeSet<Identity>) -> Option<Identity> {
        self.assignees
            .iter()
            .find_map(|identity| chain.get(identity).cloned())
    }

    fn seeded(
        &self,
        directory: &str,
        pending: &[String],
        chosen: &[Identity],
    ) -> Option<Identity> {
        let authority = self.authority.get(directory)?;
        let base = if authority.own.is_empty() {
            &authority.chain
        } else {
            &authority.own
        };

        // Directories not already covered by someone we chose.
        let open: Vec<&BTreeSet<Identity>> = pending
            .iter()
            .filter_map(|d| self.authority.get(d))
            .map(|a| &a.chain)
            .filter(|chain| !chosen.iter().any(|c| chain.contains(c)))
            .collect();

        let coverage =
            |candidate: &Identity| open.iter().filter(|chain| chain.contains(candidate)).count();
        let best = base.iter().map(coverage).max().unwrap_or_default();
        let pool: BTreeSet<Identity> = base
            .iter()
            .filter(|candidate| coverage(*candidate) == best)
            .filter_map(|candidate| authority.chain.get(candidate).cloned())
            .collect();

        seeded_pick(self.seed, directory, &pool)
    }
}

fn reuse(chosen: &[Identity], chain: &BTreeSet<Identity>) -> Option<Identity> {
    chosen
        .iter()
        .find_map(|identity| chain.get(identity).cloned())
}

fn previous(candidate: Option<&Identity>, chain: &BTreeSet<Identity>) -> Option<Identity> {
    candidate.and_then(|identity| chain.get(identity).cloned())
}

/// Pick one member of `pool` as a pure function of `seed`, `directory` and
/// the pool's sorted contents.
///
/// Returns `None` for an empty pool.
#[must_use]
pub fn seeded_pick(seed: u64, directory: &str, pool: &BTreeSet<Identity>) -> Option<Identity> {
    let len = u64::try_from(pool.len()).ok()?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(directory.as_bytes());
    hasher.update(&[0]);
    for candidate in pool {
        hasher.update(candidate.key().as_bytes());
        hasher.update(&[0]);
    }
    let digest = hasher.finalize();

    let mut word = [0_u8; 8];
    word.copy_from_slice(digest.as_bytes().get(..8)?);
    let index = u64::from_le_bytes(word).checked_rem(len)?;

    pool.iter().nth(usize::try_from(index).ok()?).cloned()
}

#[cfg(test)]
#[path = "suggest_tests.rs"]
mod tests;
