//! Ownership resolution: owning directories and authorized chains.
//!
//! A changed file is owned by the closest directory, walking from the file's
//! parent up to the repository root, that declares at least one approver.
//! Authority is inherited downward: anyone declared at a directory or at any
//! of its ancestors may approve it.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{ApprovalError, ApprovalResult};
use crate::identity::Identity;
use crate::provider::ApproverSetProvider;

/// Resolves changed paths against an [`ApproverSetProvider`].
///
/// Every method is a pure function of the provider's answers.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use ratify_approval::OwnersResolver;
///
/// let mut owners = BTreeMap::new();
/// owners.insert(String::new(), vec!["Alice".to_string()]);
/// owners.insert("b".to_string(), vec!["Bill".to_string()]);
///
/// let resolver = OwnersResolver::new(owners);
/// let dirs = resolver.resolve(["b/x/test.go", "main.go", "b/y.go"]).unwrap();
/// assert_eq!(dirs, vec!["b".to_string(), String::new()]);
///
/// let chain = resolver.authorized_chain("b").unwrap();
/// assert_eq!(chain.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct OwnersResolver<P> {
    provider: P,
}

impl<P: ApproverSetProvider> OwnersResolver<P> {
    /// Create a resolver over `provider`.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Approvers declared exactly at `directory`.
    ///
    /// Malformed declared identities are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Provider`] if the provider lookup fails.
    pub fn leaf_approvers(&self, directory: &str) -> ApprovalResult<BTreeSet<Identity>> {
        let declared =
            self.provider
                .approvers(directory)
                .map_err(|source| ApprovalError::Provider {
                    directory: directory.to_owned(),
                    source,
                })?;

        let mut approvers = BTreeSet::new();
        for raw in declared {
            match Identity::parse(&raw) {
                Ok(identity) => {
                    approvers.insert(identity);
                },
                Err(_) => {
                    warn!(directory, identity = %raw, "ignoring malformed approver declaration");
                },
            }
        }
        Ok(approvers)
    }

    /// The owning directory of a single changed file.
    ///
    /// Falls back to the repository root (`""`) when no directory on the way
    /// up declares approvers, even if the root itself declares none.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidPath`] for a malformed path or
    /// [`ApprovalError::Provider`] if a lookup fails.
    pub fn owning_directory(&self, path: &str) -> ApprovalResult<String> {
        validate_path(path)?;
        for directory in ancestors(parent_dir(path)) {
            if !self.leaf_approvers(directory)?.is_empty() {
                return Ok(directory.to_owned());
            }
        }
        Ok(String::new())
    }

    /// Distinct owning directories of `paths`, in first-occurrence order.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed path or provider failure.
    pub fn resolve<I, S>(&self, paths: I) -> ApprovalResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut directories = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let directory = self.owning_directory(path)?;
            debug!(path, directory = %directory, "resolved owning directory");
            if seen.insert(directory.clone()) {
                directories.push(directory);
            }
        }
        Ok(directories)
    }

    /// Union of the approvers declared at `directory` and every ancestor.
    ///
    /// When an identity is declared with different casing at several levels,
    /// the casing closest to `directory` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Provider`] if a lookup fails.
    pub fn authorized_chain(&self, directory: &str) -> ApprovalResult<BTreeSet<Identity>> {
        let mut chain = BTreeSet::new();
        for ancestor in ancestors(directory) {
            chain.extend(self.leaf_approvers(ancestor)?);
        }
        Ok(chain)
    }
}

/// Directory containing `path` (`""` for top-level entries).
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// `directory` followed by each of its ancestors, ending with the root `""`.
///
/// ```
/// use ratify_approval::resolver::ancestors;
///
/// let chain: Vec<_> = ancestors("a/b").collect();
/// assert_eq!(chain, vec!["a/b", "a", ""]);
/// ```
pub fn ancestors(directory: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(directory);
    std::iter::from_fn(move || {
        let current = next?;
        next = if current.is_empty() {
            None
        } else {
            Some(parent_dir(current))
        };
        Some(current)
    })
}

fn validate_path(path: &str) -> ApprovalResult<()> {
    let reason = if path.is_empty() {
        Some("path is empty")
    } else if path.starts_with('/') {
        Some("path must be relative to the repository root")
    } else if path.ends_with('/') {
        Some("path names a directory, not a file")
    } else if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        Some("path contains an empty, '.' or '..' segment")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ApprovalError::InvalidPath {
            path: path.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}
