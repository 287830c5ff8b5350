//! The approver-set lookup seam.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::error::BoxError;

/// Source of the approvers declared at each directory of a repository.
///
/// `directory` is a repository-relative directory path without leading or
/// trailing slashes; the empty string is the repository root. A directory
/// without declared approvers yields an empty list, not an error.
///
/// Implementations are expected to be backed by data that was already
/// fetched; the core calls [`approvers`](Self::approvers) repeatedly and
/// expects the same answer each time.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use ratify_approval::ApproverSetProvider;
///
/// let mut owners = BTreeMap::new();
/// owners.insert(String::new(), vec!["Alice".to_string()]);
///
/// assert_eq!(owners.approvers("").unwrap(), vec!["Alice".to_string()]);
/// assert!(owners.approvers("docs").unwrap().is_empty());
/// ```
pub trait ApproverSetProvider {
    /// Identities authorized to approve changes exactly at `directory`.
    ///
    /// # Errors
    ///
    /// Returns the underlying failure if the lookup could not be performed.
    fn approvers(&self, directory: &str) -> Result<Vec<String>, BoxError>;
}

impl ApproverSetProvider for BTreeMap<String, Vec<String>> {
    fn approvers(&self, directory: &str) -> Result<Vec<String>, BoxError> {
        Ok(self.get(directory).cloned().unwrap_or_default())
    }
}

impl<S: BuildHasher> ApproverSetProvider for HashMap<String, Vec<String>, S> {
    fn approvers(&self, directory: &str) -> Result<Vec<String>, BoxError> {
        Ok(self.get(directory).cloned().unwrap_or_default())
    }
}

impl<P: ApproverSetProvider + ?Sized> ApproverSetProvider for &P {
    fn approvers(&self, directory: &str) -> Result<Vec<String>, BoxError> {
        (**self).approvers(directory)
    }
}

impl<P: ApproverSetProvider + ?Sized> ApproverSetProvider for Box<P> {
    fn approvers(&self, directory: &str) -> Result<Vec<String>, BoxError> {
        (**self).approvers(directory)
    }
}
