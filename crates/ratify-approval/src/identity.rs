//! Case-insensitive person identities.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{ApprovalError, ApprovalResult};

/// A person identity (e.g. a code-host login).
///
/// Equality, ordering and hashing ignore case; [`Identity::as_str`] keeps the
/// casing the identity was created with so it can be displayed as declared.
///
/// # Example
///
/// ```
/// use ratify_approval::Identity;
///
/// let declared = Identity::parse("RootApprover").unwrap();
/// let typed = Identity::parse("rootapprover").unwrap();
/// assert_eq!(declared, typed);
/// assert_eq!(declared.as_str(), "RootApprover");
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity {
    display: String,
    key: String,
}

impl Identity {
    /// Parse an identity, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidIdentity`] if the trimmed input is empty
    /// or still contains whitespace.
    pub fn parse(raw: &str) -> ApprovalResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(ApprovalError::InvalidIdentity {
                identity: raw.to_owned(),
            });
        }
        Ok(Self {
            display: trimmed.to_owned(),
            key: trimmed.to_lowercase(),
        })
    }

    /// The identity with its original casing.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// The lowercased comparison key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Identity {}

impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.display)
    }
}

impl TryFrom<String> for Identity {
    type Error = ApprovalError;

    fn try_from(value: String) -> ApprovalResult<Self> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.display
    }
}
