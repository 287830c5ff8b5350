//! Approval error types.

/// Boxed error returned by [`ApproverSetProvider`](crate::ApproverSetProvider)
/// implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while evaluating a change.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    /// The approver-set provider failed to answer for a directory.
    #[error("approver lookup failed for directory '{directory}': {source}")]
    Provider {
        /// Directory that was being looked up (`""` is the repository root).
        directory: String,
        /// Error reported by the provider.
        #[source]
        source: BoxError,
    },

    /// A changed path is not a repository-relative file path.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// An identity was empty or contained whitespace.
    #[error("invalid identity '{identity}'")]
    InvalidIdentity {
        /// The rejected input.
        identity: String,
    },

    /// The embedded report metadata could not be encoded or decoded.
    #[error("report metadata error: {0}")]
    Metadata(String),
}

/// Result type for approval operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;
