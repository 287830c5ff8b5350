//! Prelude module - commonly used types for convenient import.
//!
//! Use `use ratify_approval::prelude::*;` to import all essential types.

// Errors
pub use crate::{ApprovalError, ApprovalResult};

// Inputs
pub use crate::{ApprovalLedger, ApproverSetProvider, EndorsementKind, Identity};

// Evaluation
pub use crate::{DirectoryStatus, Evaluation, EvaluationOptions, StatusSummary, Suggestion};

// Reporting
pub use crate::{DisplayContext, ReportMetadata, needs_update, render};
