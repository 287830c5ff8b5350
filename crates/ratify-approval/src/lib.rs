//! Ratify Approval - OWNERS-based merge authorization.
//!
//! This crate provides:
//! - Resolution of changed files to the directories whose OWNERS govern them
//! - A ledger of approvals, advisory endorsements and assignees
//! - Per-directory aggregation into an authorized / unauthorized verdict
//! - Deterministic reviewer suggestions for unsatisfied directories
//! - A Markdown status report with embedded metadata for the next run
//!
//! Approver sets come from an [`ApproverSetProvider`]; any
//! `BTreeMap<String, Vec<String>>` keyed by directory (`""` for the
//! repository root) works out of the box.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use ratify_approval::prelude::*;
//!
//! let mut owners = BTreeMap::new();
//! owners.insert(String::new(), vec!["Alice".to_string()]);
//! owners.insert("b".to_string(), vec!["Bill".to_string()]);
//!
//! let mut ledger = ApprovalLedger::new();
//! ledger.record_approval("bill", "https://example.test/c/1").unwrap();
//!
//! let eval = Evaluation::run(&owners, ["b/lib.rs"], &ledger, &EvaluationOptions::with_seed(3))
//!     .unwrap();
//! assert!(eval.is_authorized());
//!
//! let report = render(&eval, &DisplayContext::new("org", "repo")).unwrap().unwrap();
//! assert!(report.contains("**APPROVED**"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod aggregate;
pub mod error;
pub mod evaluation;
pub mod identity;
pub mod ledger;
pub mod metadata;
pub mod provider;
pub mod render;
pub mod resolver;
pub mod suggest;

pub use aggregate::{ApprovalAggregator, AuthorityTable, DirectoryAuthority, DirectoryStatus};
pub use error::{ApprovalError, ApprovalResult, BoxError};
pub use evaluation::{Evaluation, EvaluationOptions, StatusSummary, previous_assignments};
pub use identity::Identity;
pub use ledger::{ApprovalLedger, EndorsementKind, EndorsementRecord};
pub use metadata::{METADATA_VERSION, ReportMetadata, needs_update};
pub use provider::ApproverSetProvider;
pub use render::{DisplayContext, render};
pub use resolver::OwnersResolver;
pub use suggest::{Suggestion, SuggestionEngine, seeded_pick};
