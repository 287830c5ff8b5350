//! One complete evaluation of a change.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::info;

use crate::aggregate::{ApprovalAggregator, AuthorityTable, DirectoryStatus};
use crate::error::ApprovalResult;
use crate::identity::Identity;
use crate::ledger::ApprovalLedger;
use crate::metadata::ReportMetadata;
use crate::provider::ApproverSetProvider;
use crate::resolver::OwnersResolver;
use crate::suggest::{Suggestion, SuggestionEngine};

/// Inputs to an evaluation beyond the change itself.
#[derive(Debug, Clone, Default)]
pub struct EvaluationOptions {
    /// Seed for suggestion tie-breaking.
    pub seed: u64,
    /// Metadata recovered from the previously posted report, if any.
    pub previous: Option<ReportMetadata>,
}

impl EvaluationOptions {
    /// Options with the given seed and no previous report.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            previous: None,
        }
    }

    /// Attach metadata from the previous report.
    #[must_use]
    pub fn with_previous(mut self, previous: Option<ReportMetadata>) -> Self {
        self.previous = previous;
        self
    }
}

/// Plain-data view of an evaluation for host automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// Whether the change may merge.
    pub authorized: bool,
    /// Every owning directory in display order.
    pub directories: Vec<DirectoryStatus>,
    /// Directories still lacking an approval.
    pub unsatisfied: Vec<String>,
    /// Approvers counted per owning directory.
    pub approvers: BTreeMap<String, BTreeSet<Identity>>,
    /// Identities to notify.
    pub suggested: Vec<Identity>,
    /// Directories nobody is authorized to approve.
    pub unreachable: Vec<String>,
}

/// Aggregated approval state and suggestions for a change.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use ratify_approval::{ApprovalLedger, Evaluation, EvaluationOptions};
///
/// let mut owners = BTreeMap::new();
/// owners.insert(String::new(), vec!["Alice".to_string(), "Bob".to_string()]);
/// owners.insert("b".to_string(), vec!["Bill".to_string()]);
///
/// let mut ledger = ApprovalLedger::new();
/// ledger.record_approval("Alice", "REFERENCE").unwrap();
///
/// let eval = Evaluation::run(&owners, ["b/test.go"], &ledger, &EvaluationOptions::default())
///     .unwrap();
/// assert!(eval.is_authorized());
/// assert!(eval.suggestion().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Evaluation {
    aggregator: ApprovalAggregator,
    suggestion: Suggestion,
}

impl Evaluation {
    /// Resolve, aggregate and suggest for one change.
    ///
    /// # Errors
    ///
    /// Propagates path and provider errors.
    pub fn run<P, I, S>(
        provider: P,
        files: I,
        ledger: &ApprovalLedger,
        options: &EvaluationOptions,
    ) -> ApprovalResult<Self>
    where
        P: ApproverSetProvider,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolver = OwnersResolver::new(provider);
        let aggregator = ApprovalAggregator::build(&resolver, files, ledger)?;
        let unsatisfied = aggregator.unsatisfied_directories();

        let previous = options
            .previous
            .as_ref()
            .map(|meta| previous_assignments(aggregator.authority(), &unsatisfied, meta))
            .unwrap_or_default();

        let engine =
            SuggestionEngine::new(aggregator.authority(), ledger.assignees(), options.seed);
        let suggestion = engine.suggest(&unsatisfied, &previous);

        info!(
            directories = aggregator.statuses().len(),
            unsatisfied = unsatisfied.len(),
            suggested = suggestion.approvers.len(),
            authorized = aggregator.is_authorized(),
            "evaluated change"
        );

        Ok(Self {
            aggregator,
            suggestion,
        })
    }

    /// Per-directory approval state.
    #[must_use]
    pub fn aggregator(&self) -> &ApprovalAggregator {
        &self.aggregator
    }

    /// Who to notify.
    #[must_use]
    pub fn suggestion(&self) -> &Suggestion {
        &self.suggestion
    }

    /// Whether the change may merge.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.aggregator.is_authorized()
    }

    /// Metadata to embed in the report.
    ///
    /// Suggestions are only meaningful while the change is unauthorized.
    #[must_use]
    pub fn metadata(&self) -> ReportMetadata {
        let approvers = if self.is_authorized() {
            Vec::new()
        } else {
            self.suggestion
                .approvers
                .iter()
                .map(|identity| identity.as_str().to_owned())
                .collect()
        };
        ReportMetadata::new(approvers)
    }

    /// Plain-data status for host automation.
    #[must_use]
    pub fn summary(&self) -> StatusSummary {
        StatusSummary {
            authorized: self.is_authorized(),
            directories: self.aggregator.statuses().to_vec(),
            unsatisfied: self.aggregator.unsatisfied_directories(),
            approvers: self.aggregator.per_directory_approvers(),
            suggested: self.suggestion.approvers.clone(),
            unreachable: self.suggestion.unreachable.clone(),
        }
    }
}

/// Map each unsatisfied directory to the first previously suggested identity
/// that may still approve it.
#[must_use]
pub fn previous_assignments(
    authority: &AuthorityTable,
    unsatisfied: &[String],
    previous: &ReportMetadata,
) -> BTreeMap<String, Identity> {
    let candidates: Vec<Identity> = previous
        .approvers
        .iter()
        .filter_map(|raw| Identity::parse(raw).ok())
        .collect();

    unsatisfied
        .iter()
        .filter_map(|directory| {
            let chain = &authority.get(directory)?.chain;
            let identity = candidates.iter().find_map(|c| chain.get(c).cloned())?;
            Some((directory.clone(), identity))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners() -> BTreeMap<String, Vec<String>> {
        let mut owners = BTreeMap::new();
        owners.insert(String::new(), vec!["Alice".to_owned(), "Bob".to_owned()]);
        owners.insert(
            "b".to_owned(),
            vec!["Bill".to_owned(), "Ben".to_owned(), "Barbara".to_owned()],
        );
        owners
    }

    #[test]
    fn test_previous_suggestion_survives_reseeding() {
        let ledger = ApprovalLedger::new();
        let first = Evaluation::run(
            &owners(),
            ["b/test.go"],
            &ledger,
            &EvaluationOptions::with_seed(1),
        )
        .unwrap();
        let meta = first.metadata();
        assert_eq!(meta.approvers.len(), 1);

        for seed in 2..10 {
            let again = Evaluation::run(
                &owners(),
                ["b/test.go"],
                &ledger,
                &EvaluationOptions::with_seed(seed).with_previous(Some(meta.clone())),
            )
            .unwrap();
            assert_eq!(again.metadata(), meta);
        }
    }

    #[test]
    fn test_metadata_empty_once_authorized() {
        let mut ledger = ApprovalLedger::new();
        ledger.record_approval("Ben", "REFERENCE").unwrap();
        let eval =
            Evaluation::run(&owners(), ["b/x"], &ledger, &EvaluationOptions::default()).unwrap();
        assert!(eval.is_authorized());
        assert!(eval.metadata().approvers.is_empty());
    }

    #[test]
    fn test_previous_assignments_skip_ineligible() {
        let ledger = ApprovalLedger::new();
        let eval =
            Evaluation::run(&owners(), ["b/x"], &ledger, &EvaluationOptions::default()).unwrap();
        let previous = ReportMetadata::new(vec!["Zed".to_owned(), "barbara".to_owned()]);
        let map = previous_assignments(
            eval.aggregator().authority(),
            &eval.aggregator().unsatisfied_directories(),
            &previous,
        );
        assert_eq!(map.get("b").map(Identity::as_str), Some("Barbara"));
    }

    #[test]
    fn test_summary_serializes() {
        let ledger = ApprovalLedger::new();
        let eval =
            Evaluation::run(&owners(), ["main.go"], &ledger, &EvaluationOptions::with_seed(4))
                .unwrap();
        let json = serde_json::to_value(eval.summary()).unwrap();
        assert_eq!(json["authorized"], false);
        assert_eq!(json["unsatisfied"], serde_json::json!([""]));
        assert_eq!(json["directories"][0]["status"], "unsatisfied");
        assert_eq!(json["directories"][0]["has_authority"], true);
        assert_eq!(json["suggested"].as_array().unwrap().len(), 1);
    }
}
