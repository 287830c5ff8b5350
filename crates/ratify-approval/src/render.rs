//! Status report rendering.
//!
//! The report is Markdown with a little inline HTML. Rendering is a pure
//! function of the evaluation and display context, so re-rendering an
//! unchanged change yields byte-identical text and the host can skip the
//! update.

use serde::{Deserialize, Serialize};

use crate::aggregate::DirectoryStatus;
use crate::error::ApprovalResult;
use crate::evaluation::Evaluation;
use crate::ledger::EndorsementRecord;

/// Default code host URL.
pub const DEFAULT_ROOT_URL: &str = "https://github.com";

/// Default branch OWNERS links point at.
pub const DEFAULT_BRANCH: &str = "master";

/// Where the repository lives, for OWNERS links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayContext {
    /// Code host base URL without a trailing slash.
    pub root_url: String,
    /// Organization or owner name.
    pub org: String,
    /// Repository name.
    pub project: String,
    /// Branch the OWNERS files are linked on.
    pub branch: String,
}

impl DisplayContext {
    /// Context for `org/project` on the default host and branch.
    #[must_use]
    pub fn new(org: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_owned(),
            org: org.into(),
            project: project.into(),
            branch: DEFAULT_BRANCH.to_owned(),
        }
    }

    /// Use a different code host.
    #[must_use]
    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Link OWNERS files on a different branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Link to the OWNERS file of `directory`.
    #[must_use]
    pub fn owners_link(&self, directory: &str) -> String {
        format!(
            "{}/{}/{}/blob/{}/{}",
            self.root_url,
            self.org,
            self.project,
            self.branch,
            owners_path(directory)
        )
    }
}

/// Render the status report, or `None` when the change touches nothing.
///
/// # Errors
///
/// Returns [`ApprovalError::Metadata`](crate::ApprovalError::Metadata) if the
/// trailing metadata cannot be encoded.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use ratify_approval::{ApprovalLedger, DisplayContext, Evaluation, EvaluationOptions, render};
///
/// let mut owners = BTreeMap::new();
/// owners.insert("a".to_string(), vec!["Alice".to_string()]);
/// let ledger = ApprovalLedger::new();
/// let eval = Evaluation::run(&owners, ["a/a.go"], &ledger, &EvaluationOptions::default()).unwrap();
///
/// let display = DisplayContext::new("org", "project");
/// let report = render(&eval, &display).unwrap().unwrap();
/// assert!(report.starts_with("[APPROVALNOTIFIER] This PR is **NOT APPROVED**"));
/// assert!(report.ends_with(r#"<!-- META={"approvers":["Alice"]} -->"#));
/// ```
pub fn render(evaluation: &Evaluation, display: &DisplayContext) -> ApprovalResult<Option<String>> {
    let aggregator = evaluation.aggregator();
    if aggregator.statuses().is_empty() {
        return Ok(None);
    }

    let authorized = evaluation.is_authorized();
    let verdict = if authorized { "APPROVED" } else { "NOT APPROVED" };
    let endorsements: Vec<String> = aggregator.endorsements().iter().map(endorsement).collect();

    let mut lines = vec![
        format!("[APPROVALNOTIFIER] This PR is **{verdict}**"),
        String::new(),
        format!(
            "This pull-request has been approved by: {}",
            endorsements.join(", ")
        ),
    ];

    let suggested = &evaluation.suggestion().approvers;
    if !authorized && !suggested.is_empty() {
        let plural = if suggested.len() > 1 { "s" } else { "" };
        let bold: Vec<String> = suggested
            .iter()
            .map(|i| format!("**{}**", escape_html(i.as_str())))
            .collect();
        let mentions: Vec<String> = suggested.iter().map(|i| format!("@{i}")).collect();
        lines.push(format!(
            "We suggest the following additional approver{plural}: {}",
            bold.join(", ")
        ));
        lines.push(String::new());
        lines.push(format!(
            "Assign the PR to them by writing `/assign {}` in a comment when ready.",
            mentions.join(" ")
        ));
    }

    lines.push(String::new());
    lines.push(format!("<details {}>", if authorized { "" } else { "open" }));
    lines.push("Needs approval from an approver in each of these OWNERS Files:".to_owned());
    lines.push(String::new());
    lines.extend(
        aggregator
            .statuses()
            .iter()
            .map(|status| directory_line(status, display)),
    );
    lines.push(String::new());
    lines.push("You can indicate your approval by writing `/approve` in a comment".to_owned());
    lines.push("You can cancel your approval by writing `/approve cancel` in a comment".to_owned());
    lines.push("</details>".to_owned());
    lines.push(evaluation.metadata().to_comment()?);

    Ok(Some(lines.join("\n")))
}

fn endorsement(record: &EndorsementRecord) -> String {
    format!(
        "*<a href=\"{}\" title=\"{}\">{}</a>*",
        escape_html(&record.reference),
        record.kind.title(),
        escape_html(record.identity.as_str())
    )
}

fn directory_line(status: &DirectoryStatus, display: &DisplayContext) -> String {
    let name = owners_path(status.directory());
    let link = display.owners_link(status.directory());
    match status {
        DirectoryStatus::Satisfied { endorsers, .. } => {
            let names: Vec<String> = endorsers
                .iter()
                .map(|identity| escape_html(identity.as_str()))
                .collect();
            format!("- ~~[{name}]({link})~~ [{}]", names.join(","))
        },
        DirectoryStatus::Unsatisfied {
            has_authority: true,
            ..
        } => format!("- **[{name}]({link})**"),
        DirectoryStatus::Unsatisfied {
            has_authority: false,
            ..
        } => format!("- **[{name}]({link})** (no approvers defined)"),
    }
}

/// Repository path of the OWNERS file governing `directory`.
fn owners_path(directory: &str) -> String {
    if directory.is_empty() {
        "OWNERS".to_owned()
    } else {
        format!("{directory}/OWNERS")
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
