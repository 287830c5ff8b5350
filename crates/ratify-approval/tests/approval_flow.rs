//! End-to-end approval scenarios over a small OWNERS tree.

use std::collections::{BTreeMap, BTreeSet};

use ratify_approval::prelude::*;
use ratify_approval::{ApprovalAggregator, OwnersResolver};

const ROOT: &[&str] = &["Alice", "Bob"];
const A: &[&str] = &["Art", "Anne"];
const B: &[&str] = &["Bill", "Ben", "Barbara"];
const C: &[&str] = &["Chris", "Carol"];
const D: &[&str] = &["David", "Dan", "Debbie"];
const E: &[&str] = &["Eve", "Erin"];

fn to_vec(names: &[&[&str]]) -> Vec<String> {
    names
        .iter()
        .flat_map(|group| group.iter())
        .map(|n| (*n).to_owned())
        .collect()
}

/// The shared fixture: root, `a`, `b`, `c`, `a/d` and `a/combo`, where the
/// combo directory is owned by E, D and C together.
fn repo() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        (String::new(), to_vec(&[ROOT])),
        ("a".to_owned(), to_vec(&[A])),
        ("b".to_owned(), to_vec(&[B])),
        ("c".to_owned(), to_vec(&[C])),
        ("a/d".to_owned(), to_vec(&[D])),
        ("a/combo".to_owned(), to_vec(&[E, D, C])),
    ])
}

fn ledger_with(approvers: &[&str]) -> ApprovalLedger {
    let mut ledger = ApprovalLedger::new();
    for approver in approvers {
        ledger.record_approval(approver, "REFERENCE").unwrap();
    }
    ledger
}

fn aggregate(files: &[&str], approvers: &[&str]) -> ApprovalAggregator {
    let resolver = OwnersResolver::new(repo());
    ApprovalAggregator::build(&resolver, files, &ledger_with(approvers)).unwrap()
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

fn endorsers(status: &DirectoryStatus) -> BTreeSet<String> {
    status
        .endorsers()
        .map(|set| set.iter().map(|i| i.as_str().to_owned()).collect())
        .unwrap_or_default()
}

fn assert_unsatisfied(files: &[&str], approvers: &[&str], expected: &[&str]) {
    let agg = aggregate(files, approvers);
    assert_eq!(
        agg.unsatisfied_directories(),
        expected.iter().map(|d| (*d).to_owned()).collect::<Vec<_>>(),
        "files {files:?} approved by {approvers:?}"
    );
}

#[test]
fn test_unsatisfied_directories() {
    assert_unsatisfied(&[], &[], &[]);
    assert_unsatisfied(&["kubernetes.go"], &["Alice"], &[]);
    assert_unsatisfied(&["kubernetes.go"], &[], &[""]);
    assert_unsatisfied(&["b/test.go", "b/test_1.go"], ROOT, &[]);
    assert_unsatisfied(&["b/test_1.go", "b/test.go"], &[], &["b"]);
    assert_unsatisfied(&["a/combo/test.go", "a/d/test.go"], &[], &[
        "a/combo", "a/d",
    ]);
    assert_unsatisfied(
        &["a/combo/test.go", "a/d/test.go"],
        &["Eve", "Erin", "Chris", "Carol"],
        &["a/d"],
    );
    assert_unsatisfied(&["a/combo/test.go", "a/d/test.go"], D, &[]);
}

#[test]
fn test_directory_statuses_in_first_occurrence_order() {
    let agg = aggregate(&["a/combo/test.go", "a/d/test.go", "c/test"], C);
    let statuses = agg.statuses();
    assert_eq!(statuses.len(), 3);

    assert_eq!(statuses[0].directory(), "a/combo");
    assert_eq!(endorsers(&statuses[0]), set(C));
    assert_eq!(statuses[1].directory(), "a/d");
    assert!(!statuses[1].is_satisfied());
    assert_eq!(statuses[2].directory(), "c");
    assert_eq!(endorsers(&statuses[2]), set(C));
}

#[test]
fn test_nested_owning_directories_reported_separately() {
    let approvers: Vec<&str> = ROOT.iter().chain(A).chain(B).copied().collect();
    let agg = aggregate(&["a/test.go", "a/d/test.go", "b/test"], &approvers);

    let dirs: Vec<&str> = agg.statuses().iter().map(DirectoryStatus::directory).collect();
    assert_eq!(dirs, vec!["a", "a/d", "b"]);
    assert_eq!(endorsers(&agg.statuses()[0]), set(&["Alice", "Bob", "Art", "Anne"]));
    assert_eq!(endorsers(&agg.statuses()[1]), set(&["Alice", "Bob", "Art", "Anne"]));
    assert_eq!(
        endorsers(&agg.statuses()[2]),
        set(&["Alice", "Bob", "Bill", "Ben", "Barbara"])
    );
    assert!(agg.is_authorized());
}

fn assert_authorized(files: &[&str], approvers: &[&str], expected: bool) {
    for seed in [0, 3] {
        let eval = Evaluation::run(
            repo(),
            files,
            &ledger_with(approvers),
            &EvaluationOptions::with_seed(seed),
        )
        .unwrap();
        assert_eq!(eval.is_authorized(), expected, "files {files:?}");
        assert_eq!(eval.suggestion().is_empty(), expected, "files {files:?}");
    }
}

#[test]
fn test_is_authorized() {
    let abc = ["a/test.go", "b/test.go", "c/test"];
    let combo = ["a/combo/test.go", "a/d/test.go"];

    assert_authorized(&[], &[], true);
    assert_authorized(&["kubernetes.go"], &["Alice"], true);
    assert_authorized(&["kubernetes.go"], &[], false);
    assert_authorized(&combo, &[], false);
    assert_authorized(&combo, D, true);
    assert_authorized(&abc, &[], false);
    assert_authorized(&abc, &["Art", "Anne", "Bill", "Ben", "Barbara"], false);
    assert_authorized(&abc, ROOT, true);
    assert_authorized(&abc, &["Anne", "Ben", "Carol"], true);
}

#[test]
fn test_per_directory_approvers() {
    let owners = BTreeMap::from([(String::new(), vec!["RootOwner".to_owned()])]);
    let agg = ApprovalAggregator::build(
        &OwnersResolver::new(owners),
        ["a/a", "c"],
        &ApprovalLedger::new(),
    )
    .unwrap();
    let per_dir = agg.per_directory_approvers();
    assert_eq!(per_dir.len(), 1);
    assert!(per_dir[""].is_empty());

    let owners = BTreeMap::from([
        (String::new(), vec!["RootApprover".to_owned()]),
        ("a".to_owned(), vec!["AApprover".to_owned()]),
        ("c".to_owned(), vec!["CApprover".to_owned()]),
    ]);
    let agg = ApprovalAggregator::build(
        &OwnersResolver::new(owners),
        ["a/a", "c/c"],
        &ledger_with(&["RootApprover", "CApprover"]),
    )
    .unwrap();
    let per_dir = agg.per_directory_approvers();
    let names = |dir: &str| -> BTreeSet<String> {
        per_dir[dir].iter().map(|i| i.as_str().to_owned()).collect()
    };
    assert_eq!(names("a"), set(&["RootApprover"]));
    assert_eq!(names("c"), set(&["RootApprover", "CApprover"]));
}

#[test]
fn test_case_insensitive_approval_uses_declared_casing() {
    let owners = BTreeMap::from([(String::new(), vec!["rOOtaPProver".to_owned()])]);
    let agg = ApprovalAggregator::build(
        &OwnersResolver::new(owners),
        ["file"],
        &ledger_with(&["RootApprover"]),
    )
    .unwrap();
    assert!(agg.is_authorized());
    assert_eq!(endorsers(&agg.statuses()[0]), set(&["rOOtaPProver"]));
}

#[test]
fn test_cancelled_approval_no_longer_counts() {
    let mut ledger = ledger_with(&["Bill"]);
    let files = ["b/test.go"];
    let before =
        Evaluation::run(repo(), files, &ledger, &EvaluationOptions::default()).unwrap();
    assert!(before.is_authorized());

    assert!(ledger.cancel_approval("bill").unwrap());
    let after = Evaluation::run(repo(), files, &ledger, &EvaluationOptions::default()).unwrap();
    assert!(!after.is_authorized());
    assert_eq!(after.aggregator().unsatisfied_directories(), vec!["b"]);
}

#[test]
fn test_advisory_never_authorizes() {
    let mut ledger = ApprovalLedger::new();
    ledger.record_advisory("Bill", "REFERENCE").unwrap();
    let eval =
        Evaluation::run(repo(), ["b/test.go"], &ledger, &EvaluationOptions::default()).unwrap();
    assert!(!eval.is_authorized());
    assert_eq!(eval.aggregator().endorsements().len(), 1);
    assert_eq!(
        eval.aggregator().endorsements()[0].kind,
        EndorsementKind::Advisory
    );
}

#[test]
fn test_directory_without_approvers_blocks_authorization() {
    let owners = BTreeMap::from([("a".to_owned(), vec!["Art".to_owned()])]);
    let eval = Evaluation::run(
        &owners,
        ["a/x.go", "README.md"],
        &ledger_with(&["Art"]),
        &EvaluationOptions::default(),
    )
    .unwrap();
    assert!(!eval.is_authorized());
    assert_eq!(eval.aggregator().unauthorized_directories(), vec![""]);
    assert_eq!(eval.suggestion().unreachable, vec![""]);
    assert!(eval.suggestion().is_empty());
}

#[test]
fn test_invalid_path_is_rejected() {
    let result = Evaluation::run(
        repo(),
        ["../escape.go"],
        &ApprovalLedger::new(),
        &EvaluationOptions::default(),
    );
    assert!(matches!(result, Err(ApprovalError::InvalidPath { .. })));
}
