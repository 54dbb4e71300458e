//! Merge semantics the runner depends on: counts sum, merge is associative,
//! and outcomes of each group stay contiguous in the aggregate history.

use probe_report::{Ledger, Outcome};

fn sample(labels: &[(&str, Outcome)]) -> Ledger {
    let mut ledger = Ledger::new();
    for (label, outcome) in labels {
        match outcome {
            Outcome::Passed => ledger.record_pass(*label),
            Outcome::Failed => ledger.record_fail(*label, "reason"),
            Outcome::Skipped => ledger.record_skip(*label, "reason"),
        }
    }
    ledger
}

#[test]
fn merge_sums_every_count() {
    let a = sample(&[
        ("a1", Outcome::Passed),
        ("a2", Outcome::Failed),
        ("a3", Outcome::Skipped),
    ]);
    let b = sample(&[("b1", Outcome::Passed), ("b2", Outcome::Passed)]);

    let mut merged = Ledger::new();
    merged.merge(a.clone());
    merged.merge(b.clone());

    assert_eq!(merged.passed(), a.passed() + b.passed());
    assert_eq!(merged.failed(), a.failed() + b.failed());
    assert_eq!(merged.skipped(), a.skipped() + b.skipped());
}

#[test]
fn merge_is_associative() {
    let a = sample(&[("a", Outcome::Passed)]);
    let b = sample(&[("b", Outcome::Failed)]);
    let c = sample(&[("c", Outcome::Skipped)]);

    // (a ⋅ b) ⋅ c
    let mut left = Ledger::new();
    left.merge(a.clone());
    left.merge(b.clone());
    left.merge(c.clone());

    // a ⋅ (b ⋅ c)
    let mut bc = Ledger::new();
    bc.merge(b);
    bc.merge(c);
    let mut right = Ledger::new();
    right.merge(a);
    right.merge(bc);

    assert_eq!(left.records(), right.records());
    assert_eq!(left.summary(), right.summary());
}

#[test]
fn merge_keeps_group_histories_contiguous() {
    let a = sample(&[("a1", Outcome::Passed), ("a2", Outcome::Failed)]);
    let b = sample(&[("b1", Outcome::Skipped), ("b2", Outcome::Passed)]);

    let mut merged = Ledger::new();
    merged.merge(a);
    merged.merge(b);

    let labels: Vec<&str> = merged.records().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["a1", "a2", "b1", "b2"]);
}

#[test]
fn merging_empty_ledgers_is_identity() {
    let a = sample(&[("a", Outcome::Passed)]);

    let mut merged = Ledger::new();
    merged.merge(Ledger::new());
    merged.merge(a.clone());
    merged.merge(Ledger::new());

    assert_eq!(merged.records(), a.records());
    assert_eq!(merged.summary(), a.summary());
}

#[test]
fn overall_success_tracks_failed_count_only() {
    let clean = sample(&[("a", Outcome::Passed), ("b", Outcome::Skipped)]);
    assert!(clean.summary().overall_success);

    let mut dirty = clean.clone();
    dirty.record_fail("c", "contract violation");
    assert!(!dirty.summary().overall_success);
    assert_eq!(dirty.summary().failed, 1);
}
