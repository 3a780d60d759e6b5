//! Batch runs, audit aggregation and snapshot swaps.

use std::sync::Arc;
use std::thread;

use authz_core::{AuditTrail, BatchNote, ClassificationPipeline, RulesetHandle};
use authz_model::{CriteriaRole, Label, Note, Reason, RunType, TermRule};
use authz_rules::LoadedRuleset;

fn claims_pipeline(name: &str) -> ClassificationPipeline {
    let ruleset = LoadedRuleset::builder(name)
        .include(TermRule::code_prefix("REQ-GBD").unwrap())
        .include(TermRule::term("Approved").unwrap())
        .exclude(TermRule::term("Overturned").unwrap())
        .build()
        .unwrap();
    ClassificationPipeline::new(ruleset)
}

fn sample_batch() -> Vec<BatchNote> {
    vec![
        BatchNote::new(10, Note::new("REQ-GBD-1 approved", RunType::Production)).with_id("A"),
        BatchNote::new(11, Note::new("overturned on review", RunType::Production)).with_id("B"),
        BatchNote::new(12, Note::new("REQ-GBD-2 overturned", RunType::Test)),
        BatchNote::new(13, Note::new("", RunType::Test)),
        BatchNote::new(14, Note::new("nothing relevant", RunType::Production)),
    ]
}

#[test]
fn batch_keeps_order_ids_and_indices() {
    let outcomes = claims_pipeline("batch").classify_batch(&sample_batch());

    let indices: Vec<usize> = outcomes.iter().map(|outcome| outcome.index()).collect();
    assert_eq!(indices, vec![10, 11, 12, 13, 14]);
    assert_eq!(outcomes[0].id(), Some("A"));
    assert_eq!(outcomes[1].id(), Some("B"));
    assert_eq!(outcomes[2].id(), None);

    let labels: Vec<&str> = outcomes.iter().map(|outcome| outcome.label_str()).collect();
    assert_eq!(labels, vec!["TRUE", "FALSE", "UNK", "UNK", "TRUE"]);
    assert!(outcomes.iter().all(|outcome| !outcome.is_failed()));
}

#[test]
fn classify_notes_indexes_by_position() {
    let notes = vec![
        Note::new("approved", RunType::Test),
        Note::new("overturned", RunType::Test),
    ];
    let outcomes = claims_pipeline("plain").classify_notes(&notes);
    assert_eq!(outcomes[0].index(), 0);
    assert_eq!(outcomes[1].index(), 1);
    assert_eq!(outcomes[1].label_str(), "FALSE");
}

#[test]
fn batch_matches_single_note_classification() {
    let pipeline = claims_pipeline("same");
    let batch = sample_batch();
    for (item, outcome) in batch.iter().zip(pipeline.classify_batch(&batch)) {
        assert_eq!(outcome.result(), Some(&pipeline.classify(&item.note)));
    }
}

#[test]
fn audit_trail_counts_labels_reasons_and_rules() {
    let outcomes = claims_pipeline("trail").classify_batch(&sample_batch());
    let trail = AuditTrail::from_outcomes(&outcomes);

    assert_eq!(trail.total(), 5);
    assert_eq!(trail.failed(), 0);
    assert_eq!(trail.label_count(Label::True), 2);
    assert_eq!(trail.label_count(Label::False), 1);
    assert_eq!(trail.label_count(Label::Unk), 2);
    assert_eq!(trail.reason_count(Reason::Conflict), 1);
    assert_eq!(trail.reason_count(Reason::DefaultTest), 1);
    assert_eq!(trail.reason_count(Reason::DefaultProduction), 1);

    let reasons: Vec<Reason> = trail.reasons().map(|(reason, _)| reason).collect();
    assert_eq!(
        reasons,
        vec![
            Reason::Conflict,
            Reason::Exclusion,
            Reason::Inclusion,
            Reason::DefaultTest,
            Reason::DefaultProduction,
        ]
    );

    let top = trail.top_rules(2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].set, CriteriaRole::Inclusion);
    assert_eq!(top[0].pattern, "REQ-GBD");
    assert_eq!(top[1].set, CriteriaRole::Exclusion);
    assert_eq!(top[1].pattern, "Overturned");
    assert_eq!(top[1].notes, 2);

    let hits: Vec<(&str, usize)> = trail
        .rule_hits()
        .map(|hit| (hit.pattern.as_str(), hit.notes))
        .collect();
    assert_eq!(
        hits,
        vec![("REQ-GBD", 2), ("Approved", 1), ("Overturned", 2)]
    );
}

#[test]
fn published_snapshot_does_not_disturb_held_one() {
    let handle = RulesetHandle::new(claims_pipeline("v1"));
    let held = handle.current();

    let replacement = LoadedRuleset::builder("v2")
        .exclude(TermRule::term("Approved").unwrap())
        .build()
        .unwrap();
    let previous = handle.publish(ClassificationPipeline::new(replacement));

    assert!(Arc::ptr_eq(&held, &previous));
    assert_eq!(held.ruleset().name, "v1");
    assert_eq!(handle.current().ruleset().name, "v2");

    let note = Note::new("approved", RunType::Production);
    assert_eq!(held.classify(&note).label(), Label::True);
    assert_eq!(handle.current().classify(&note).label(), Label::False);
}

#[test]
fn readers_always_see_a_complete_snapshot() {
    let handle = RulesetHandle::new(claims_pipeline("v1"));
    let fingerprints = [
        handle.current().fingerprint().to_string(),
        claims_pipeline("v2").fingerprint().to_string(),
    ];

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = handle.clone();
            let fingerprints = fingerprints.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = handle.current();
                    assert!(fingerprints.contains(&snapshot.fingerprint().to_string()));
                    let result = snapshot.classify(&Note::new("REQ-GBD-9", RunType::Test));
                    assert_eq!(result.label(), Label::True);
                }
            })
        })
        .collect();

    for _ in 0..20 {
        handle.publish(claims_pipeline("v2"));
        handle.publish(claims_pipeline("v1"));
    }
    for reader in readers {
        reader.join().unwrap();
    }
}
