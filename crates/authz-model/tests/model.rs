use authz_model::{
    AuditRecord, CriteriaRole, CriteriaSet, FailureLabel, Label, MatchSpan, Note, NoteOutcome,
    Reason, RuleError, RuleHit, RuleKind, RunType, SubPattern, TermRule,
};

#[test]
fn run_type_parses_case_insensitively() {
    assert_eq!("TEST".parse::<RunType>(), Ok(RunType::Test));
    assert_eq!(" production ".parse::<RunType>(), Ok(RunType::Production));
    assert_eq!("prod".parse::<RunType>(), Ok(RunType::Production));
    assert!("staging".parse::<RunType>().is_err());
    assert_eq!(RunType::default(), RunType::Production);
}

#[test]
fn empty_patterns_are_rejected() {
    assert_eq!(
        TermRule::term("   "),
        Err(RuleError::EmptyPattern {
            kind: RuleKind::Term
        })
    );
    assert_eq!(
        SubPattern::new("", RuleKind::CodePrefix),
        Err(RuleError::EmptyPattern {
            kind: RuleKind::CodePrefix
        })
    );
}

#[test]
fn compound_parts_cannot_nest() {
    assert_eq!(
        SubPattern::new("x", RuleKind::Compound),
        Err(RuleError::NestedCompound)
    );
}

#[test]
fn compound_requires_two_parts() {
    let one = vec![SubPattern::new("denied", RuleKind::Term).unwrap()];
    assert_eq!(
        TermRule::compound_from_parts(one, None),
        Err(RuleError::CompoundPartCount { found: 1 })
    );

    let three = vec![
        SubPattern::new("a", RuleKind::Term).unwrap(),
        SubPattern::new("b", RuleKind::Term).unwrap(),
        SubPattern::new("c", RuleKind::Term).unwrap(),
    ];
    assert_eq!(
        TermRule::compound_from_parts(three, None),
        Err(RuleError::CompoundPartCount { found: 3 })
    );
}

#[test]
fn patterns_are_trimmed() {
    let rule = TermRule::multiword("  Decision upheld ").unwrap();
    assert_eq!(rule.pattern(), "Decision upheld");
    assert_eq!(rule.to_string(), "Decision upheld (multiword)");
}

#[test]
fn criteria_set_defaults_name_to_role() {
    let set = CriteriaSet::new("", CriteriaRole::Exclusion, vec![]);
    assert_eq!(set.name(), "exclusion");
    assert!(set.is_empty());
}

#[test]
fn blank_note_is_still_a_note() {
    let note = Note::new("  ", RunType::Test);
    assert!(note.is_blank());
    assert_eq!(note.run_type(), RunType::Test);
}

#[test]
fn kinds_accept_aliases() {
    let kind: RuleKind = serde_json::from_str("\"code_prefix\"").unwrap();
    assert_eq!(kind, RuleKind::CodePrefix);
    let kind: RuleKind = serde_json::from_str("\"codePrefix\"").unwrap();
    assert_eq!(kind, RuleKind::CodePrefix);
    let kind: RuleKind = serde_json::from_str("\"multi-word\"").unwrap();
    assert_eq!(kind, RuleKind::Multiword);
}

#[test]
fn failed_outcome_carries_error_label() {
    let outcome = NoteOutcome::Failed {
        index: 4,
        id: Some("N-4".to_string()),
        label: FailureLabel::Error,
        message: "boom".to_string(),
    };
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["label"], "ERROR");
    assert_eq!(json["index"], 4);
    assert_eq!(outcome.label_str(), "ERROR");
    assert!(outcome.result().is_none());
}

#[test]
fn audit_record_round_trips() {
    let record = AuditRecord {
        index: 0,
        note_id: None,
        run_type: RunType::Test,
        label: Label::Unk,
        reason: Reason::Conflict,
        ruleset: "claims-review".to_string(),
        fingerprint: "abc".to_string(),
        hits: vec![
            RuleHit {
                set: CriteriaRole::Inclusion,
                position: 0,
                pattern: "REQ-GBD".to_string(),
                kind: RuleKind::CodePrefix,
                spans: vec![MatchSpan::new(0, 7)],
            },
            RuleHit {
                set: CriteriaRole::Exclusion,
                position: 2,
                pattern: "Overturned".to_string(),
                kind: RuleKind::Term,
                spans: vec![MatchSpan::new(27, 36)],
            },
        ],
    };
    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"runType\":\"test\""));
    assert!(json.contains("\"kind\":\"codePrefix\""));
    let round: AuditRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(round, record);
    assert_eq!(round.inclusion_hits().count(), 1);
    assert_eq!(round.exclusion_hits().count(), 1);
}
