//! Batch-level audit aggregation.

use std::collections::BTreeMap;

use authz_model::{CriteriaRole, Label, NoteOutcome, Reason, RuleKind};

/// How often a single rule fired across a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHitCount {
    pub set: CriteriaRole,
    pub position: usize,
    pub pattern: String,
    pub kind: RuleKind,
    pub notes: usize,
}

/// Counts over a batch of outcomes, for reviewers and summaries.
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    total: usize,
    failed: usize,
    labels: BTreeMap<Label, usize>,
    reasons: BTreeMap<Reason, usize>,
    rules: BTreeMap<(CriteriaRole, usize), RuleHitCount>,
}

impl AuditTrail {
    pub fn from_outcomes(outcomes: &[NoteOutcome]) -> Self {
        let mut trail = Self::default();
        for outcome in outcomes {
            trail.record(outcome);
        }
        trail
    }

    pub fn record(&mut self, outcome: &NoteOutcome) {
        self.total += 1;
        let Some(audit) = outcome.audit() else {
            self.failed += 1;
            return;
        };
        *self.labels.entry(audit.label).or_default() += 1;
        *self.reasons.entry(audit.reason).or_default() += 1;
        for hit in &audit.hits {
            self.rules
                .entry((hit.set, hit.position))
                .or_insert_with(|| RuleHitCount {
                    set: hit.set,
                    position: hit.position,
                    pattern: hit.pattern.clone(),
                    kind: hit.kind,
                    notes: 0,
                })
                .notes += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn label_count(&self, label: Label) -> usize {
        self.labels.get(&label).copied().unwrap_or(0)
    }

    pub fn reason_count(&self, reason: Reason) -> usize {
        self.reasons.get(&reason).copied().unwrap_or(0)
    }

    /// Reasons that occurred, in precedence order.
    pub fn reasons(&self) -> impl Iterator<Item = (Reason, usize)> + '_ {
        self.reasons.iter().map(|(reason, count)| (*reason, *count))
    }

    /// Rules that fired at least once, inclusion first, in set order.
    pub fn rule_hits(&self) -> impl Iterator<Item = &RuleHitCount> {
        self.rules.values()
    }

    /// The `limit` most frequent rules; ties keep set order.
    pub fn top_rules(&self, limit: usize) -> Vec<&RuleHitCount> {
        let mut hits: Vec<&RuleHitCount> = self.rules.values().collect();
        hits.sort_by(|a, b| b.notes.cmp(&a.notes));
        hits.truncate(limit);
        hits
    }
}
