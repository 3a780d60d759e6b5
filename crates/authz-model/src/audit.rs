//! Audit records.
//!
//! An audit record shows a reviewer which rules fired for a note and where.
//! It never contains the note text itself: spans point into the folded
//! note so the evidence can be located without copying it into reports.

use serde::{Deserialize, Serialize};

use crate::criteria::CriteriaRole;
use crate::note::RunType;
use crate::result::{Label, Reason};
use crate::rule::RuleKind;

/// Byte range in the folded note text (lowercase, collapsed whitespace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One matched rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleHit {
    pub set: CriteriaRole,
    /// Position of the rule in its criteria set.
    pub position: usize,
    pub pattern: String,
    pub kind: RuleKind,
    /// First occurrence of each needle that satisfied the rule.
    pub spans: Vec<MatchSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Caller-supplied position in the batch.
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
    pub run_type: RunType,
    pub label: Label,
    pub reason: Reason,
    pub ruleset: String,
    /// SHA-256 of the rule configuration the decision was made with.
    pub fingerprint: String,
    pub hits: Vec<RuleHit>,
}

impl AuditRecord {
    pub fn inclusion_hits(&self) -> impl Iterator<Item = &RuleHit> {
        self.hits
            .iter()
            .filter(|hit| hit.set == CriteriaRole::Inclusion)
    }

    pub fn exclusion_hits(&self) -> impl Iterator<Item = &RuleHit> {
        self.hits
            .iter()
            .filter(|hit| hit.set == CriteriaRole::Exclusion)
    }
}
