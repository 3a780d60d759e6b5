//! Classification results.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::audit::AuditRecord;
use crate::rule::TermRule;

/// Authorization state assigned to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "TRUE")]
    True,
    #[serde(rename = "FALSE")]
    False,
    #[serde(rename = "UNK")]
    Unk,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Unk => "UNK",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The precedence step that decided the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reason {
    /// Inclusion and exclusion rules both matched.
    Conflict,
    /// Only exclusion rules matched.
    Exclusion,
    /// Only inclusion rules matched.
    Inclusion,
    /// Nothing matched on a test run.
    DefaultTest,
    /// Nothing matched on a production run.
    DefaultProduction,
}

impl Reason {
    /// Label implied by this reason.
    pub fn label(self) -> Label {
        match self {
            Self::Conflict | Self::DefaultTest => Label::Unk,
            Self::Exclusion => Label::False,
            Self::Inclusion | Self::DefaultProduction => Label::True,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::Exclusion => "exclusion",
            Self::Inclusion => "inclusion",
            Self::DefaultTest => "defaultTest",
            Self::DefaultProduction => "defaultProduction",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision for one note.
///
/// Matched rules are listed in configuration order. Built once per note and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    label: Label,
    #[serde(serialize_with = "serialize_patterns")]
    matched_inclusion: Vec<TermRule>,
    #[serde(serialize_with = "serialize_patterns")]
    matched_exclusion: Vec<TermRule>,
    reason: Reason,
}

impl ClassificationResult {
    pub fn new(
        reason: Reason,
        matched_inclusion: Vec<TermRule>,
        matched_exclusion: Vec<TermRule>,
    ) -> Self {
        Self {
            label: reason.label(),
            matched_inclusion,
            matched_exclusion,
            reason,
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    pub fn matched_inclusion(&self) -> &[TermRule] {
        &self.matched_inclusion
    }

    pub fn matched_exclusion(&self) -> &[TermRule] {
        &self.matched_exclusion
    }

    pub fn has_conflict(&self) -> bool {
        self.reason == Reason::Conflict
    }
}

fn serialize_patterns<S: Serializer>(rules: &[TermRule], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(rules.iter().map(TermRule::pattern))
}

/// Label written for notes the engine could not classify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureLabel {
    #[default]
    #[serde(rename = "ERROR")]
    Error,
}

/// Per-note output of a batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum NoteOutcome {
    Classified {
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        result: ClassificationResult,
        audit: AuditRecord,
    },
    /// The note could not be classified. Distinct from every rule-driven
    /// label so callers never confuse a fault with an ambiguous note.
    Failed {
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        label: FailureLabel,
        message: String,
    },
}

impl NoteOutcome {
    pub fn index(&self) -> usize {
        match self {
            Self::Classified { index, .. } | Self::Failed { index, .. } => *index,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Classified { id, .. } | Self::Failed { id, .. } => id.as_deref(),
        }
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            Self::Classified { result, .. } => Some(result),
            Self::Failed { .. } => None,
        }
    }

    pub fn audit(&self) -> Option<&AuditRecord> {
        match self {
            Self::Classified { audit, .. } => Some(audit),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// `TRUE`, `FALSE`, `UNK`, or `ERROR` for failed notes.
    pub fn label_str(&self) -> &'static str {
        match self {
            Self::Classified { result, .. } => result.label().as_str(),
            Self::Failed { .. } => "ERROR",
        }
    }
}
