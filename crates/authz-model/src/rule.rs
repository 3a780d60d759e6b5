//! Term rules.
//!
//! A rule is one of four kinds:
//!
//! - **term**: the pattern occurs as a contiguous substring of the note
//! - **multiword**: every whitespace-separated word of the pattern occurs
//!   somewhere in the note, in any order
//! - **codePrefix**: the note contains the pattern followed by any
//!   continuation (`REQ-GBD` matches `REQ-GBD-12345`)
//! - **compound**: two sub-patterns, each term/multiword/codePrefix, which
//!   must both match independently
//!
//! Rules can only be built through the validating constructors, so a
//! `TermRule` in hand is always well formed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Term,
    #[serde(alias = "multi_word", alias = "multi-word")]
    Multiword,
    Compound,
    #[serde(alias = "code_prefix", alias = "code-prefix")]
    CodePrefix,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Term => "term",
            Self::Multiword => "multiword",
            Self::Compound => "compound",
            Self::CodePrefix => "codePrefix",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One half of a compound rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubPattern {
    pattern: String,
    kind: RuleKind,
}

impl SubPattern {
    pub fn new(pattern: impl Into<String>, kind: RuleKind) -> Result<Self, RuleError> {
        if kind == RuleKind::Compound {
            return Err(RuleError::NestedCompound);
        }
        let pattern = checked_pattern(pattern.into(), kind)?;
        Ok(Self { pattern, kind })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TermRule {
    pattern: String,
    kind: RuleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    parts: Option<Box<[SubPattern; 2]>>,
}

impl TermRule {
    /// Build a non-compound rule of the given kind.
    pub fn simple(kind: RuleKind, pattern: impl Into<String>) -> Result<Self, RuleError> {
        if kind == RuleKind::Compound {
            return Err(RuleError::CompoundPartCount { found: 0 });
        }
        let pattern = checked_pattern(pattern.into(), kind)?;
        Ok(Self {
            pattern,
            kind,
            parts: None,
        })
    }

    pub fn term(pattern: impl Into<String>) -> Result<Self, RuleError> {
        Self::simple(RuleKind::Term, pattern)
    }

    pub fn multiword(pattern: impl Into<String>) -> Result<Self, RuleError> {
        Self::simple(RuleKind::Multiword, pattern)
    }

    pub fn code_prefix(pattern: impl Into<String>) -> Result<Self, RuleError> {
        Self::simple(RuleKind::CodePrefix, pattern)
    }

    /// Build a compound rule from two sub-patterns.
    ///
    /// The display pattern is `label` when given, otherwise
    /// `"<first> + <second>"`.
    pub fn compound(first: SubPattern, second: SubPattern, label: Option<String>) -> Self {
        let pattern = label
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("{} + {}", first.pattern, second.pattern));
        Self {
            pattern,
            kind: RuleKind::Compound,
            parts: Some(Box::new([first, second])),
        }
    }

    /// Build a compound rule from a configured list of parts.
    pub fn compound_from_parts(
        parts: Vec<SubPattern>,
        label: Option<String>,
    ) -> Result<Self, RuleError> {
        let found = parts.len();
        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(first), Some(second), None) => Ok(Self::compound(first, second, label)),
            _ => Err(RuleError::CompoundPartCount { found }),
        }
    }

    /// Display pattern, as shown in results and audit records.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// The two sub-patterns of a compound rule.
    pub fn parts(&self) -> Option<&[SubPattern; 2]> {
        self.parts.as_deref()
    }
}

impl fmt::Display for TermRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.pattern, self.kind)
    }
}

fn checked_pattern(pattern: String, kind: RuleKind) -> Result<String, RuleError> {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        return Err(RuleError::EmptyPattern { kind });
    }
    Ok(trimmed.to_string())
}
