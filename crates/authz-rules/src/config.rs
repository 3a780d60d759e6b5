#![deny(unsafe_code)]

//! On-disk rules file schema.
//!
//! These types mirror the file one to one and are not validated; see
//! [`crate::loader`] for the checks that turn them into criteria sets.

use std::collections::BTreeMap;

use authz_model::{RuleKind, WordMatchMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesFile {
    pub ruleset: RulesetHeader,
    #[serde(default)]
    pub matching: MatchingSection,
    #[serde(default)]
    pub normalization: NormalizationSection,
    #[serde(default)]
    pub inclusion: CriteriaSection,
    #[serde(default)]
    pub exclusion: CriteriaSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesetHeader {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingSection {
    #[serde(default)]
    pub word_mode: WordMatchMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizationSection {
    /// Include the built-in claims-review stem table.
    #[serde(default = "default_builtin")]
    pub builtin: bool,
    /// Extra `canonical -> variants` entries.
    #[serde(default)]
    pub stems: BTreeMap<String, Vec<String>>,
}

impl Default for NormalizationSection {
    fn default() -> Self {
        Self {
            builtin: default_builtin(),
            stems: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaSection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default = "default_kind")]
    pub kind: RuleKind,
    /// Display label for compound rules.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub parts: Option<Vec<PartEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartEntry {
    pub pattern: String,
    #[serde(default = "default_kind")]
    pub kind: RuleKind,
}

fn default_builtin() -> bool {
    true
}

fn default_kind() -> RuleKind {
    RuleKind::Term
}
