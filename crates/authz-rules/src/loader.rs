#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use authz_model::{CriteriaRole, CriteriaSet, RuleKind, SubPattern, TermRule, WordMatchMode};
use authz_normalization::{CanonTable, TermNormalizer};

use crate::config::{CriteriaSection, RuleEntry, RulesFile};
use crate::error::RulesError;
use crate::hash::ruleset_fingerprint;
use crate::paths::RulesFormat;

/// A validated ruleset, ready to be compiled for classification.
#[derive(Debug, Clone)]
pub struct LoadedRuleset {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    /// Hex SHA-256 over everything that can change a decision.
    pub fingerprint: String,
    pub word_mode: WordMatchMode,
    pub normalizer: TermNormalizer,
    pub inclusion: CriteriaSet,
    pub exclusion: CriteriaSet,
    /// File the ruleset was read from, if any.
    pub source: Option<PathBuf>,
}

impl LoadedRuleset {
    pub fn builder(name: impl Into<String>) -> RulesetBuilder {
        RulesetBuilder::new(name)
    }

    pub fn rule_count(&self) -> usize {
        self.inclusion.len() + self.exclusion.len()
    }

    pub fn set(&self, role: CriteriaRole) -> &CriteriaSet {
        match role {
            CriteriaRole::Inclusion => &self.inclusion,
            CriteriaRole::Exclusion => &self.exclusion,
        }
    }
}

/// Programmatic construction with the same validation as a rules file.
#[derive(Debug, Clone)]
pub struct RulesetBuilder {
    name: String,
    version: Option<String>,
    description: Option<String>,
    word_mode: WordMatchMode,
    table: CanonTable,
    inclusion_name: Option<String>,
    exclusion_name: Option<String>,
    inclusion: Vec<TermRule>,
    exclusion: Vec<TermRule>,
}

impl RulesetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            description: None,
            word_mode: WordMatchMode::default(),
            table: CanonTable::claims_review(),
            inclusion_name: None,
            exclusion_name: None,
            inclusion: Vec::new(),
            exclusion: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn word_mode(mut self, word_mode: WordMatchMode) -> Self {
        self.word_mode = word_mode;
        self
    }

    pub fn stem_table(mut self, table: CanonTable) -> Self {
        self.table = table;
        self
    }

    pub fn inclusion_name(mut self, name: impl Into<String>) -> Self {
        self.inclusion_name = Some(name.into());
        self
    }

    pub fn exclusion_name(mut self, name: impl Into<String>) -> Self {
        self.exclusion_name = Some(name.into());
        self
    }

    pub fn include(mut self, rule: TermRule) -> Self {
        self.inclusion.push(rule);
        self
    }

    pub fn exclude(mut self, rule: TermRule) -> Self {
        self.exclusion.push(rule);
        self
    }

    pub fn inclusion(mut self, rules: Vec<TermRule>) -> Self {
        self.inclusion = rules;
        self
    }

    pub fn exclusion(mut self, rules: Vec<TermRule>) -> Self {
        self.exclusion = rules;
        self
    }

    pub fn build(self) -> Result<LoadedRuleset, RulesError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RulesError::EmptyName);
        }
        let normalizer = TermNormalizer::new(self.table);
        let inclusion = build_set(
            CriteriaRole::Inclusion,
            self.inclusion_name,
            self.inclusion,
            &normalizer,
        )?;
        let exclusion = build_set(
            CriteriaRole::Exclusion,
            self.exclusion_name,
            self.exclusion,
            &normalizer,
        )?;
        let fingerprint = ruleset_fingerprint(
            &name,
            self.version.as_deref(),
            self.word_mode,
            normalizer.table(),
            &inclusion,
            &exclusion,
        );
        Ok(LoadedRuleset {
            name,
            version: self.version,
            description: self.description,
            fingerprint,
            word_mode: self.word_mode,
            normalizer,
            inclusion,
            exclusion,
            source: None,
        })
    }
}

/// Read and validate a rules file. `.json` files are parsed as JSON,
/// everything else as TOML.
pub fn load_ruleset(path: &Path) -> Result<LoadedRuleset, RulesError> {
    let contents = std::fs::read_to_string(path).map_err(|source| RulesError::io(path, source))?;
    let mut ruleset = parse_ruleset(
        &contents,
        RulesFormat::from_path(path),
        &path.display().to_string(),
    )?;
    ruleset.source = Some(path.to_path_buf());
    info!(
        path = %path.display(),
        ruleset = %ruleset.name,
        inclusion_rules = ruleset.inclusion.len(),
        exclusion_rules = ruleset.exclusion.len(),
        fingerprint = %ruleset.fingerprint,
        "rules loaded"
    );
    Ok(ruleset)
}

/// Parse and validate rules held in memory. `origin` names the source in
/// error messages.
pub fn parse_ruleset(
    contents: &str,
    format: RulesFormat,
    origin: &str,
) -> Result<LoadedRuleset, RulesError> {
    let file: RulesFile = match format {
        RulesFormat::Toml => toml::from_str(contents).map_err(|source| RulesError::Toml {
            origin: origin.to_string(),
            source,
        })?,
        RulesFormat::Json => {
            serde_json::from_str(contents).map_err(|source| RulesError::Json {
                origin: origin.to_string(),
                source,
            })?
        }
    };
    from_rules_file(file)
}

/// Validate an already-deserialized rules file.
pub fn from_rules_file(file: RulesFile) -> Result<LoadedRuleset, RulesError> {
    let table = build_table(file.normalization.builtin, &file.normalization.stems)?;
    let inclusion = section_rules(CriteriaRole::Inclusion, &file.inclusion)?;
    let exclusion = section_rules(CriteriaRole::Exclusion, &file.exclusion)?;

    let mut builder = RulesetBuilder::new(file.ruleset.name)
        .word_mode(file.matching.word_mode)
        .stem_table(table)
        .inclusion(inclusion)
        .exclusion(exclusion);
    if let Some(version) = file.ruleset.version {
        builder = builder.version(version);
    }
    if let Some(description) = file.ruleset.description {
        builder = builder.description(description);
    }
    if let Some(name) = file.inclusion.name {
        builder = builder.inclusion_name(name);
    }
    if let Some(name) = file.exclusion.name {
        builder = builder.exclusion_name(name);
    }
    builder.build()
}

fn build_table(
    builtin: bool,
    stems: &BTreeMap<String, Vec<String>>,
) -> Result<CanonTable, RulesError> {
    let mut table = if builtin {
        CanonTable::claims_review()
    } else {
        CanonTable::new()
    };
    let extra = CanonTable::from_entries(
        stems
            .iter()
            .map(|(canonical, variants)| (canonical.as_str(), variants.iter().map(String::as_str))),
    )?;
    table.merge(&extra)?;
    debug!(entries = table.len(), builtin, "stem table built");
    Ok(table)
}

fn section_rules(
    role: CriteriaRole,
    section: &CriteriaSection,
) -> Result<Vec<TermRule>, RulesError> {
    section
        .rules
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            build_rule(entry).map_err(|source| RulesError::Rule {
                set: role,
                position,
                source,
            })
        })
        .collect()
}

fn build_rule(entry: &RuleEntry) -> Result<TermRule, authz_model::RuleError> {
    match entry.kind {
        RuleKind::Compound => {
            if entry.pattern.is_some() {
                return Err(authz_model::RuleError::PatternOnCompound);
            }
            let parts = entry
                .parts
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|part| SubPattern::new(part.pattern.as_str(), part.kind))
                .collect::<Result<Vec<_>, _>>()?;
            TermRule::compound_from_parts(parts, entry.label.clone())
        }
        kind => {
            if entry.parts.is_some() {
                return Err(authz_model::RuleError::UnexpectedParts { kind });
            }
            if let Some(label) = &entry.label {
                warn!(%kind, label = %label, "label is only used by compound rules; ignored");
            }
            TermRule::simple(kind, entry.pattern.as_deref().unwrap_or_default())
        }
    }
}

fn build_set(
    role: CriteriaRole,
    name: Option<String>,
    rules: Vec<TermRule>,
    normalizer: &TermNormalizer,
) -> Result<CriteriaSet, RulesError> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    for (position, rule) in rules.iter().enumerate() {
        let key = duplicate_key(rule, normalizer);
        if let Some(first) = seen.get(&key) {
            return Err(RulesError::Duplicate {
                set: role,
                position,
                first: *first,
                pattern: rule.pattern().to_string(),
            });
        }
        seen.insert(key, position);
    }
    debug!(set = %role, rules = rules.len(), "criteria set validated");
    Ok(CriteriaSet::new(
        name.unwrap_or_else(|| role.as_str().to_string()),
        role,
        rules,
    ))
}

/// Two rules are duplicates when they have the same kind and the same
/// normalized pattern. Compound part order and multiword word order are
/// ignored; codes compare in their folded form.
fn duplicate_key(rule: &TermRule, normalizer: &TermNormalizer) -> String {
    match rule.parts() {
        Some(parts) => {
            let mut keys: Vec<String> = parts
                .iter()
                .map(|part| simple_key(part.kind(), part.pattern(), normalizer))
                .collect();
            keys.sort();
            format!("compound:{}", keys.join("\u{1f}"))
        }
        None => simple_key(rule.kind(), rule.pattern(), normalizer),
    }
}

fn simple_key(kind: RuleKind, pattern: &str, normalizer: &TermNormalizer) -> String {
    let normalized = match kind {
        RuleKind::CodePrefix => normalizer.fold(pattern),
        RuleKind::Multiword => {
            let stemmed = normalizer.normalize(pattern);
            let mut words: Vec<&str> = stemmed.split(' ').filter(|word| !word.is_empty()).collect();
            words.sort_unstable();
            words.dedup();
            words.join(" ")
        }
        RuleKind::Term | RuleKind::Compound => normalizer.normalize(pattern),
    };
    format!("{kind}:{normalized}")
}
