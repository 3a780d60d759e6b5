//! Rulesets prepared for matching.
//!
//! Compilation normalizes every pattern once so per-note work is limited to
//! normalizing the note and scanning it. Codes keep their folded spelling;
//! words carry both their folded and stemmed spellings.

use authz_model::{CriteriaRole, CriteriaSet, RuleKind, SubPattern, TermRule, WordMatchMode};
use authz_normalization::TermNormalizer;
use authz_rules::LoadedRuleset;

/// A needle in both normalized views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle {
    pub stemmed: String,
    pub folded: String,
}

impl Needle {
    pub fn new(pattern: &str, normalizer: &TermNormalizer) -> Self {
        let text = normalizer.analyze(pattern);
        Self {
            stemmed: text.stemmed().to_string(),
            folded: text.folded().to_string(),
        }
    }
}

/// A rule pattern in normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledPattern {
    Term(Needle),
    /// One needle per word of the folded pattern.
    Multiword(Vec<Needle>),
    /// Folded only: a code is matched literally, never stemmed.
    CodePrefix(String),
    Compound(Box<[CompiledPattern; 2]>),
}

impl CompiledPattern {
    pub fn compile(rule: &TermRule, normalizer: &TermNormalizer) -> Self {
        match rule.parts() {
            Some([first, second]) => Self::Compound(Box::new([
                Self::compile_part(first, normalizer),
                Self::compile_part(second, normalizer),
            ])),
            None => Self::simple(rule.kind(), rule.pattern(), normalizer),
        }
    }

    fn compile_part(part: &SubPattern, normalizer: &TermNormalizer) -> Self {
        Self::simple(part.kind(), part.pattern(), normalizer)
    }

    fn simple(kind: RuleKind, pattern: &str, normalizer: &TermNormalizer) -> Self {
        match kind {
            RuleKind::Multiword => Self::Multiword(
                normalizer
                    .fold(pattern)
                    .split(' ')
                    .filter(|word| !word.is_empty())
                    .map(|word| Needle::new(word, normalizer))
                    .collect(),
            ),
            RuleKind::CodePrefix => Self::CodePrefix(normalizer.fold(pattern)),
            // Sub-patterns are never compound; a compound rule without parts
            // cannot be constructed.
            RuleKind::Term | RuleKind::Compound => Self::Term(Needle::new(pattern, normalizer)),
        }
    }
}

/// A criteria set with its compiled patterns, index-aligned with the rules.
#[derive(Debug, Clone)]
pub struct CompiledSet {
    set: CriteriaSet,
    patterns: Vec<CompiledPattern>,
}

impl CompiledSet {
    pub fn compile(set: CriteriaSet, normalizer: &TermNormalizer) -> Self {
        let patterns = set
            .iter()
            .map(|rule| CompiledPattern::compile(rule, normalizer))
            .collect();
        Self { set, patterns }
    }

    pub fn criteria(&self) -> &CriteriaSet {
        &self.set
    }

    pub fn role(&self) -> CriteriaRole {
        self.set.role()
    }

    pub fn rule(&self, position: usize) -> Option<&TermRule> {
        self.set.get(position)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `(position, rule, pattern)` in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &TermRule, &CompiledPattern)> {
        self.set
            .iter()
            .zip(&self.patterns)
            .enumerate()
            .map(|(position, (rule, pattern))| (position, rule, pattern))
    }
}

/// Immutable, shareable form of a [`LoadedRuleset`].
#[derive(Debug, Clone)]
pub struct CompiledRuleset {
    pub name: String,
    pub version: Option<String>,
    pub fingerprint: String,
    pub word_mode: WordMatchMode,
    pub normalizer: TermNormalizer,
    pub inclusion: CompiledSet,
    pub exclusion: CompiledSet,
}

impl CompiledRuleset {
    pub fn compile(ruleset: LoadedRuleset) -> Self {
        let inclusion = CompiledSet::compile(ruleset.inclusion, &ruleset.normalizer);
        let exclusion = CompiledSet::compile(ruleset.exclusion, &ruleset.normalizer);
        Self {
            name: ruleset.name,
            version: ruleset.version,
            fingerprint: ruleset.fingerprint,
            word_mode: ruleset.word_mode,
            normalizer: ruleset.normalizer,
            inclusion,
            exclusion,
        }
    }

    pub fn set(&self, role: CriteriaRole) -> &CompiledSet {
        match role {
            CriteriaRole::Inclusion => &self.inclusion,
            CriteriaRole::Exclusion => &self.exclusion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needle(stemmed: &str, folded: &str) -> Needle {
        Needle {
            stemmed: stemmed.to_string(),
            folded: folded.to_string(),
        }
    }

    #[test]
    fn multiword_patterns_split_after_normalization() {
        let normalizer = TermNormalizer::claims_review();
        let rule = TermRule::multiword("Decision   UPHELD").unwrap();
        assert_eq!(
            CompiledPattern::compile(&rule, &normalizer),
            CompiledPattern::Multiword(vec![
                needle("decision", "decision"),
                needle("uphold", "upheld")
            ])
        );
    }

    #[test]
    fn code_prefixes_are_not_stemmed() {
        let normalizer = TermNormalizer::claims_review();
        let rule = TermRule::code_prefix("DENIAL").unwrap();
        assert_eq!(
            CompiledPattern::compile(&rule, &normalizer),
            CompiledPattern::CodePrefix("denial".to_string())
        );
    }

    #[test]
    fn compound_parts_compile_by_their_own_kind() {
        let normalizer = TermNormalizer::case_only();
        let rule = TermRule::compound(
            SubPattern::new("REQ-GBD", RuleKind::CodePrefix).unwrap(),
            SubPattern::new("medical director", RuleKind::Multiword).unwrap(),
            None,
        );
        let CompiledPattern::Compound(parts) = CompiledPattern::compile(&rule, &normalizer) else {
            panic!("expected compound");
        };
        assert_eq!(parts[0], CompiledPattern::CodePrefix("req-gbd".to_string()));
        assert_eq!(
            parts[1],
            CompiledPattern::Multiword(vec![
                needle("medical", "medical"),
                needle("director", "director")
            ])
        );
    }
}
