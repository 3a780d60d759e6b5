use authz_model::{MatchSpan, RuleHit, TermRule, WordMatchMode};
use authz_normalization::NormalizedText;

use crate::compiled::CompiledSet;
use crate::matcher::PatternMatcher;

/// A rule that fired, by position in its set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub position: usize,
    pub spans: Vec<MatchSpan>,
}

/// Applies a whole criteria set to a normalized note.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriteriaEvaluator {
    matcher: PatternMatcher,
}

impl CriteriaEvaluator {
    pub fn new(mode: WordMatchMode) -> Self {
        Self {
            matcher: PatternMatcher::new(mode),
        }
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Every matching rule, in configuration order. Evaluation never stops
    /// at the first match.
    pub fn evaluate(&self, normalized: &NormalizedText, set: &CompiledSet) -> Vec<RuleMatch> {
        set.iter()
            .filter_map(|(position, _, pattern)| {
                self.matcher
                    .match_pattern(normalized, pattern)
                    .map(|spans| RuleMatch { position, spans })
            })
            .collect()
    }

    /// The rules behind a list of matches.
    pub fn matched_rules(set: &CompiledSet, matches: &[RuleMatch]) -> Vec<TermRule> {
        matches
            .iter()
            .filter_map(|found| set.rule(found.position).cloned())
            .collect()
    }

    pub fn hits(set: &CompiledSet, matches: &[RuleMatch]) -> Vec<RuleHit> {
        matches
            .iter()
            .filter_map(|found| {
                set.rule(found.position).map(|rule| RuleHit {
                    set: set.role(),
                    position: found.position,
                    pattern: rule.pattern().to_string(),
                    kind: rule.kind(),
                    spans: found.spans.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authz_model::{CriteriaRole, CriteriaSet};
    use authz_normalization::TermNormalizer;

    #[test]
    fn overlapping_rules_are_each_recorded() {
        let normalizer = TermNormalizer::claims_review();
        let set = CompiledSet::compile(
            CriteriaSet::new(
                "exclusion",
                CriteriaRole::Exclusion,
                vec![
                    TermRule::term("Overturned").unwrap(),
                    TermRule::term("partially overturned").unwrap(),
                    TermRule::term("upheld").unwrap(),
                    TermRule::multiword("overturned partially").unwrap(),
                ],
            ),
            &normalizer,
        );
        let text = normalizer.analyze("REQ-GBD-1 PARTIALLY OVERTURNED");
        let matches = CriteriaEvaluator::default().evaluate(&text, &set);

        let positions: Vec<usize> = matches.iter().map(|found| found.position).collect();
        assert_eq!(positions, vec![0, 1, 3]);

        let rules = CriteriaEvaluator::matched_rules(&set, &matches);
        assert_eq!(rules[0].pattern(), "Overturned");
        assert_eq!(rules[2].pattern(), "overturned partially");

        let hits = CriteriaEvaluator::hits(&set, &matches);
        assert!(hits.iter().all(|hit| hit.set == CriteriaRole::Exclusion));
    }

    #[test]
    fn empty_note_matches_nothing() {
        let normalizer = TermNormalizer::claims_review();
        let set = CompiledSet::compile(
            CriteriaSet::new(
                "inclusion",
                CriteriaRole::Inclusion,
                vec![TermRule::code_prefix("REQ").unwrap()],
            ),
            &normalizer,
        );
        let note = normalizer.analyze("");
        assert!(CriteriaEvaluator::default().evaluate(&note, &set).is_empty());
    }
}
