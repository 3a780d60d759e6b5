//! Pattern matching against normalized note text.
//!
//! A note is matched in two views produced by the same
//! [`authz_normalization::TermNormalizer`] as the patterns: folded
//! (lowercase, collapsed whitespace) and stemmed (folded plus stem table).
//! Words are looked up in the stemmed view, and in substring mode also in
//! the folded view so letters inside longer tokens are still found. Codes are
//! looked up in the folded view only. Every returned span is a byte range in
//! the folded view; `None` means the rule did not fire.

use authz_model::{MatchSpan, WordMatchMode};
use authz_normalization::NormalizedText;

use crate::compiled::{CompiledPattern, Needle};

/// Which sides of an occurrence must sit on a word boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    None,
    Left,
    Both,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternMatcher {
    mode: WordMatchMode,
}

impl PatternMatcher {
    pub fn new(mode: WordMatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> WordMatchMode {
        self.mode
    }

    /// Contiguous occurrence of `needle`.
    pub fn match_term(&self, text: &NormalizedText, needle: &Needle) -> Option<Vec<MatchSpan>> {
        self.find_needle(text, needle).map(|span| vec![span])
    }

    /// Every word occurs somewhere, in any order, not necessarily adjacent.
    pub fn match_multiword(
        &self,
        text: &NormalizedText,
        words: &[Needle],
    ) -> Option<Vec<MatchSpan>> {
        if words.is_empty() {
            return None;
        }
        words
            .iter()
            .map(|word| self.find_needle(text, word))
            .collect()
    }

    /// `prefix` followed by any continuation, including none.
    pub fn match_code_prefix(&self, text: &NormalizedText, prefix: &str) -> Option<Vec<MatchSpan>> {
        let boundary = match self.mode {
            WordMatchMode::Substring => Boundary::None,
            WordMatchMode::WholeWord => Boundary::Left,
        };
        find(text.folded(), prefix, boundary).map(|(start, end)| vec![MatchSpan::new(start, end)])
    }

    /// Both parts match independently; order and adjacency are irrelevant.
    pub fn match_compound(
        &self,
        text: &NormalizedText,
        parts: &[CompiledPattern; 2],
    ) -> Option<Vec<MatchSpan>> {
        let mut spans = self.match_pattern(text, &parts[0])?;
        spans.extend(self.match_pattern(text, &parts[1])?);
        Some(spans)
    }

    pub fn match_pattern(
        &self,
        text: &NormalizedText,
        pattern: &CompiledPattern,
    ) -> Option<Vec<MatchSpan>> {
        match pattern {
            CompiledPattern::Term(needle) => self.match_term(text, needle),
            CompiledPattern::Multiword(words) => self.match_multiword(text, words),
            CompiledPattern::CodePrefix(prefix) => self.match_code_prefix(text, prefix),
            CompiledPattern::Compound(parts) => self.match_compound(text, parts),
        }
    }

    /// Earliest occurrence of a word needle across the views this mode reads.
    fn find_needle(&self, text: &NormalizedText, needle: &Needle) -> Option<MatchSpan> {
        let stemmed = find(text.stemmed(), &needle.stemmed, self.word_boundary()).map(
            |(start, end)| {
                let (start, end) = text.folded_range(start, end);
                MatchSpan::new(start, end)
            },
        );
        let folded = match self.mode {
            WordMatchMode::Substring => find(text.folded(), &needle.folded, Boundary::None)
                .map(|(start, end)| MatchSpan::new(start, end)),
            WordMatchMode::WholeWord => None,
        };
        match (stemmed, folded) {
            (Some(stemmed), Some(folded)) => Some(stemmed.min(folded)),
            (stemmed, folded) => stemmed.or(folded),
        }
    }

    fn word_boundary(&self) -> Boundary {
        match self.mode {
            WordMatchMode::Substring => Boundary::None,
            WordMatchMode::WholeWord => Boundary::Both,
        }
    }
}

/// First occurrence of `needle` satisfying `boundary`. Occurrences are tried
/// at every start position so overlapping candidates are not skipped.
fn find(text: &str, needle: &str, boundary: Boundary) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let mut from = 0;
    while let Some(offset) = text[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        if satisfies(text, needle, start, end, boundary) {
            return Some((start, end));
        }
        from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        if from >= text.len() {
            break;
        }
    }
    None
}

fn satisfies(text: &str, needle: &str, start: usize, end: usize, boundary: Boundary) -> bool {
    let left_ok = || {
        !starts_with_word_char(needle) || !text[..start].chars().next_back().is_some_and(is_word)
    };
    let right_ok = || !ends_with_word_char(needle) || !text[end..].chars().next().is_some_and(is_word);
    match boundary {
        Boundary::None => true,
        Boundary::Left => left_ok(),
        Boundary::Both => left_ok() && right_ok(),
    }
}

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric()
}

fn starts_with_word_char(needle: &str) -> bool {
    needle.chars().next().is_some_and(is_word)
}

fn ends_with_word_char(needle: &str) -> bool {
    needle.chars().next_back().is_some_and(is_word)
}

#[cfg(test)]
mod tests {
    use authz_normalization::TermNormalizer;

    use super::*;

    fn substring() -> PatternMatcher {
        PatternMatcher::new(WordMatchMode::Substring)
    }

    fn whole_word() -> PatternMatcher {
        PatternMatcher::new(WordMatchMode::WholeWord)
    }

    fn text(raw: &str) -> NormalizedText {
        TermNormalizer::case_only().analyze(raw)
    }

    fn needle(pattern: &str) -> Needle {
        Needle::new(pattern, &TermNormalizer::case_only())
    }

    fn words(patterns: &[&str]) -> Vec<Needle> {
        patterns.iter().map(|pattern| needle(pattern)).collect()
    }

    #[test]
    fn term_is_a_contiguous_substring() {
        let spans = substring().match_term(&text("claim overturn per policy"), &needle("overturn"));
        assert_eq!(spans, Some(vec![MatchSpan::new(6, 14)]));
        assert_eq!(
            substring().match_term(&text("claim over turn"), &needle("overturn")),
            None
        );
    }

    #[test]
    fn multiword_ignores_order_and_adjacency() {
        let needles = words(&["decision", "uphold"]);
        assert!(
            substring()
                .match_multiword(&text("uphold, final decision"), &needles)
                .is_some()
        );
        assert!(
            substring()
                .match_multiword(&text("decision pending"), &needles)
                .is_none()
        );
    }

    #[test]
    fn code_prefix_allows_any_continuation() {
        let matcher = substring();
        assert!(matcher.match_code_prefix(&text("req-gbd-12345"), "req-gbd").is_some());
        assert!(matcher.match_code_prefix(&text("req-gbd"), "req-gbd").is_some());
        assert!(matcher.match_code_prefix(&text("req-gb"), "req-gbd").is_none());
    }

    #[test]
    fn whole_word_rejects_partial_words() {
        assert!(substring().match_term(&text("category"), &needle("cat")).is_some());
        assert!(whole_word().match_term(&text("category"), &needle("cat")).is_none());
        assert!(whole_word().match_term(&text("the cat sat"), &needle("cat")).is_some());
        assert!(whole_word().match_term(&text("cat."), &needle("cat")).is_some());
        assert!(
            whole_word()
                .match_multiword(&text("category of cats"), &words(&["cat"]))
                .is_none()
        );
    }

    #[test]
    fn whole_word_finds_later_bounded_occurrence() {
        let spans = whole_word().match_term(&text("concat cat"), &needle("cat"));
        assert_eq!(spans, Some(vec![MatchSpan::new(7, 10)]));
    }

    #[test]
    fn whole_word_code_prefix_only_needs_left_boundary() {
        let matcher = whole_word();
        assert!(matcher.match_code_prefix(&text("req-gbd-12345"), "req-gbd").is_some());
        assert!(matcher.match_code_prefix(&text("req-gbdx"), "req-gbd").is_some());
        assert!(matcher.match_code_prefix(&text("xreq-gbd"), "req-gbd").is_none());
        assert!(matcher.match_code_prefix(&text("ref: req-gbd"), "req-gbd").is_some());
    }

    #[test]
    fn punctuation_edges_do_not_need_boundaries() {
        assert!(whole_word().match_term(&text("ref#123"), &needle("#123")).is_some());
    }

    #[test]
    fn stemmed_hits_report_the_folded_word() {
        let normalizer = TermNormalizer::claims_review();
        let note = normalizer.analyze("Claim DENIED today");
        let denial = Needle::new("denial", &normalizer);
        for matcher in [substring(), whole_word()] {
            assert_eq!(
                matcher.match_term(&note, &denial),
                Some(vec![MatchSpan::new(6, 12)])
            );
        }
    }

    #[test]
    fn substring_mode_reads_letters_inside_longer_tokens() {
        let normalizer = TermNormalizer::claims_review();
        let note = normalizer.analyze("preapproval granted");
        let approval = Needle::new("approval", &normalizer);
        assert_eq!(
            substring().match_term(&note, &approval),
            Some(vec![MatchSpan::new(3, 11)])
        );
        assert!(whole_word().match_term(&note, &approval).is_none());
    }

    #[test]
    fn code_prefixes_read_the_unstemmed_note() {
        let normalizer = TermNormalizer::claims_review();
        let note = normalizer.analyze("UPHELD-77 DENIAL2024-0001");
        for matcher in [substring(), whole_word()] {
            assert_eq!(
                matcher.match_code_prefix(&note, &normalizer.fold("UPHE")),
                Some(vec![MatchSpan::new(0, 4)])
            );
            assert_eq!(
                matcher.match_code_prefix(&note, &normalizer.fold("DENIAL")),
                Some(vec![MatchSpan::new(10, 16)])
            );
        }
    }

    #[test]
    fn compound_needs_both_parts() {
        let parts = [
            CompiledPattern::Term(needle("deny")),
            CompiledPattern::CodePrefix("req-".to_string()),
        ];
        let matcher = substring();
        let spans = matcher.match_compound(&text("req-9 deny"), &parts).unwrap();
        assert_eq!(spans, vec![MatchSpan::new(6, 10), MatchSpan::new(0, 4)]);
        assert!(matcher.match_compound(&text("deny only"), &parts).is_none());
        assert!(matcher.match_compound(&text("req-9 only"), &parts).is_none());
    }

    #[test]
    fn empty_needles_never_match() {
        assert!(substring().match_term(&text("anything"), &needle("")).is_none());
        assert!(substring().match_multiword(&text("anything"), &[]).is_none());
    }

    #[test]
    fn multibyte_text_is_scanned_safely() {
        let spans = whole_word().match_term(&text("ééé café"), &needle("café"));
        assert_eq!(spans, Some(vec![MatchSpan::new(7, 12)]));
        assert!(whole_word().match_term(&text("écafé"), &needle("café")).is_none());
    }
}
