use std::sync::Arc;

use crate::table::CanonTable;

/// Canonicalizes note text and rule patterns before matching.
///
/// 1. Unicode lowercase through [`char::to_lowercase`]. This is simple case
///    mapping, not full case folding: `STRASSE` and `straße` stay different.
/// 2. Whitespace runs collapse to a single space; leading and trailing
///    whitespace is dropped.
/// 3. Each word (maximal run of letters and digits) listed in the
///    [`CanonTable`] is replaced by its canonical stem. Everything else,
///    hyphens and digits inside codes included, passes through unchanged.
///
/// Steps 1 and 2 alone give the *folded* view; all three give the *stemmed*
/// view. The same instance must be applied to both sides of a comparison.
#[derive(Debug, Clone, Default)]
pub struct TermNormalizer {
    table: Arc<CanonTable>,
}

impl TermNormalizer {
    pub fn new(table: CanonTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Case folding and whitespace collapsing only.
    pub fn case_only() -> Self {
        Self::default()
    }

    pub fn claims_review() -> Self {
        Self::new(CanonTable::claims_review())
    }

    pub fn table(&self) -> &CanonTable {
        &self.table
    }

    /// The stemmed view of `raw`.
    pub fn normalize(&self, raw: &str) -> String {
        self.analyze(raw).stemmed
    }

    /// The folded view of `raw`: lowercase with collapsed whitespace.
    pub fn fold(&self, raw: &str) -> String {
        self.analyze(raw).folded
    }

    /// Both views of `raw`, with the offsets that relate them.
    pub fn analyze(&self, raw: &str) -> NormalizedText {
        let mut text = NormalizedText::default();
        let mut word = String::new();
        let mut pending_space = false;

        for ch in raw.chars() {
            if ch.is_whitespace() {
                self.flush_word(&mut word, &mut text);
                pending_space = !text.folded.is_empty();
                continue;
            }
            if pending_space {
                text.push_plain(" ");
                pending_space = false;
            }
            for lower in ch.to_lowercase() {
                if lower.is_alphanumeric() {
                    word.push(lower);
                } else {
                    self.flush_word(&mut word, &mut text);
                    text.push_plain(lower.encode_utf8(&mut [0; 4]));
                }
            }
        }
        self.flush_word(&mut word, &mut text);
        text.bounds.push((text.folded.len(), text.folded.len()));
        text
    }

    fn flush_word(&self, word: &mut String, text: &mut NormalizedText) {
        if word.is_empty() {
            return;
        }
        match self.table.canonical(word) {
            Some(stem) if stem != word.as_str() => text.push_replaced(word, stem),
            _ => text.push_plain(word),
        }
        word.clear();
    }
}

/// A note in its folded and stemmed views.
///
/// Byte offsets in the stemmed view translate to the folded view through
/// [`NormalizedText::folded_range`]. A range that starts or ends inside a
/// replaced word widens to cover the whole original word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    folded: String,
    stemmed: String,
    /// Per stemmed byte offset (including the end): the folded offset to use
    /// as a range start and as a range end.
    bounds: Vec<(usize, usize)>,
}

impl NormalizedText {
    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn stemmed(&self) -> &str {
        &self.stemmed
    }

    /// Folded byte range covering the stemmed range `start..end`.
    pub fn folded_range(&self, start: usize, end: usize) -> (usize, usize) {
        let from = self.bounds.get(start).map_or(self.folded.len(), |bound| bound.0);
        let to = self.bounds.get(end).map_or(self.folded.len(), |bound| bound.1);
        (from, to)
    }

    fn push_plain(&mut self, piece: &str) {
        let base = self.folded.len();
        self.bounds
            .extend((0..piece.len()).map(|offset| (base + offset, base + offset)));
        self.folded.push_str(piece);
        self.stemmed.push_str(piece);
    }

    fn push_replaced(&mut self, word: &str, stem: &str) {
        let start = self.folded.len();
        let end = start + word.len();
        self.bounds.extend(
            (0..stem.len()).map(|offset| if offset == 0 { (start, start) } else { (start, end) }),
        );
        self.folded.push_str(word);
        self.stemmed.push_str(stem);
    }
}
