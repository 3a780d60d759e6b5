//! Canonicalization table.
//!
//! Maps morphological variants to one canonical stem. The table is explicit
//! and finite: a word not listed is left as it is, there is no stemming
//! algorithm behind it.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonError {
    #[error("stem table entry `{word}` must be a single word of letters or digits")]
    NotAWord { word: String },
    #[error("`{word}` is claimed by both `{first}` and `{second}`")]
    Ambiguous {
        word: String,
        first: String,
        second: String,
    },
}

/// Claims-review vocabulary: `canonical -> variants`.
const CLAIMS_REVIEW_STEMS: &[(&str, &[&str])] = &[
    ("approve", &["approved", "approval", "approves", "approving", "approvals"]),
    ("deny", &["denied", "denial", "denies", "denying", "denials"]),
    ("overturn", &["overturned", "overturning", "overturns"]),
    ("uphold", &["upheld", "upholds", "upholding"]),
    (
        "authorize",
        &["authorized", "authorization", "authorizes", "authorizing", "authorizations"],
    ),
    ("reverse", &["reversed", "reversal", "reverses", "reversing"]),
    ("affirm", &["affirmed", "affirmation", "affirms", "affirming"]),
    ("appeal", &["appealed", "appeals", "appealing"]),
];

/// Variant to canonical stem lookup. Every canonical maps to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonTable {
    stems: BTreeMap<String, String>,
}

impl CanonTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in claims-review table.
    pub fn claims_review() -> Self {
        let mut table = Self::new();
        for (canonical, variants) in CLAIMS_REVIEW_STEMS {
            // Checked by `builtin_entries_are_valid`.
            let _ = table.insert(canonical, variants.iter().copied());
        }
        table
    }

    /// Build a table from `canonical -> variants` entries.
    pub fn from_entries<'a, I, V>(entries: I) -> Result<Self, CanonError>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::new();
        for (canonical, variants) in entries {
            table.insert(canonical, variants)?;
        }
        Ok(table)
    }

    /// Register a canonical stem and its variants.
    ///
    /// Words are lowercased. A word already mapped to a different canonical
    /// is rejected, so lookups never depend on insertion order.
    pub fn insert<'a, V>(&mut self, canonical: &str, variants: V) -> Result<(), CanonError>
    where
        V: IntoIterator<Item = &'a str>,
    {
        let canonical = checked_word(canonical)?;
        self.map(&canonical, &canonical)?;
        for variant in variants {
            let variant = checked_word(variant)?;
            self.map(&variant, &canonical)?;
        }
        Ok(())
    }

    /// Merge another table into this one.
    pub fn merge(&mut self, other: &CanonTable) -> Result<(), CanonError> {
        for (word, canonical) in &other.stems {
            if word == canonical {
                self.map(word, canonical)?;
            }
        }
        for (word, canonical) in &other.stems {
            self.map(word, canonical)?;
        }
        Ok(())
    }

    pub fn canonical<'s>(&'s self, word: &str) -> Option<&'s str> {
        self.stems.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// `(variant, canonical)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stems
            .iter()
            .map(|(word, canonical)| (word.as_str(), canonical.as_str()))
    }

    fn map(&mut self, word: &str, canonical: &str) -> Result<(), CanonError> {
        match self.stems.get(word) {
            Some(existing) if existing != canonical => Err(CanonError::Ambiguous {
                word: word.to_string(),
                first: existing.clone(),
                second: canonical.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                // A canonical must not itself be a variant of something else.
                if let Some(existing) = self.stems.get(canonical)
                    && existing != canonical
                {
                    return Err(CanonError::Ambiguous {
                        word: canonical.to_string(),
                        first: existing.clone(),
                        second: canonical.to_string(),
                    });
                }
                self.stems.insert(word.to_string(), canonical.to_string());
                Ok(())
            }
        }
    }
}

fn checked_word(raw: &str) -> Result<String, CanonError> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() || !word.chars().all(char::is_alphanumeric) {
        return Err(CanonError::NotAWord {
            word: raw.to_string(),
        });
    }
    Ok(word)
}
