//! Matching options.

use serde::{Deserialize, Serialize};

/// How pattern words are located inside a note.
///
/// `Substring` lets `cat` match `category`. `WholeWord` requires every
/// needle to sit between non-alphanumeric characters (or the text edges);
/// code prefixes only need the left boundary because any continuation is
/// allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordMatchMode {
    #[default]
    Substring,
    #[serde(alias = "whole_word", alias = "whole-word")]
    WholeWord,
}

impl WordMatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::WholeWord => "wholeWord",
        }
    }
}
