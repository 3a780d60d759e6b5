//! Input notes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseRunTypeError;

/// Mode flag controlling the label used when no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
    /// Unmatched notes are authorized (`TRUE`).
    #[default]
    Production,
    /// Unmatched notes are left undecided (`UNK`).
    Test,
}

impl RunType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunType {
    type Err = ParseRunTypeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(ParseRunTypeError(raw.to_string())),
        }
    }
}

/// A single free-text note awaiting classification.
///
/// Notes are immutable once built. A missing or empty text is a valid note
/// that simply cannot match any rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    text: String,
    #[serde(default)]
    run_type: RunType,
}

impl Note {
    pub fn new(text: impl Into<String>, run_type: RunType) -> Self {
        Self {
            text: text.into(),
            run_type,
        }
    }

    /// A note without text.
    pub fn empty(run_type: RunType) -> Self {
        Self::new(String::new(), run_type)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn run_type(&self) -> RunType {
        self.run_type
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
