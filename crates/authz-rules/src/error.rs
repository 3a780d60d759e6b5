#![deny(unsafe_code)]

use std::path::PathBuf;

use authz_model::{CriteriaRole, RuleError};
use authz_normalization::CanonError;

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML rules {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse JSON rules {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("ruleset name must not be empty")]
    EmptyName,

    #[error("invalid {set} rule #{position}: {source}")]
    Rule {
        set: CriteriaRole,
        position: usize,
        #[source]
        source: RuleError,
    },

    #[error("duplicate {set} rule #{position} `{pattern}` (same as rule #{first})")]
    Duplicate {
        set: CriteriaRole,
        position: usize,
        first: usize,
        pattern: String,
    },

    #[error("invalid stem table: {0}")]
    Canon(#[from] CanonError),
}

impl RulesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
