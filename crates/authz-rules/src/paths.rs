#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

/// Environment variable naming the rules file.
pub const RULES_ENV_VAR: &str = "AUTHZ_RULES";

/// Rules file looked up in the working directory when nothing else is set.
pub const DEFAULT_RULES_FILE: &str = "authz-rules.toml";

/// Resolve the rules file: explicit path, then `AUTHZ_RULES`, then
/// `authz-rules.toml` in the working directory.
pub fn resolve_rules_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(RULES_ENV_VAR)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_RULES_FILE)
}

/// Source format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFormat {
    Toml,
    Json,
}

impl RulesFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}
