#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod hash;
pub mod loader;
pub mod paths;

pub use crate::error::RulesError;
pub use crate::loader::{LoadedRuleset, RulesetBuilder, from_rules_file, load_ruleset, parse_ruleset};
pub use crate::paths::{DEFAULT_RULES_FILE, RULES_ENV_VAR, RulesFormat, resolve_rules_path};
