#![deny(unsafe_code)]

use authz_model::{CriteriaSet, TermRule, WordMatchMode};
use authz_normalization::CanonTable;
use sha2::{Digest, Sha256};

const FIELD_SEP: u8 = 0x1f;
const RECORD_SEP: u8 = 0x1e;

/// Content fingerprint of a ruleset.
///
/// Covers everything that can change a decision: word mode, stem table and
/// both criteria sets in order. Formatting of the source file does not
/// matter, so a TOML file and its JSON equivalent share a fingerprint.
pub fn ruleset_fingerprint(
    name: &str,
    version: Option<&str>,
    word_mode: WordMatchMode,
    table: &CanonTable,
    inclusion: &CriteriaSet,
    exclusion: &CriteriaSet,
) -> String {
    let mut hasher = Sha256::new();
    field(&mut hasher, name.as_bytes());
    field(&mut hasher, version.unwrap_or("").as_bytes());
    field(&mut hasher, word_mode.as_str().as_bytes());
    for (word, canonical) in table.iter() {
        field(&mut hasher, word.as_bytes());
        field(&mut hasher, canonical.as_bytes());
    }
    hasher.update([RECORD_SEP]);
    for set in [inclusion, exclusion] {
        field(&mut hasher, set.role().as_str().as_bytes());
        for rule in set {
            rule_fields(&mut hasher, rule);
        }
        hasher.update([RECORD_SEP]);
    }
    hex::encode(hasher.finalize())
}

fn rule_fields(hasher: &mut Sha256, rule: &TermRule) {
    field(hasher, rule.kind().as_str().as_bytes());
    field(hasher, rule.pattern().as_bytes());
    if let Some(parts) = rule.parts() {
        for part in parts.iter() {
            field(hasher, part.kind().as_str().as_bytes());
            field(hasher, part.pattern().as_bytes());
        }
    }
    hasher.update([RECORD_SEP]);
}

fn field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update(bytes);
    hasher.update([FIELD_SEP]);
}
