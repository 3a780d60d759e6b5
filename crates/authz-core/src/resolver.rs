//! Fixed decision precedence.
//!
//! 1. inclusion and exclusion both matched: `UNK` (conflict)
//! 2. exclusion matched: `FALSE`
//! 3. inclusion matched: `TRUE`
//! 4. nothing matched: `UNK` on test runs, `TRUE` on production runs
//!
//! The conflict check must come first. Falling through the exclusion step
//! alone would answer `FALSE` before the inclusion evidence is consulted.

use authz_model::{Reason, RunType};

pub fn resolve(has_inclusion: bool, has_exclusion: bool, run_type: RunType) -> Reason {
    if has_inclusion && has_exclusion {
        return Reason::Conflict;
    }
    if has_exclusion {
        return Reason::Exclusion;
    }
    if has_inclusion {
        return Reason::Inclusion;
    }
    match run_type {
        RunType::Test => Reason::DefaultTest,
        RunType::Production => Reason::DefaultProduction,
    }
}
