//! Rule-based authorization classifier.
//!
//! Assigns `TRUE`, `FALSE` or `UNK` to a free-text note from an inclusion
//! and an exclusion criteria set, and records which rules fired. The engine
//! is deterministic and keeps no state between notes.

pub mod audit;
pub mod batch;
pub mod compiled;
pub mod evaluator;
pub mod matcher;
pub mod pipeline;
pub mod resolver;
pub mod snapshot;

pub use audit::{AuditTrail, RuleHitCount};
pub use batch::BatchNote;
pub use compiled::{CompiledPattern, CompiledRuleset, CompiledSet, Needle};
pub use evaluator::{CriteriaEvaluator, RuleMatch};
pub use matcher::PatternMatcher;
pub use pipeline::ClassificationPipeline;
pub use resolver::resolve;
pub use snapshot::RulesetHandle;
