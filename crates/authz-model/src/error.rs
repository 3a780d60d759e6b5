use thiserror::Error;

use crate::rule::RuleKind;

/// Rule configuration rejected while building a [`crate::TermRule`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("{kind} rule has an empty pattern")]
    EmptyPattern { kind: RuleKind },
    #[error("compound rule parts must be term, multiword or codePrefix")]
    NestedCompound,
    #[error("compound rule needs exactly two parts, found {found}")]
    CompoundPartCount { found: usize },
    #[error("{kind} rule cannot declare compound parts")]
    UnexpectedParts { kind: RuleKind },
    #[error("compound rule takes its patterns from `parts`, not `pattern`")]
    PatternOnCompound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown run type `{0}` (expected production or test)")]
pub struct ParseRunTypeError(pub String);
