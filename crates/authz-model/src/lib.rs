pub mod audit;
pub mod criteria;
pub mod error;
pub mod note;
pub mod options;
pub mod result;
pub mod rule;

pub use audit::{AuditRecord, MatchSpan, RuleHit};
pub use criteria::{CriteriaRole, CriteriaSet};
pub use error::{ParseRunTypeError, RuleError};
pub use note::{Note, RunType};
pub use options::WordMatchMode;
pub use result::{ClassificationResult, FailureLabel, Label, NoteOutcome, Reason};
pub use rule::{RuleKind, SubPattern, TermRule};
