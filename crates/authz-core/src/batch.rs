//! Batch classification.
//!
//! Notes are independent, so a batch is spread over the rayon pool. Output
//! order matches input order and every outcome carries the caller's index.
//! A note that faults is reported as [`NoteOutcome::Failed`] instead of
//! taking the batch down.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use authz_model::{AuditRecord, ClassificationResult, FailureLabel, Label, Note, NoteOutcome};

use crate::audit::AuditTrail;
use crate::pipeline::ClassificationPipeline;

/// A note plus the bookkeeping needed to re-associate its result.
#[derive(Debug, Clone)]
pub struct BatchNote {
    pub index: usize,
    pub id: Option<String>,
    pub note: Note,
}

impl BatchNote {
    pub fn new(index: usize, note: Note) -> Self {
        Self {
            index,
            id: None,
            note,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl ClassificationPipeline {
    pub fn classify_batch(&self, notes: &[BatchNote]) -> Vec<NoteOutcome> {
        let start = Instant::now();
        let outcomes: Vec<NoteOutcome> = notes
            .par_iter()
            .map(|item| {
                run_isolated(item.index, item.id.clone(), || {
                    self.classify_with_audit(item.index, item.id.as_deref(), &item.note)
                })
            })
            .collect();

        let trail = AuditTrail::from_outcomes(&outcomes);
        info!(
            ruleset = %self.ruleset().name,
            notes = outcomes.len(),
            true_count = trail.label_count(Label::True),
            false_count = trail.label_count(Label::False),
            unk_count = trail.label_count(Label::Unk),
            failed = trail.failed(),
            duration_ms = start.elapsed().as_millis(),
            "batch classified"
        );
        outcomes
    }

    /// Classify plain notes, indexed by position.
    pub fn classify_notes(&self, notes: &[Note]) -> Vec<NoteOutcome> {
        let batch: Vec<BatchNote> = notes
            .iter()
            .enumerate()
            .map(|(index, note)| BatchNote::new(index, note.clone()))
            .collect();
        self.classify_batch(&batch)
    }
}

fn run_isolated<F>(index: usize, id: Option<String>, classify: F) -> NoteOutcome
where
    F: FnOnce() -> (ClassificationResult, AuditRecord),
{
    match panic::catch_unwind(AssertUnwindSafe(classify)) {
        Ok((result, audit)) => NoteOutcome::Classified {
            index,
            id,
            result,
            audit,
        },
        Err(payload) => {
            let message = panic_message(&*payload);
            warn!(index, %message, "note could not be classified");
            NoteOutcome::Failed {
                index,
                id,
                label: FailureLabel::Error,
                message,
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "internal classification fault".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_become_failed_outcomes() {
        let outcome = run_isolated(7, Some("N-7".to_string()), || panic!("matcher exploded"));
        match outcome {
            NoteOutcome::Failed {
                index,
                id,
                label,
                message,
            } => {
                assert_eq!(index, 7);
                assert_eq!(id.as_deref(), Some("N-7"));
                assert_eq!(label, FailureLabel::Error);
                assert_eq!(message, "matcher exploded");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn non_string_payloads_get_a_generic_message() {
        let outcome = run_isolated(0, None, || std::panic::panic_any(42_u8));
        assert!(outcome.is_failed());
        assert_eq!(outcome.label_str(), "ERROR");
    }
}
