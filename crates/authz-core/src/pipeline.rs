//! Classification pipeline.
//!
//! raw note -> normalize -> match inclusion and exclusion sets -> resolve
//! -> result + audit record.
//!
//! The pipeline keeps no state between notes. It holds the compiled ruleset
//! behind an `Arc`, so clones are cheap and can be handed to any number of
//! worker threads.

use std::sync::Arc;

use tracing::debug;

use authz_model::{AuditRecord, ClassificationResult, Note, Reason};
use authz_rules::LoadedRuleset;

use crate::compiled::CompiledRuleset;
use crate::evaluator::{CriteriaEvaluator, RuleMatch};
use crate::resolver::resolve;

/// Intermediate evaluation of one note.
#[derive(Debug, Clone)]
struct Evaluation {
    inclusion: Vec<RuleMatch>,
    exclusion: Vec<RuleMatch>,
    reason: Reason,
}

#[derive(Debug, Clone)]
pub struct ClassificationPipeline {
    rules: Arc<CompiledRuleset>,
    evaluator: CriteriaEvaluator,
}

impl ClassificationPipeline {
    pub fn new(ruleset: LoadedRuleset) -> Self {
        Self::from_compiled(Arc::new(CompiledRuleset::compile(ruleset)))
    }

    pub fn from_compiled(rules: Arc<CompiledRuleset>) -> Self {
        let evaluator = CriteriaEvaluator::new(rules.word_mode);
        Self { rules, evaluator }
    }

    pub fn ruleset(&self) -> &CompiledRuleset {
        &self.rules
    }

    pub fn fingerprint(&self) -> &str {
        &self.rules.fingerprint
    }

    pub fn classify(&self, note: &Note) -> ClassificationResult {
        let evaluation = self.evaluate(note);
        self.result(&evaluation)
    }

    /// Classify a note and build its audit record.
    pub fn classify_with_audit(
        &self,
        index: usize,
        note_id: Option<&str>,
        note: &Note,
    ) -> (ClassificationResult, AuditRecord) {
        let evaluation = self.evaluate(note);
        let result = self.result(&evaluation);

        let mut hits = CriteriaEvaluator::hits(&self.rules.inclusion, &evaluation.inclusion);
        hits.extend(CriteriaEvaluator::hits(
            &self.rules.exclusion,
            &evaluation.exclusion,
        ));
        let audit = AuditRecord {
            index,
            note_id: note_id.map(str::to_string),
            run_type: note.run_type(),
            label: result.label(),
            reason: result.reason(),
            ruleset: self.rules.name.clone(),
            fingerprint: self.rules.fingerprint.clone(),
            hits,
        };
        debug!(
            index,
            label = %audit.label,
            reason = %audit.reason,
            "audit record built"
        );
        (result, audit)
    }

    fn evaluate(&self, note: &Note) -> Evaluation {
        let normalized = self.rules.normalizer.analyze(note.text());
        let inclusion = self.evaluator.evaluate(&normalized, &self.rules.inclusion);
        let exclusion = self.evaluator.evaluate(&normalized, &self.rules.exclusion);
        let reason = resolve(!inclusion.is_empty(), !exclusion.is_empty(), note.run_type());
        debug!(
            run_type = %note.run_type(),
            inclusion_hits = inclusion.len(),
            exclusion_hits = exclusion.len(),
            label = %reason.label(),
            %reason,
            "note classified"
        );
        Evaluation {
            inclusion,
            exclusion,
            reason,
        }
    }

    fn result(&self, evaluation: &Evaluation) -> ClassificationResult {
        ClassificationResult::new(
            evaluation.reason,
            CriteriaEvaluator::matched_rules(&self.rules.inclusion, &evaluation.inclusion),
            CriteriaEvaluator::matched_rules(&self.rules.exclusion, &evaluation.exclusion),
        )
    }
}
