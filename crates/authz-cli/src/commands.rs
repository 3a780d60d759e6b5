use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use authz_core::{AuditTrail, ClassificationPipeline};
use authz_model::{AuditRecord, ClassificationResult, Note, NoteOutcome, RunType};
use authz_rules::{LoadedRuleset, load_ruleset, resolve_rules_path};

use crate::ingest::read_notes;
use crate::output::{OutputFormat, write_audit, write_outcomes};

/// Inputs of a `classify` run.
#[derive(Debug, Clone)]
pub struct ClassifyRequest {
    pub notes: PathBuf,
    pub rules: Option<PathBuf>,
    pub run_type: RunType,
    /// Results go to stdout when unset.
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub audit: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ClassifyReport {
    pub ruleset: String,
    pub fingerprint: String,
    pub output: Option<PathBuf>,
    pub audit: Option<PathBuf>,
    pub outcomes: Vec<NoteOutcome>,
    pub trail: AuditTrail,
}

impl ClassifyReport {
    pub fn has_failures(&self) -> bool {
        self.trail.failed() > 0
    }
}

#[derive(Debug)]
pub struct Explanation {
    pub ruleset: String,
    pub fingerprint: String,
    pub result: ClassificationResult,
    pub audit: AuditRecord,
}

/// Exit code of a finished `classify` run: 1 when a note failed or the
/// summary could not be written.
pub fn classify_exit_code(report: &ClassifyReport, summary_written: bool) -> i32 {
    if summary_written && !report.has_failures() {
        0
    } else {
        1
    }
}

/// Resolve and load the rules file.
pub fn load_rules(explicit: Option<&Path>) -> Result<LoadedRuleset> {
    let path = resolve_rules_path(explicit);
    load_ruleset(&path).with_context(|| format!("load rules: {}", path.display()))
}

pub fn run_classify(request: &ClassifyRequest) -> Result<ClassifyReport> {
    let pipeline = ClassificationPipeline::new(load_rules(request.rules.as_deref())?);
    let notes = read_notes(&request.notes, request.run_type)?;
    let outcomes = pipeline.classify_batch(&notes);

    match &request.output {
        Some(path) => {
            let writer = create(path)?;
            write_outcomes(writer, &outcomes, request.format)
                .with_context(|| format!("write results: {}", path.display()))?;
        }
        None => write_outcomes(io::stdout().lock(), &outcomes, request.format)?,
    }
    if let Some(path) = &request.audit {
        write_audit(create(path)?, &outcomes)
            .with_context(|| format!("write audit: {}", path.display()))?;
    }

    let trail = AuditTrail::from_outcomes(&outcomes);
    Ok(ClassifyReport {
        ruleset: pipeline.ruleset().name.clone(),
        fingerprint: pipeline.fingerprint().to_string(),
        output: request.output.clone(),
        audit: request.audit.clone(),
        outcomes,
        trail,
    })
}

pub fn run_explain(text: &str, rules: Option<&Path>, run_type: RunType) -> Result<Explanation> {
    let pipeline = ClassificationPipeline::new(load_rules(rules)?);
    let (result, audit) = pipeline.classify_with_audit(0, None, &Note::new(text, run_type));
    Ok(Explanation {
        ruleset: pipeline.ruleset().name.clone(),
        fingerprint: pipeline.fingerprint().to_string(),
        result,
        audit,
    })
}

pub fn run_check(rules: Option<&Path>) -> Result<LoadedRuleset> {
    load_rules(rules)
}

fn create(path: &Path) -> Result<impl Write> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
