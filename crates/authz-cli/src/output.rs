//! Result and audit writers.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use authz_model::{AuditRecord, NoteOutcome, TermRule};

/// Separator between patterns in the CSV `matched_*` columns.
pub const PATTERN_SEPARATOR: &str = "|";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Serialize)]
struct OutcomeRow<'a> {
    index: usize,
    id: &'a str,
    label: &'a str,
    reason: &'a str,
    matched_inclusion: String,
    matched_exclusion: String,
}

impl<'a> OutcomeRow<'a> {
    fn from_outcome(outcome: &'a NoteOutcome) -> Self {
        let (reason, matched_inclusion, matched_exclusion) = match outcome.result() {
            Some(result) => (
                result.reason().as_str(),
                join_patterns(result.matched_inclusion()),
                join_patterns(result.matched_exclusion()),
            ),
            None => ("", String::new(), String::new()),
        };
        Self {
            index: outcome.index(),
            id: outcome.id().unwrap_or_default(),
            label: outcome.label_str(),
            reason,
            matched_inclusion,
            matched_exclusion,
        }
    }
}

fn join_patterns(rules: &[TermRule]) -> String {
    rules
        .iter()
        .map(TermRule::pattern)
        .collect::<Vec<_>>()
        .join(PATTERN_SEPARATOR)
}

/// Write outcomes in input order.
pub fn write_outcomes<W: Write>(
    writer: W,
    outcomes: &[NoteOutcome],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(writer, outcomes),
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for outcome in outcomes {
                csv.serialize(OutcomeRow::from_outcome(outcome))
                    .with_context(|| format!("write row for note {}", outcome.index()))?;
            }
            csv.flush().context("flush csv output")?;
            Ok(())
        }
    }
}

/// Write the audit records of every classified note as a JSON array.
pub fn write_audit<W: Write>(writer: W, outcomes: &[NoteOutcome]) -> Result<()> {
    let records: Vec<&AuditRecord> = outcomes.iter().filter_map(NoteOutcome::audit).collect();
    write_json(writer, &records)
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value).context("serialize json output")?;
    writeln!(writer).context("write json output")?;
    writer.flush().context("flush json output")?;
    Ok(())
}
