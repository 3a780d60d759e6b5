//! Notes CSV input.
//!
//! A notes file has a header row with a `text` column and optional `id` and
//! `run_type` columns. Header names are matched case-insensitively. Rows are
//! numbered from 1, counting data rows only. A row too short to reach the
//! `text` column is a blank note.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord};

use authz_core::BatchNote;
use authz_model::{Note, RunType};

const TEXT_COLUMN: &str = "text";
const ID_COLUMN: &str = "id";
const RUN_TYPE_COLUMN: &str = "run_type";

/// Read a notes CSV file. Rows without a `run_type` use `default_run_type`.
pub fn read_notes(path: &Path, default_run_type: RunType) -> Result<Vec<BatchNote>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open notes: {}", path.display()))?;
    parse_notes(file, default_run_type)
        .with_context(|| format!("read notes: {}", path.display()))
}

pub fn parse_notes<R: Read>(reader: R, default_run_type: RunType) -> Result<Vec<BatchNote>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::locate(reader.headers().context("read header row")?)?;

    let mut notes = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        let record = record.with_context(|| format!("row {row}"))?;
        let text = record.get(columns.text).unwrap_or_default();
        let run_type = match columns.field(&record, columns.run_type) {
            Some(value) => value
                .parse::<RunType>()
                .with_context(|| format!("row {row}: invalid run_type"))?,
            None => default_run_type,
        };
        let mut note = BatchNote::new(index, Note::new(text, run_type));
        if let Some(id) = columns.field(&record, columns.id) {
            note = note.with_id(id);
        }
        notes.push(note);
    }
    Ok(notes)
}

struct Columns {
    text: usize,
    id: Option<usize>,
    run_type: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| {
            headers.iter().position(|header| {
                header
                    .trim_matches('\u{feff}')
                    .trim()
                    .eq_ignore_ascii_case(name)
            })
        };
        let Some(text) = position(TEXT_COLUMN) else {
            bail!("notes file has no `{TEXT_COLUMN}` column");
        };
        Ok(Self {
            text,
            id: position(ID_COLUMN),
            run_type: position(RUN_TYPE_COLUMN),
        })
    }

    /// Trimmed, non-empty value of an optional column.
    fn field<'r>(&self, record: &'r StringRecord, column: Option<usize>) -> Option<&'r str> {
        column
            .and_then(|column| record.get(column))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_text_id_and_run_type() {
        let input = "id,text,run_type\nN-1,Claim approved,test\nN-2,Denied,\n";
        let notes = parse_notes(input.as_bytes(), RunType::Production).unwrap();

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].index, 0);
        assert_eq!(notes[0].id.as_deref(), Some("N-1"));
        assert_eq!(notes[0].note.text(), "Claim approved");
        assert_eq!(notes[0].note.run_type(), RunType::Test);
        assert_eq!(notes[1].note.run_type(), RunType::Production);
    }

    #[test]
    fn text_only_files_are_accepted() {
        let input = "\u{feff}Text\nfirst\n\"\"\n";
        let notes = parse_notes(input.as_bytes(), RunType::Test).unwrap();

        assert_eq!(notes.len(), 2);
        assert!(notes[0].id.is_none());
        assert!(notes[1].note.is_blank());
        assert_eq!(notes[1].note.run_type(), RunType::Test);
    }

    #[test]
    fn short_row_is_a_blank_note() {
        let input = "id,run_type,text\nN-1,test,claim denied\nN-2,test\n";
        let notes = parse_notes(input.as_bytes(), RunType::Production).unwrap();

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].id.as_deref(), Some("N-2"));
        assert!(notes[1].note.is_blank());
        assert_eq!(notes[1].note.run_type(), RunType::Test);
    }

    #[test]
    fn missing_text_column_is_an_error() {
        let error = parse_notes("id,body\n1,x\n".as_bytes(), RunType::Test).unwrap_err();
        assert!(error.to_string().contains("`text`"));
    }

    #[test]
    fn bad_run_type_names_the_row() {
        let input = "text,run_type\nok,prod\nbad,staging\n";
        let error = parse_notes(input.as_bytes(), RunType::Test).unwrap_err();
        assert_eq!(error.to_string(), "row 2: invalid run_type");
        assert!(format!("{error:#}").contains("staging"));
    }
}
