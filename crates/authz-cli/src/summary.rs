use std::io::{self, Write};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use authz_core::AuditTrail;
use authz_model::{CriteriaRole, Label, Reason, RuleHit};
use authz_rules::LoadedRuleset;

use crate::commands::{ClassifyReport, Explanation};

/// Rules listed in the hit table of a classify summary.
pub const TOP_RULES: usize = 10;

const REASONS: [Reason; 5] = [
    Reason::Conflict,
    Reason::Exclusion,
    Reason::Inclusion,
    Reason::DefaultTest,
    Reason::DefaultProduction,
];

pub fn write_classify_summary<W: Write>(mut out: W, report: &ClassifyReport) -> io::Result<()> {
    writeln!(
        out,
        "Ruleset: {} ({})",
        report.ruleset,
        short_fingerprint(&report.fingerprint)
    )?;
    writeln!(out, "Notes: {}", report.trail.total())?;
    if let Some(path) = &report.output {
        writeln!(out, "Results: {}", path.display())?;
    }
    if let Some(path) = &report.audit {
        writeln!(out, "Audit: {}", path.display())?;
    }
    writeln!(out, "{}", outcome_table(&report.trail))?;
    if report.trail.rule_hits().next().is_some() {
        writeln!(out)?;
        writeln!(out, "Rule hits:")?;
        writeln!(out, "{}", rule_table(&report.trail, TOP_RULES))?;
    }
    if report.has_failures() {
        writeln!(
            out,
            "{} note(s) could not be classified; see the ERROR rows.",
            report.trail.failed()
        )?;
    }
    Ok(())
}

/// Label and reason counts.
pub fn outcome_table(trail: &AuditTrail) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Reason"),
        header_cell("Label"),
        header_cell("Notes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for reason in REASONS {
        let count = trail.reason_count(reason);
        table.add_row(vec![
            Cell::new(reason.as_str()),
            label_cell(reason.label()),
            count_cell(count),
        ]);
    }
    if trail.failed() > 0 {
        table.add_row(vec![
            Cell::new("failed"),
            Cell::new("ERROR")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            count_cell(trail.failed()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(trail.total()).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn rule_table(trail: &AuditTrail, limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Set"),
        header_cell("#"),
        header_cell("Pattern"),
        header_cell("Kind"),
        header_cell("Notes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for hit in trail.top_rules(limit) {
        table.add_row(vec![
            role_cell(hit.set),
            Cell::new(hit.position),
            Cell::new(&hit.pattern),
            Cell::new(hit.kind.as_str()),
            Cell::new(hit.notes),
        ]);
    }
    table
}

/// Every rule of a ruleset, inclusion set first.
pub fn ruleset_table(ruleset: &LoadedRuleset) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Set"),
        header_cell("#"),
        header_cell("Pattern"),
        header_cell("Kind"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for set in [&ruleset.inclusion, &ruleset.exclusion] {
        for (position, rule) in set.iter().enumerate() {
            table.add_row(vec![
                role_cell(set.role()),
                Cell::new(position),
                Cell::new(rule.pattern()),
                Cell::new(rule.kind().as_str()),
            ]);
        }
    }
    table
}

pub fn write_check_summary<W: Write>(mut out: W, ruleset: &LoadedRuleset) -> io::Result<()> {
    match &ruleset.version {
        Some(version) => writeln!(out, "Ruleset: {} {version}", ruleset.name)?,
        None => writeln!(out, "Ruleset: {}", ruleset.name)?,
    }
    if let Some(path) = &ruleset.source {
        writeln!(out, "Source: {}", path.display())?;
    }
    writeln!(out, "Fingerprint: {}", ruleset.fingerprint)?;
    writeln!(out, "Word matching: {}", ruleset.word_mode.as_str())?;
    writeln!(
        out,
        "Rules: {} inclusion, {} exclusion",
        ruleset.inclusion.len(),
        ruleset.exclusion.len()
    )?;
    writeln!(out, "{}", ruleset_table(ruleset))
}

/// Plain-text lines describing one classified note.
pub fn explain_lines(explanation: &Explanation) -> Vec<String> {
    let result = &explanation.result;
    let mut lines = vec![
        format!("{} ({})", result.label().as_str(), result.reason().as_str()),
        format!(
            "ruleset: {} ({})",
            explanation.ruleset,
            short_fingerprint(&explanation.fingerprint)
        ),
    ];
    lines.extend(explanation.audit.hits.iter().map(hit_line));
    lines
}

fn hit_line(hit: &RuleHit) -> String {
    let spans: Vec<String> = hit
        .spans
        .iter()
        .map(|span| format!("{}..{}", span.start, span.end))
        .collect();
    format!(
        "{} #{}: {} ({}) at {}",
        hit.set.as_str(),
        hit.position,
        hit.pattern,
        hit.kind.as_str(),
        spans.join(", ")
    )
}

fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: Label) -> Cell {
    let color = match label {
        Label::True => Color::Green,
        Label::False => Color::Red,
        Label::Unk => Color::Yellow,
    };
    Cell::new(label.as_str()).fg(color)
}

fn role_cell(role: CriteriaRole) -> Cell {
    match role {
        CriteriaRole::Inclusion => Cell::new(role.as_str()).fg(Color::Green),
        CriteriaRole::Exclusion => Cell::new(role.as_str()).fg(Color::Red),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints_are_shortened_safely() {
        assert_eq!(short_fingerprint("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_fingerprint("abc"), "abc");
    }
}
