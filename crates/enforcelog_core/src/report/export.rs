//! Comma-separated export of unified, summary and raw tables.
//!
//! Fields containing `,`, `"`, CR or LF are quoted with doubled quotes.
//! Cells starting with `=`, `+`, `-` or `@` get a leading `'` so that
//! spreadsheet tools do not evaluate them as formulas.

use crate::model::record::{CellValue, RECORD_DATE_FORMAT};
use crate::report::aggregate::SummaryTable;
use crate::report::table::{UnifiedTable, DERIVED_COLUMNS};

/// Unified rows: the six record columns, then `Month` and `CategoryShort`.
pub fn unified_to_csv(table: &UnifiedTable) -> String {
    let header = table.columns().into_iter().chain(DERIVED_COLUMNS);
    let mut lines = vec![join_fields(header.map(str::to_string))];

    for row in table.rows() {
        let fields = [
            row.date
                .map(|date| date.format(RECORD_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            row.enforcer.clone(),
            row.category.clone(),
            row.activity.clone(),
            row.quantity.to_string(),
            row.remarks.clone(),
            row.month.map(|month| month.to_string()).unwrap_or_default(),
            row.category_short.clone(),
        ];
        lines.push(join_fields(fields.into_iter()));
    }
    finish(lines)
}

/// Summary rows: key columns, then `Quantity`.
pub fn summary_to_csv(summary: &SummaryTable) -> String {
    let mut lines = vec![join_fields(
        summary.columns().into_iter().map(str::to_string),
    )];
    for row in summary.rows() {
        let fields = row
            .keys
            .iter()
            .map(ToString::to_string)
            .chain(std::iter::once(row.quantity.to_string()));
        lines.push(join_fields(fields));
    }
    finish(lines)
}

/// Raw table rows exactly as stored, header row included.
pub fn values_to_csv(values: &[Vec<CellValue>]) -> String {
    let lines = values
        .iter()
        .map(|row| join_fields(row.iter().map(ToString::to_string)))
        .collect();
    finish(lines)
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn join_fields(fields: impl Iterator<Item = String>) -> String {
    fields
        .map(|field| csv_escape(&field))
        .collect::<Vec<_>>()
        .join(",")
}

fn should_neutralize(value: &str) -> bool {
    matches!(value.trim_start().chars().next(), Some('=' | '+' | '-' | '@'))
}

fn csv_escape(value: &str) -> String {
    let safe = if should_neutralize(value) {
        format!("'{value}")
    } else {
        value.to_string()
    };
    if safe.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", safe.replace('"', "\"\""))
    } else {
        safe
    }
}
