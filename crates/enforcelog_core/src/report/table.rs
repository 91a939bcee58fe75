//! Unified record table: every enforcer's rows, coerced and canonicalized.
//!
//! # Responsibility
//! - Coerce stored cells into typed rows (quantity, date, month bucket).
//! - Canonicalize category labels at read time.
//! - Load all roster tables from the record store into one snapshot.
//!
//! # Invariants
//! - Coercion never fails: bad quantities become 0, bad dates become `None`.
//! - An empty snapshot still reports the six record columns.
//! - Filtering returns new tables; a snapshot is never mutated.

use crate::model::month::YearMonth;
use crate::model::record::{
    CellValue, RecordMap, HEADER_ACTIVITY, HEADER_CATEGORY, HEADER_DATE, HEADER_ENFORCER,
    HEADER_QUANTITY, HEADER_REMARKS, RECORD_HEADERS,
};
use crate::model::taxonomy::Roster;
use crate::repo::table_repo::{RepoResult, TableRepository};
use crate::report::canonical::{canonicalize_category, short_category_label};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use std::collections::BTreeSet;
use std::time::Instant;

pub const COLUMN_MONTH: &str = "Month";
pub const COLUMN_CATEGORY_SHORT: &str = "CategoryShort";

/// Columns derived from the record columns during loading.
pub const DERIVED_COLUMNS: [&str; 2] = [COLUMN_MONTH, COLUMN_CATEGORY_SHORT];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// One coerced activity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedRow {
    /// `None` marks an unparseable or missing date.
    pub date: Option<NaiveDate>,
    pub month: Option<YearMonth>,
    pub enforcer: String,
    /// Canonical category label.
    pub category: String,
    pub category_short: String,
    pub activity: String,
    pub quantity: i64,
    pub remarks: String,
}

impl UnifiedRow {
    /// Coerces one header-keyed record; missing keys read as empty cells.
    pub fn from_record(record: &RecordMap) -> Self {
        let cell = |key: &str| record.get(key).cloned().unwrap_or_default();
        let date = coerce_date(&cell(HEADER_DATE));
        let category = canonicalize_category(&cell(HEADER_CATEGORY).to_string());
        Self {
            date,
            month: date.map(YearMonth::from_date),
            enforcer: cell(HEADER_ENFORCER).to_string().trim().to_string(),
            category_short: short_category_label(&category),
            category,
            activity: cell(HEADER_ACTIVITY).to_string(),
            quantity: coerce_quantity(&cell(HEADER_QUANTITY)),
            remarks: cell(HEADER_REMARKS).to_string(),
        }
    }
}

/// Immutable table of unified rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedTable {
    rows: Vec<UnifiedRow>,
}

impl UnifiedTable {
    pub fn new(rows: Vec<UnifiedRow>) -> Self {
        Self { rows }
    }

    /// Builds a table from header-keyed records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RecordMap>) -> Self {
        Self::new(records.into_iter().map(UnifiedRow::from_record).collect())
    }

    /// The record column set, present even when the table has no rows.
    pub fn columns(&self) -> [&'static str; 6] {
        RECORD_HEADERS
    }

    pub fn rows(&self) -> &[UnifiedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_quantity(&self) -> i64 {
        self.rows.iter().map(|row| row.quantity).sum()
    }

    /// Rows whose enforcer is in `names`.
    pub fn filter_enforcers(&self, names: &[String]) -> Self {
        self.filter(|row| names.iter().any(|name| *name == row.enforcer))
    }

    /// Rows dated within `start..=end`; null dates never match.
    pub fn filter_date_range(&self, start: NaiveDate, end: NaiveDate) -> Self {
        self.filter(|row| row.date.is_some_and(|date| start <= date && date <= end))
    }

    /// Rows whose month bucket is one of `months`; null months never match.
    pub fn filter_months(&self, months: &[YearMonth]) -> Self {
        self.filter(|row| row.month.is_some_and(|month| months.contains(&month)))
    }

    pub fn filter(&self, predicate: impl Fn(&UnifiedRow) -> bool) -> Self {
        Self::new(self.rows.iter().filter(|row| predicate(row)).cloned().collect())
    }

    pub fn distinct_enforcers(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|row| row.enforcer.as_str()).collect()
    }

    pub fn distinct_dates(&self) -> BTreeSet<NaiveDate> {
        self.rows.iter().filter_map(|row| row.date).collect()
    }

    /// Sorted distinct non-null months.
    pub fn months(&self) -> Vec<YearMonth> {
        self.rows
            .iter()
            .filter_map(|row| row.month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest valid date, if any row has one.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.distinct_dates();
        Some((*dates.first()?, *dates.last()?))
    }
}

/// Coerces a quantity cell to a non-negative integer.
///
/// Fractions truncate toward zero, negatives clamp to zero and anything
/// unparseable becomes zero.
pub fn coerce_quantity(cell: &CellValue) -> i64 {
    let value = match cell {
        CellValue::Empty => None,
        CellValue::Integer(value) => Some(*value),
        CellValue::Float(value) => float_to_count(*value),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_count))
        }
    };
    match value {
        Some(count) => count.max(0),
        None => {
            debug!("event=coerce_quantity module=report status=fallback cell={cell:?}");
            0
        }
    }
}

/// Coerces a date cell; only text cells in a known format parse.
pub fn coerce_date(cell: &CellValue) -> Option<NaiveDate> {
    let CellValue::Text(text) = cell else {
        return None;
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .map(|datetime| datetime.date())
            })
        });
    if parsed.is_none() {
        debug!("event=coerce_date module=report status=fallback value={trimmed}");
    }
    parsed
}

fn float_to_count(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated >= i64::MAX as f64 {
        Some(i64::MAX)
    } else if truncated <= i64::MIN as f64 {
        Some(i64::MIN)
    } else {
        Some(truncated as i64)
    }
}

/// Loads every roster table into one unified snapshot.
///
/// Missing tables are skipped, never created.
pub fn load_unified<R: TableRepository + ?Sized>(
    repo: &R,
    roster: &Roster,
) -> RepoResult<UnifiedTable> {
    let started_at = Instant::now();
    let mut rows = Vec::new();
    let mut tables_read = 0usize;

    for name in roster.names() {
        let Some(table) = repo.find_table(name)? else {
            debug!("event=load_unified module=report status=skip table={name} reason=missing");
            continue;
        };
        let records = repo.read_records(&table)?;
        rows.extend(records.iter().map(UnifiedRow::from_record));
        tables_read += 1;
    }

    info!(
        "event=load_unified module=report status=ok tables={} rows={} duration_ms={}",
        tables_read,
        rows.len(),
        started_at.elapsed().as_millis()
    );
    Ok(UnifiedTable::new(rows))
}
