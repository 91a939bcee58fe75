//! Stored cell values and the activity record written by the entry form.
//!
//! # Invariants
//! - `RECORD_HEADERS` is the header contract of every enforcer table.
//! - Quantity is written as a number cell, never as text.
//! - Dates are written as `YYYY-MM-DD` text.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const HEADER_DATE: &str = "Date";
pub const HEADER_ENFORCER: &str = "Enforcer";
pub const HEADER_CATEGORY: &str = "Category";
pub const HEADER_ACTIVITY: &str = "Activity";
pub const HEADER_QUANTITY: &str = "Quantity";
pub const HEADER_REMARKS: &str = "Remarks";

/// Fixed header row of every enforcer table, in column order.
pub const RECORD_HEADERS: [&str; 6] = [
    HEADER_DATE,
    HEADER_ENFORCER,
    HEADER_CATEGORY,
    HEADER_ACTIVITY,
    HEADER_QUANTITY,
    HEADER_REMARKS,
];

/// Date format used when writing records.
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

/// One typed cell of a record table.
///
/// Serialized untagged so stored rows stay plain JSON arrays
/// (`["2024-05-01", "Enforcer 1", ..., 3, ""]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Integer(_) | Self::Float(_) => false,
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// A row read back from a table, keyed by header name.
pub type RecordMap = BTreeMap<String, CellValue>;

/// Returns the header row as cells.
pub fn header_cells() -> Vec<CellValue> {
    RECORD_HEADERS.iter().map(|header| CellValue::from(*header)).collect()
}

/// One submitted measurement, as written by the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub enforcer: String,
    pub category: String,
    pub activity: String,
    pub quantity: u32,
    pub remarks: String,
}

impl ActivityRecord {
    /// Converts the record into cells in `RECORD_HEADERS` order.
    pub fn to_cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::Text(self.date.format(RECORD_DATE_FORMAT).to_string()),
            CellValue::Text(self.enforcer.clone()),
            CellValue::Text(self.category.clone()),
            CellValue::Text(self.activity.clone()),
            CellValue::Integer(i64::from(self.quantity)),
            CellValue::Text(self.remarks.clone()),
        ]
    }
}
