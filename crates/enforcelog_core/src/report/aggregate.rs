//! Sum-of-quantity grouping over a unified table.
//!
//! # Invariants
//! - Group keys sort ascending; a null date or month is its own group and
//!   sorts first, so no row is ever dropped.
//! - The sum over all groups equals the table's total quantity.

use crate::model::month::YearMonth;
use crate::model::record::{
    HEADER_ACTIVITY, HEADER_CATEGORY, HEADER_DATE, HEADER_ENFORCER, HEADER_QUANTITY,
    RECORD_DATE_FORMAT,
};
use crate::report::table::{UnifiedRow, UnifiedTable, COLUMN_CATEGORY_SHORT, COLUMN_MONTH};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A grouping key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Date,
    Month,
    Enforcer,
    Category,
    CategoryShort,
    Activity,
}

impl Dimension {
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Date => HEADER_DATE,
            Self::Month => COLUMN_MONTH,
            Self::Enforcer => HEADER_ENFORCER,
            Self::Category => HEADER_CATEGORY,
            Self::CategoryShort => COLUMN_CATEGORY_SHORT,
            Self::Activity => HEADER_ACTIVITY,
        }
    }

    fn value_of(self, row: &UnifiedRow) -> GroupValue {
        match self {
            Self::Date => GroupValue::Date(row.date),
            Self::Month => GroupValue::Month(row.month),
            Self::Enforcer => GroupValue::Text(row.enforcer.clone()),
            Self::Category => GroupValue::Text(row.category.clone()),
            Self::CategoryShort => GroupValue::Text(row.category_short.clone()),
            Self::Activity => GroupValue::Text(row.activity.clone()),
        }
    }
}

/// One key cell of a summary row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    Date(Option<NaiveDate>),
    Month(Option<YearMonth>),
    Text(String),
}

impl Display for GroupValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(Some(date)) => write!(f, "{}", date.format(RECORD_DATE_FORMAT)),
            Self::Month(Some(month)) => write!(f, "{month}"),
            Self::Date(None) | Self::Month(None) => Ok(()),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub keys: Vec<GroupValue>,
    pub quantity: i64,
}

/// Result of a grouping: key columns plus a summed `Quantity` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    dimensions: Vec<Dimension>,
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Key column names followed by `Quantity`.
    pub fn columns(&self) -> Vec<&'static str> {
        self.dimensions
            .iter()
            .map(|dimension| dimension.column_name())
            .chain(std::iter::once(HEADER_QUANTITY))
            .collect()
    }

    pub fn total_quantity(&self) -> i64 {
        self.rows.iter().map(|row| row.quantity).sum()
    }

    /// Value of `dimension` in `row`, if the table is keyed by it.
    pub fn key<'a>(&self, row: &'a SummaryRow, dimension: Dimension) -> Option<&'a GroupValue> {
        let index = self.dimensions.iter().position(|known| *known == dimension)?;
        row.keys.get(index)
    }

    /// Stable sort by quantity, largest first; equal totals keep key order.
    pub fn sorted_by_quantity_desc(mut self) -> Self {
        self.rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        self
    }
}

/// Groups `table` by `dimensions` and sums quantity per group.
pub fn group_sum(table: &UnifiedTable, dimensions: &[Dimension]) -> SummaryTable {
    let mut groups: BTreeMap<Vec<GroupValue>, i64> = BTreeMap::new();
    for row in table.rows() {
        let key = dimensions
            .iter()
            .map(|dimension| dimension.value_of(row))
            .collect();
        *groups.entry(key).or_insert(0) += row.quantity;
    }

    SummaryTable {
        dimensions: dimensions.to_vec(),
        rows: groups
            .into_iter()
            .map(|(keys, quantity)| SummaryRow { keys, quantity })
            .collect(),
    }
}

/// Full daily detail: (date, enforcer, category, activity).
pub fn daily_detail(table: &UnifiedTable) -> SummaryTable {
    group_sum(
        table,
        &[
            Dimension::Date,
            Dimension::Enforcer,
            Dimension::Category,
            Dimension::Activity,
        ],
    )
}

/// Daily per-enforcer totals: (date, enforcer).
pub fn daily_enforcer_totals(table: &UnifiedTable) -> SummaryTable {
    group_sum(table, &[Dimension::Date, Dimension::Enforcer])
}

/// Totals per day, the daily line chart input.
pub fn daily_totals(table: &UnifiedTable) -> SummaryTable {
    group_sum(table, &[Dimension::Date])
}

/// Category breakdown stacked by enforcer: (category, enforcer).
pub fn category_enforcer_breakdown(table: &UnifiedTable) -> SummaryTable {
    group_sum(table, &[Dimension::Category, Dimension::Enforcer])
}

/// Monthly detail: (month, enforcer, category, activity).
pub fn monthly_detail(table: &UnifiedTable) -> SummaryTable {
    group_sum(
        table,
        &[
            Dimension::Month,
            Dimension::Enforcer,
            Dimension::Category,
            Dimension::Activity,
        ],
    )
}

/// Monthly breakdown: (month, category).
pub fn monthly_category_breakdown(table: &UnifiedTable) -> SummaryTable {
    group_sum(table, &[Dimension::Month, Dimension::Category])
}

pub fn monthly_totals(table: &UnifiedTable) -> SummaryTable {
    group_sum(table, &[Dimension::Month])
}

/// Totals per month stacked by enforcer: (month, enforcer).
pub fn monthly_enforcer_totals(table: &UnifiedTable) -> SummaryTable {
    group_sum(table, &[Dimension::Month, Dimension::Enforcer])
}

/// Category by month stacked by enforcer: (month, category, enforcer).
pub fn monthly_category_enforcer(table: &UnifiedTable) -> SummaryTable {
    group_sum(
        table,
        &[Dimension::Month, Dimension::Category, Dimension::Enforcer],
    )
}

/// Enforcer totals, largest first.
pub fn enforcer_leaderboard(table: &UnifiedTable) -> SummaryTable {
    group_sum(table, &[Dimension::Enforcer]).sorted_by_quantity_desc()
}

/// Category totals, largest first; the share (donut) chart input.
pub fn category_share(table: &UnifiedTable) -> SummaryTable {
    group_sum(table, &[Dimension::Category]).sorted_by_quantity_desc()
}

/// Short category × enforcer heatmap input.
pub fn category_heatmap(table: &UnifiedTable) -> SummaryTable {
    group_sum(table, &[Dimension::CategoryShort, Dimension::Enforcer])
}
