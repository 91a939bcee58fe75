//! KPI calculations over a base table and a windowed view of it.
//!
//! # Responsibility
//! - Define daily (date range) and monthly (month set) KPI windows.
//! - Compute top enforcer, percent active, period-over-period change and
//!   year-to-date totals.
//!
//! # Invariants
//! - All functions are pure reducers; inputs are never mutated.
//! - Change against a zero previous total is `None`, never inf/NaN.
//! - The monthly preceding window steps back by calendar months, not days.

use crate::model::month::YearMonth;
use crate::model::taxonomy::Roster;
use crate::report::aggregate::{enforcer_leaderboard, Dimension, GroupValue};
use crate::report::table::UnifiedTable;
use chrono::{Datelike, Duration, NaiveDate};

/// The currently selected report scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KpiWindow {
    /// Inclusive calendar date range.
    Daily { start: NaiveDate, end: NaiveDate },
    /// Sorted, de-duplicated month set. Empty means "no month filter".
    Monthly { months: Vec<YearMonth> },
}

impl KpiWindow {
    /// Daily window; bounds are swapped when given in reverse.
    pub fn daily(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self::Daily { start, end }
        } else {
            Self::Daily {
                start: end,
                end: start,
            }
        }
    }

    pub fn monthly(months: impl IntoIterator<Item = YearMonth>) -> Self {
        let mut months: Vec<YearMonth> = months.into_iter().collect();
        months.sort_unstable();
        months.dedup();
        Self::Monthly { months }
    }

    /// Restricts `table` to this window.
    pub fn apply(&self, table: &UnifiedTable) -> UnifiedTable {
        match self {
            Self::Daily { start, end } => table.filter_date_range(*start, *end),
            Self::Monthly { months } if months.is_empty() => table.clone(),
            Self::Monthly { months } => table.filter_months(months),
        }
    }

    /// Window of equal length immediately before this one.
    ///
    /// Daily: the same number of calendar days ending the day before
    /// `start`. Monthly: the same number of months ending the month before
    /// the earliest selected month. `None` for an unfiltered monthly window
    /// or a range that would leave the calendar.
    pub fn preceding(&self) -> Option<Self> {
        match self {
            Self::Daily { start, end } => {
                let span_days = (*end - *start).num_days() + 1;
                let prev_end = start.pred_opt()?;
                let prev_start = start.checked_sub_signed(Duration::try_days(span_days)?)?;
                Some(Self::Daily {
                    start: prev_start,
                    end: prev_end,
                })
            }
            Self::Monthly { months } => {
                let earliest = *months.first()?;
                let mut cursor = earliest.pred();
                let mut block = Vec::with_capacity(months.len());
                for _ in 0..months.len() {
                    block.push(cursor);
                    cursor = cursor.pred();
                }
                block.reverse();
                Some(Self::Monthly { months: block })
            }
        }
    }

    /// Last calendar day covered by the window.
    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Daily { end, .. } => Some(*end),
            Self::Monthly { months } => months.last()?.last_day(),
        }
    }
}

/// Most productive enforcer in a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopEnforcer {
    pub name: String,
    pub quantity: i64,
}

/// Every KPI shown above a report.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    pub total: i64,
    pub top_enforcer: Option<TopEnforcer>,
    pub active_enforcers: usize,
    pub percent_active: f64,
    /// Distinct valid dates (daily) or selected months (monthly).
    pub active_periods: usize,
    pub previous_total: i64,
    pub change_pct: Option<f64>,
    pub ytd_total: i64,
}

/// Selection used for KPIs: an empty selection means the whole roster.
pub fn effective_selection(selection: &[String], roster: &Roster) -> Vec<String> {
    if selection.is_empty() {
        roster.names().to_vec()
    } else {
        selection.to_vec()
    }
}

/// Highest-total enforcer; ties go to the first enforcer in name order.
pub fn top_enforcer(view: &UnifiedTable) -> Option<TopEnforcer> {
    let board = enforcer_leaderboard(view);
    let first = board.rows().first()?;
    let name = match board.key(first, Dimension::Enforcer)? {
        GroupValue::Text(name) => name.clone(),
        other => other.to_string(),
    };
    Some(TopEnforcer {
        name,
        quantity: first.quantity,
    })
}

/// `100 × distinct enforcers in view / selected enforcers`.
pub fn percent_active(view: &UnifiedTable, selection: &[String], roster: &Roster) -> f64 {
    let selected = effective_selection(selection, roster);
    if selected.is_empty() {
        return 0.0;
    }
    let active = view
        .distinct_enforcers()
        .into_iter()
        .filter(|name| selected.iter().any(|known| known.as_str() == *name))
        .count();
    100.0 * active as f64 / selected.len() as f64
}

/// Percent change from `previous` to `current`; `None` when `previous` is 0.
pub fn percent_change(current: i64, previous: i64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    let change = (current - previous) as f64 / previous as f64 * 100.0;
    change.is_finite().then_some(change)
}

/// Totals of `window` and its preceding window over `base`.
pub fn period_totals(base: &UnifiedTable, window: &KpiWindow) -> (i64, i64) {
    let current = window.apply(base).total_quantity();
    let previous = window
        .preceding()
        .map_or(0, |preceding| preceding.apply(base).total_quantity());
    (current, previous)
}

/// Base-table total from January 1 of `end`'s year through `end` inclusive.
pub fn ytd_total(base: &UnifiedTable, end: NaiveDate) -> i64 {
    match NaiveDate::from_ymd_opt(end.year(), 1, 1) {
        Some(year_start) => base.filter_date_range(year_start, end).total_quantity(),
        None => 0,
    }
}

/// Computes every KPI for `window`.
///
/// `base` must already be scoped to the selected enforcers but not to the
/// window.
pub fn compute_kpis(
    base: &UnifiedTable,
    window: &KpiWindow,
    selection: &[String],
    roster: &Roster,
) -> KpiSummary {
    let view = window.apply(base);
    let (total, previous_total) = period_totals(base, window);
    let active_periods = match window {
        KpiWindow::Daily { .. } => view.distinct_dates().len(),
        KpiWindow::Monthly { months } => months.len(),
    };

    KpiSummary {
        total,
        top_enforcer: top_enforcer(&view),
        active_enforcers: view.distinct_enforcers().len(),
        percent_active: percent_active(&view, selection, roster),
        active_periods,
        previous_total,
        change_pct: percent_change(total, previous_total),
        ytd_total: ytd_end(base, window).map_or(0, |end| ytd_total(base, end)),
    }
}

/// End of the YTD span: the window end, or the latest valid date in `base`
/// when a monthly window has no month filter.
fn ytd_end(base: &UnifiedTable, window: &KpiWindow) -> Option<NaiveDate> {
    match window {
        KpiWindow::Monthly { months } if months.is_empty() => {
            base.date_bounds().map(|(_, latest)| latest)
        }
        _ => window.end_date(),
    }
}

/// Renders a change badge: `+12.5%`, `-3.0%`, `0.0%` or `no data`.
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(value) if value > 0.0 => format!("+{value:.1}%"),
        Some(value) => format!("{value:.1}%"),
        None => "no data".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_change, percent_change, KpiWindow};
    use crate::model::month::YearMonth;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_preceding_window_has_equal_length() {
        let window = KpiWindow::daily(day(2024, 5, 10), day(2024, 5, 12));
        assert_eq!(
            window.preceding(),
            Some(KpiWindow::Daily {
                start: day(2024, 5, 7),
                end: day(2024, 5, 9),
            })
        );
    }

    #[test]
    fn monthly_preceding_window_rolls_over_year() {
        let months = ["2024-01", "2024-02"].map(|m| m.parse::<YearMonth>().unwrap());
        let window = KpiWindow::monthly(months);
        let expected = ["2023-11", "2023-12"].map(|m| m.parse::<YearMonth>().unwrap());
        assert_eq!(window.preceding(), Some(KpiWindow::monthly(expected)));
    }

    #[test]
    fn unfiltered_monthly_window_has_no_predecessor() {
        assert_eq!(KpiWindow::monthly(Vec::new()).preceding(), None);
    }

    #[test]
    fn percent_change_is_undefined_for_zero_previous() {
        assert_eq!(percent_change(5, 0), None);
        assert_eq!(percent_change(0, 4), Some(-100.0));
        assert_eq!(format_change(None), "no data");
        assert_eq!(format_change(Some(100.0)), "+100.0%");
        assert_eq!(format_change(Some(-2.5)), "-2.5%");
    }

    #[test]
    fn reversed_daily_bounds_are_normalized() {
        let window = KpiWindow::daily(day(2024, 5, 12), day(2024, 5, 10));
        assert_eq!(window.end_date(), Some(day(2024, 5, 12)));
    }
}
