//! Daily and monthly report views built from one snapshot.
//!
//! # Responsibility
//! - Scope the snapshot to the effective enforcer selection.
//! - Resolve the daily date range or monthly month selection.
//! - Produce KPIs plus every chart input table for the renderer.
//!
//! # Invariants
//! - "No data" states are returned as values, never as errors.
//! - KPIs compare against the scoped snapshot, not the windowed view.

use crate::model::month::YearMonth;
use crate::model::taxonomy::Roster;
use crate::report::aggregate::{
    category_enforcer_breakdown, category_heatmap, category_share, daily_enforcer_totals,
    daily_totals, enforcer_leaderboard, monthly_category_breakdown, monthly_category_enforcer,
    monthly_enforcer_totals, monthly_totals, SummaryTable,
};
use crate::report::kpi::{compute_kpis, effective_selection, KpiSummary, KpiWindow};
use crate::report::table::UnifiedTable;
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

/// Why a report has nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataReason {
    EmptySelection,
    NoValidDates,
    EmptyDateRange,
    EmptyMonthSelection,
}

impl Display for NoDataReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::EmptySelection => "No data to display for the current selection.",
            Self::NoValidDates => "No valid dates found in the data.",
            Self::EmptyDateRange => "No data in the selected date range.",
            Self::EmptyMonthSelection => "No data for the selected month(s).",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome<T> {
    Ready(T),
    NoData(NoDataReason),
}

impl<T> ReportOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(report) => Some(report),
            Self::NoData(_) => None,
        }
    }
}

/// Daily range request; open bounds default to the data's first/last date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyRequest {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    /// Earliest and latest valid date of the scoped data.
    pub available: (NaiveDate, NaiveDate),
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub kpis: KpiSummary,
    pub daily_totals: SummaryTable,
    /// (date, enforcer) totals.
    pub enforcer_daily_totals: SummaryTable,
    pub category_breakdown: SummaryTable,
    pub leaderboard: SummaryTable,
    pub category_share: SummaryTable,
    pub heatmap: SummaryTable,
    pub rows: UnifiedTable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub available_months: Vec<YearMonth>,
    pub selected_months: Vec<YearMonth>,
    pub kpis: KpiSummary,
    pub month_totals: SummaryTable,
    pub enforcer_totals: SummaryTable,
    pub category_enforcer: SummaryTable,
    pub category_breakdown: SummaryTable,
    pub category_share: SummaryTable,
    pub rows: UnifiedTable,
}

/// Builds the daily report for `selection` (empty means whole roster).
pub fn build_daily_report(
    snapshot: &UnifiedTable,
    selection: &[String],
    roster: &Roster,
    request: DailyRequest,
) -> ReportOutcome<DailyReport> {
    let scoped = snapshot.filter_enforcers(&effective_selection(selection, roster));
    if scoped.is_empty() {
        return ReportOutcome::NoData(NoDataReason::EmptySelection);
    }
    let Some((min_date, max_date)) = scoped.date_bounds() else {
        return ReportOutcome::NoData(NoDataReason::NoValidDates);
    };

    let start = request.from.unwrap_or(min_date).max(min_date);
    let end = request.to.unwrap_or(max_date).min(max_date);
    if start > end {
        return ReportOutcome::NoData(NoDataReason::EmptyDateRange);
    }

    let window = KpiWindow::daily(start, end);
    let view = window.apply(&scoped);
    if view.is_empty() {
        return ReportOutcome::NoData(NoDataReason::EmptyDateRange);
    }

    ReportOutcome::Ready(DailyReport {
        available: (min_date, max_date),
        start,
        end,
        kpis: compute_kpis(&scoped, &window, selection, roster),
        daily_totals: daily_totals(&view),
        enforcer_daily_totals: daily_enforcer_totals(&view),
        category_breakdown: category_enforcer_breakdown(&view),
        leaderboard: enforcer_leaderboard(&view),
        category_share: category_share(&view),
        heatmap: category_heatmap(&view),
        rows: view,
    })
}

/// Builds the monthly report.
///
/// `months = None` selects every available month; `Some(vec![])` applies no
/// month filter and has no preceding window to compare against.
pub fn build_monthly_report(
    snapshot: &UnifiedTable,
    selection: &[String],
    roster: &Roster,
    months: Option<Vec<YearMonth>>,
) -> ReportOutcome<MonthlyReport> {
    let scoped = snapshot.filter_enforcers(&effective_selection(selection, roster));
    if scoped.is_empty() {
        return ReportOutcome::NoData(NoDataReason::EmptySelection);
    }

    let available_months = scoped.months();
    let window = KpiWindow::monthly(months.unwrap_or_else(|| available_months.clone()));
    let view = window.apply(&scoped);
    if view.is_empty() {
        return ReportOutcome::NoData(NoDataReason::EmptyMonthSelection);
    }
    let selected_months = match &window {
        KpiWindow::Monthly { months } => months.clone(),
        KpiWindow::Daily { .. } => Vec::new(),
    };

    ReportOutcome::Ready(MonthlyReport {
        available_months,
        selected_months,
        kpis: compute_kpis(&scoped, &window, selection, roster),
        month_totals: monthly_totals(&view),
        enforcer_totals: monthly_enforcer_totals(&view),
        category_enforcer: monthly_category_enforcer(&view),
        category_breakdown: monthly_category_breakdown(&view),
        category_share: category_share(&view),
        rows: view,
    })
}
