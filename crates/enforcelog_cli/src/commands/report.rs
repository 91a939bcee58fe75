//! `report daily` / `report monthly`.

use crate::cli::{DailyArgs, FilterArgs, MonthlyArgs, ReportCommands};
use crate::output::{print_kpis, print_summary};
use anyhow::{bail, Context};
use enforcelog_core::db::Connection;
use enforcelog_core::report::cache::SnapshotCache;
use enforcelog_core::report::export::unified_to_csv;
use enforcelog_core::{
    DailyRequest, EnforcerFilter, ReportOutcome, ReportService, Roster, SessionState,
    SqliteTableRepository, UnifiedTable, YearMonth,
};

pub fn handle(
    action: ReportCommands,
    conn: &mut Connection,
    roster: Roster,
    cache: SnapshotCache,
) -> anyhow::Result<()> {
    let repo = SqliteTableRepository::try_new(conn)?;
    let mut service = ReportService::new(repo, roster, cache);
    match action {
        ReportCommands::Daily(args) => daily(&mut service, args),
        ReportCommands::Monthly(args) => monthly(&mut service, args),
    }
}

fn daily(service: &mut ReportService<SqliteTableRepository<'_>>, args: DailyArgs) -> anyhow::Result<()> {
    let state = filter_state(service.roster(), &args.filter)?;
    let request = DailyRequest {
        from: args.from,
        to: args.to,
    };
    let report = match service.daily(&state, request)? {
        ReportOutcome::Ready(report) => report,
        ReportOutcome::NoData(reason) => {
            println!("{reason}");
            return Ok(());
        }
    };

    println!(
        "Daily report {} .. {} (data available {} .. {})",
        report.start, report.end, report.available.0, report.available.1
    );
    print_kpis(&report.kpis, "Change vs previous period", "Active days");
    print_summary("Total actions per day", &report.daily_totals);
    print_summary("Daily totals by enforcer", &report.enforcer_daily_totals);
    print_summary("Category breakdown", &report.category_breakdown);
    print_summary("Leaderboard", &report.leaderboard);
    print_summary("Category share", &report.category_share);
    print_summary("Category heatmap", &report.heatmap);
    export_rows(&report.rows, &args.filter)
}

fn monthly(
    service: &mut ReportService<SqliteTableRepository<'_>>,
    args: MonthlyArgs,
) -> anyhow::Result<()> {
    let state = filter_state(service.roster(), &args.filter)?;
    let months = if args.months.is_empty() {
        None
    } else {
        Some(args.months)
    };
    let report = match service.monthly(&state, months)? {
        ReportOutcome::Ready(report) => report,
        ReportOutcome::NoData(reason) => {
            println!("{reason}");
            return Ok(());
        }
    };

    println!(
        "Monthly report for {} (available: {})",
        join_months(&report.selected_months),
        join_months(&report.available_months)
    );
    print_kpis(&report.kpis, "Change vs previous month", "Active months");
    print_summary("Total actions per month", &report.month_totals);
    print_summary("Monthly totals by enforcer", &report.enforcer_totals);
    print_summary("Category by enforcer", &report.category_enforcer);
    print_summary("Category breakdown", &report.category_breakdown);
    print_summary("Category share", &report.category_share);
    export_rows(&report.rows, &args.filter)
}

/// Session filter as the dashboard would hold it; no `--enforcer` means
/// "Select All".
fn filter_state(roster: &Roster, filter: &FilterArgs) -> anyhow::Result<SessionState> {
    let mut state = SessionState::new();
    if filter.enforcers.is_empty() {
        EnforcerFilter::select_all(&mut state, roster);
        return Ok(state);
    }

    let mut names = Vec::with_capacity(filter.enforcers.len());
    for name in &filter.enforcers {
        let name = name.trim();
        if !roster.contains(name) {
            bail!("`{name}` is not on the roster; see `enforcelog roster`");
        }
        names.push(name.to_string());
    }
    EnforcerFilter::set(&mut state, names);
    Ok(state)
}

fn export_rows(rows: &UnifiedTable, filter: &FilterArgs) -> anyhow::Result<()> {
    let Some(path) = &filter.csv else {
        return Ok(());
    };
    std::fs::write(path, unified_to_csv(rows))
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    println!("\nWrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn join_months(months: &[YearMonth]) -> String {
    if months.is_empty() {
        return "-".to_string();
    }
    months
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
