use chrono::NaiveDate;
use enforcelog_core::report::aggregate::{
    category_enforcer_breakdown, category_heatmap, category_share, daily_detail,
    daily_enforcer_totals, daily_totals, enforcer_leaderboard, monthly_category_breakdown,
    monthly_category_enforcer, monthly_detail, monthly_enforcer_totals, monthly_totals,
    GroupValue,
};
use enforcelog_core::report::canonical::canonicalize_category;
use enforcelog_core::report::dashboard::{build_daily_report, build_monthly_report};
use enforcelog_core::report::export::unified_to_csv;
use enforcelog_core::report::kpi::{compute_kpis, format_change, top_enforcer};
use enforcelog_core::{
    CellValue, DailyRequest, KpiWindow, NoDataReason, RecordMap, ReportOutcome, Roster,
    UnifiedTable, YearMonth, RECORD_HEADERS,
};

const CITATIONS: &str = "I. Issuance of Citation Tickets";
const OTHER: &str = "IV. Other Tasks";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> YearMonth {
    YearMonth::new(y, m).unwrap()
}

fn record(date: &str, enforcer: &str, category: &str, quantity: i64) -> RecordMap {
    let mut record = RecordMap::new();
    record.insert("Date".to_string(), CellValue::from(date));
    record.insert("Enforcer".to_string(), CellValue::from(enforcer));
    record.insert("Category".to_string(), CellValue::from(category));
    record.insert(
        "Activity".to_string(),
        CellValue::from("Other duties assigned by the MENRO or LGU"),
    );
    record.insert("Quantity".to_string(), CellValue::Integer(quantity));
    record.insert("Remarks".to_string(), CellValue::from(""));
    record
}

fn table(records: &[RecordMap]) -> UnifiedTable {
    UnifiedTable::from_records(records)
}

fn selection(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn whitespace_and_case_variants_merge_into_one_category() {
    let unified = table(&[
        record("2024-05-01", "Enforcer 1", CITATIONS, 2),
        record("2024-05-01", "Enforcer 2", "I. Issuance Of  Citation  Tickets ", 3),
        record("2024-05-01", "Enforcer 1", "I. Issuance Of  Citation  Tickets ", 5),
    ]);

    let share = category_share(&unified);
    assert_eq!(share.rows().len(), 1);
    assert_eq!(share.rows()[0].keys, vec![GroupValue::Text(CITATIONS.to_string())]);
    assert_eq!(share.rows()[0].quantity, 10);
}

#[test]
fn canonicalization_is_idempotent() {
    let labels = [
        CITATIONS,
        "  ii.   SURVEILLANCE and stuff",
        "III. Information, Education and Communication",
        "IV. Other stuff",
        "Unknown   label ",
        "",
    ];
    for label in labels {
        let once = canonicalize_category(label);
        assert_eq!(canonicalize_category(&once), once, "label `{label}`");
    }
    assert_eq!(canonicalize_category("Unknown   label "), "Unknown label");
}

#[test]
fn every_grouping_conserves_the_total() {
    let unified = table(&[
        record("2024-05-01", "Enforcer 1", CITATIONS, 2),
        record("not a date", "Enforcer 2", OTHER, 7),
        record("2024-06-03", "Enforcer 2", "Stray label", 4),
        record("2024/06/04", "Enforcer 3", OTHER, 1),
    ]);
    assert_eq!(unified.total_quantity(), 14);

    let groupings = [
        daily_detail(&unified),
        daily_enforcer_totals(&unified),
        daily_totals(&unified),
        category_enforcer_breakdown(&unified),
        monthly_detail(&unified),
        monthly_category_breakdown(&unified),
        monthly_totals(&unified),
        monthly_enforcer_totals(&unified),
        monthly_category_enforcer(&unified),
        enforcer_leaderboard(&unified),
        category_share(&unified),
        category_heatmap(&unified),
    ];
    for summary in groupings {
        assert_eq!(summary.total_quantity(), 14, "{:?}", summary.columns());
    }
}

#[test]
fn daily_enforcer_totals_sum_each_enforcer_per_day() {
    let unified = table(&[
        record("2024-05-01", "Enforcer 2", CITATIONS, 2),
        record("2024-05-01", "Enforcer 2", OTHER, 3),
        record("2024-05-01", "Enforcer 1", OTHER, 1),
        record("2024-05-02", "Enforcer 2", OTHER, 4),
    ]);

    let totals = daily_enforcer_totals(&unified);
    assert_eq!(totals.columns(), vec!["Date", "Enforcer", "Quantity"]);
    let rows: Vec<(Vec<GroupValue>, i64)> = totals
        .rows()
        .iter()
        .map(|row| (row.keys.clone(), row.quantity))
        .collect();
    let key = |date: NaiveDate, enforcer: &str| {
        vec![
            GroupValue::Date(Some(date)),
            GroupValue::Text(enforcer.to_string()),
        ]
    };
    assert_eq!(
        rows,
        vec![
            (key(day(2024, 5, 1), "Enforcer 1"), 1),
            (key(day(2024, 5, 1), "Enforcer 2"), 5),
            (key(day(2024, 5, 2), "Enforcer 2"), 4),
        ]
    );
}

#[test]
fn undated_rows_form_their_own_leading_group() {
    let unified = table(&[
        record("2024-05-01", "Enforcer 1", OTHER, 2),
        record("", "Enforcer 1", OTHER, 3),
    ]);
    let totals = daily_totals(&unified);
    assert_eq!(totals.rows().len(), 2);
    assert_eq!(totals.rows()[0].keys, vec![GroupValue::Date(None)]);
    assert_eq!(totals.rows()[0].quantity, 3);
    assert_eq!(
        totals.rows()[1].keys,
        vec![GroupValue::Date(Some(day(2024, 5, 1)))]
    );
}

#[test]
fn empty_input_keeps_the_record_columns() {
    let unified = UnifiedTable::default();
    assert_eq!(unified.columns(), RECORD_HEADERS);
    assert!(daily_detail(&unified).is_empty());
    assert_eq!(
        daily_detail(&unified).columns(),
        vec!["Date", "Enforcer", "Category", "Activity", "Quantity"]
    );
    assert_eq!(
        unified_to_csv(&unified),
        "Date,Enforcer,Category,Activity,Quantity,Remarks,Month,CategoryShort\n"
    );
}

#[test]
fn daily_change_doubles_against_preceding_window() {
    let unified = table(&[
        record("2024-05-01", "Enforcer 1", OTHER, 4),
        record("2024-05-02", "Enforcer 1", OTHER, 6),
        record("2024-05-03", "Enforcer 1", OTHER, 12),
        record("2024-05-04", "Enforcer 2", OTHER, 8),
    ]);
    let window = KpiWindow::daily(day(2024, 5, 3), day(2024, 5, 4));

    let kpis = compute_kpis(&unified, &window, &[], &Roster::default());
    assert_eq!(kpis.total, 20);
    assert_eq!(kpis.previous_total, 10);
    assert_eq!(kpis.change_pct, Some(100.0));
    assert_eq!(format_change(kpis.change_pct), "+100.0%");
    assert_eq!(kpis.active_periods, 2);
}

#[test]
fn empty_preceding_window_has_no_change() {
    let unified = table(&[record("2024-05-03", "Enforcer 1", OTHER, 20)]);
    let window = KpiWindow::daily(day(2024, 5, 3), day(2024, 5, 4));

    let kpis = compute_kpis(&unified, &window, &[], &Roster::default());
    assert_eq!(kpis.previous_total, 0);
    assert_eq!(kpis.change_pct, None);
    assert_eq!(format_change(kpis.change_pct), "no data");
}

#[test]
fn percent_active_counts_enforcers_against_the_roster() {
    let unified = table(&[
        record("2024-05-01", "Enforcer 1", OTHER, 1),
        record("2024-05-01", "Enforcer 4", OTHER, 1),
        record("2024-05-02", "Enforcer 4", OTHER, 1),
    ]);
    let window = KpiWindow::daily(day(2024, 5, 1), day(2024, 5, 2));

    let kpis = compute_kpis(&unified, &window, &[], &Roster::default());
    assert_eq!(kpis.active_enforcers, 2);
    assert_eq!(kpis.percent_active, 40.0);
    assert!((0.0..=100.0).contains(&kpis.percent_active));

    let narrowed = selection(&["Enforcer 1", "Enforcer 2"]);
    let scoped = unified.filter_enforcers(&narrowed);
    let kpis = compute_kpis(&scoped, &window, &narrowed, &Roster::default());
    assert_eq!(kpis.percent_active, 50.0);
}

#[test]
fn top_enforcer_ties_go_to_the_first_name() {
    let unified = table(&[
        record("2024-05-01", "Enforcer 2", OTHER, 5),
        record("2024-05-01", "Enforcer 1", OTHER, 5),
        record("2024-05-01", "Enforcer 3", OTHER, 4),
    ]);
    let top = top_enforcer(&unified).unwrap();
    assert_eq!(top.name, "Enforcer 1");
    assert_eq!(top.quantity, 5);
    assert_eq!(top_enforcer(&UnifiedTable::default()), None);
}

#[test]
fn monthly_change_rolls_back_across_the_year() {
    let unified = table(&[
        record("2023-12-15", "Enforcer 1", OTHER, 4),
        record("2024-01-10", "Enforcer 1", OTHER, 6),
    ]);
    let window = KpiWindow::monthly([month(2024, 1)]);
    assert_eq!(
        window.preceding(),
        Some(KpiWindow::Monthly {
            months: vec![month(2023, 12)]
        })
    );

    let kpis = compute_kpis(&unified, &window, &[], &Roster::default());
    assert_eq!(kpis.total, 6);
    assert_eq!(kpis.previous_total, 4);
    assert_eq!(kpis.change_pct, Some(50.0));
}

#[test]
fn monthly_preceding_block_counts_months_back_from_earliest() {
    let window = KpiWindow::monthly([month(2024, 5), month(2024, 3), month(2024, 5)]);
    assert_eq!(
        window,
        KpiWindow::Monthly {
            months: vec![month(2024, 3), month(2024, 5)]
        }
    );
    assert_eq!(
        window.preceding(),
        Some(KpiWindow::Monthly {
            months: vec![month(2024, 1), month(2024, 2)]
        })
    );
}

#[test]
fn ytd_runs_from_january_first_to_window_end() {
    let unified = table(&[
        record("2023-12-31", "Enforcer 1", OTHER, 100),
        record("2024-01-01", "Enforcer 1", OTHER, 1),
        record("2024-05-01", "Enforcer 2", OTHER, 2),
        record("2024-06-01", "Enforcer 2", OTHER, 50),
    ]);
    let window = KpiWindow::daily(day(2024, 5, 1), day(2024, 5, 1));

    let kpis = compute_kpis(&unified, &window, &[], &Roster::default());
    assert_eq!(kpis.total, 2);
    assert_eq!(kpis.ytd_total, 3);

    let monthly = KpiWindow::monthly([month(2024, 6)]);
    let kpis = compute_kpis(&unified, &monthly, &[], &Roster::default());
    assert_eq!(kpis.ytd_total, 53);
}

#[test]
fn daily_report_clamps_the_request_to_available_dates() {
    let unified = table(&[
        record("2024-05-02", "Enforcer 1", CITATIONS, 3),
        record("2024-05-05", "Enforcer 2", OTHER, 4),
    ]);
    let request = DailyRequest {
        from: Some(day(2024, 4, 1)),
        to: Some(day(2024, 12, 31)),
    };

    let report = build_daily_report(&unified, &[], &Roster::default(), request)
        .ready()
        .unwrap();
    assert_eq!(report.available, (day(2024, 5, 2), day(2024, 5, 5)));
    assert_eq!(report.start, day(2024, 5, 2));
    assert_eq!(report.end, day(2024, 5, 5));
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.daily_totals.total_quantity(), 7);
    assert_eq!(report.enforcer_daily_totals.rows().len(), 2);
    assert_eq!(report.enforcer_daily_totals.total_quantity(), 7);
    assert_eq!(report.leaderboard.rows()[0].quantity, 4);
    assert_eq!(
        report.heatmap.rows()[0].keys[0],
        GroupValue::Text("I. Citation Tickets".to_string())
    );
}

#[test]
fn daily_report_explains_missing_data() {
    let roster = Roster::default();
    let unified = table(&[record("2024-05-02", "Enforcer 1", OTHER, 3)]);

    let outcome = build_daily_report(
        &unified,
        &selection(&["Enforcer 5"]),
        &roster,
        DailyRequest::default(),
    );
    assert_eq!(outcome, ReportOutcome::NoData(NoDataReason::EmptySelection));

    let undated = table(&[record("someday", "Enforcer 1", OTHER, 3)]);
    let outcome = build_daily_report(&undated, &[], &roster, DailyRequest::default());
    assert_eq!(outcome, ReportOutcome::NoData(NoDataReason::NoValidDates));

    let request = DailyRequest {
        from: Some(day(2024, 6, 1)),
        to: None,
    };
    let outcome = build_daily_report(&unified, &[], &roster, request);
    assert_eq!(outcome, ReportOutcome::NoData(NoDataReason::EmptyDateRange));
}

#[test]
fn monthly_report_defaults_to_every_available_month() {
    let unified = table(&[
        record("2024-04-20", "Enforcer 1", OTHER, 1),
        record("2024-05-02", "Enforcer 2", OTHER, 2),
        record("bad", "Enforcer 2", OTHER, 9),
    ]);

    let report = build_monthly_report(&unified, &[], &Roster::default(), None)
        .ready()
        .unwrap();
    assert_eq!(report.available_months, vec![month(2024, 4), month(2024, 5)]);
    assert_eq!(report.selected_months, report.available_months);
    assert_eq!(report.kpis.total, 3);
    assert_eq!(report.kpis.active_periods, 2);
    assert_eq!(report.enforcer_totals.total_quantity(), 3);
    assert_eq!(report.month_totals.rows().len(), 2);
    assert_eq!(report.month_totals.total_quantity(), 3);
}

#[test]
fn monthly_report_without_month_filter_has_no_comparison() {
    let unified = table(&[
        record("2024-04-20", "Enforcer 1", OTHER, 1),
        record("bad", "Enforcer 2", OTHER, 9),
    ]);

    let report = build_monthly_report(&unified, &[], &Roster::default(), Some(Vec::new()))
        .ready()
        .unwrap();
    assert!(report.selected_months.is_empty());
    assert_eq!(report.kpis.total, 10);
    assert_eq!(report.kpis.change_pct, None);
    assert_eq!(report.kpis.ytd_total, 1);
}

#[test]
fn unfiltered_monthly_ytd_runs_through_latest_date() {
    let unified = table(&[
        record("2023-11-02", "Enforcer 1", OTHER, 40),
        record("2024-03-10", "Enforcer 1", OTHER, 5),
        record("2024-04-20", "Enforcer 2", OTHER, 7),
    ]);

    let report = build_monthly_report(&unified, &[], &Roster::default(), Some(Vec::new()))
        .ready()
        .unwrap();
    assert_eq!(report.kpis.total, 52);
    assert_eq!(report.kpis.ytd_total, 12);
}

#[test]
fn monthly_report_with_empty_selection_reports_no_data() {
    let unified = table(&[record("2024-04-20", "Enforcer 1", OTHER, 1)]);

    let outcome = build_monthly_report(
        &unified,
        &[],
        &Roster::default(),
        Some(vec![month(1999, 1)]),
    );
    assert_eq!(
        outcome,
        ReportOutcome::NoData(NoDataReason::EmptyMonthSelection)
    );
}
