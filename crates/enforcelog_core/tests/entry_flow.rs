use chrono::NaiveDate;
use enforcelog_core::db::open_db_in_memory;
use enforcelog_core::report::cache::SnapshotCache;
use enforcelog_core::{
    taxonomy_entries, CellValue, DailyRequest, EnforcerFilter, EntryError, EntryForm,
    EntryService, ReportService, Roster, SessionState, SqliteTableRepository, TableRepository,
    UnifiedTable,
};
use std::convert::Infallible;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn save_writes_one_row_per_activity() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteTableRepository::try_new(&mut conn).unwrap();
    let mut service = EntryService::new(repo, Roster::default());

    let mut state = SessionState::new();
    EntryForm::set_quantity(&mut state, "Enforcer 1", "Unregistered Chainsaw", 3).unwrap();
    EntryForm::set_remark(&mut state, "Enforcer 1", "Unregistered Chainsaw", "km 4").unwrap();

    let written = service
        .save_entry(&state, "Enforcer 1", day(2024, 5, 1))
        .unwrap();
    assert_eq!(written, taxonomy_entries().len());
    assert_eq!(written, 17);

    let records = service.submitted_records("Enforcer 1").unwrap();
    assert_eq!(records.len(), 17);
    let chainsaw = records
        .iter()
        .find(|record| record["Activity"] == CellValue::from("Unregistered Chainsaw"))
        .unwrap();
    assert_eq!(chainsaw["Quantity"], CellValue::Integer(3));
    assert_eq!(chainsaw["Remarks"], CellValue::from("km 4"));
    assert_eq!(chainsaw["Date"], CellValue::from("2024-05-01"));
    assert_eq!(chainsaw["Enforcer"], CellValue::from("Enforcer 1"));

    let untouched = records
        .iter()
        .filter(|record| record["Quantity"] == CellValue::Integer(0))
        .count();
    assert_eq!(untouched, 16);
}

#[test]
fn repeated_saves_append_instead_of_overwriting() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteTableRepository::try_new(&mut conn).unwrap();
    let mut service = EntryService::new(repo, Roster::default());
    let state = SessionState::new();

    service.save_entry(&state, "Enforcer 2", day(2024, 5, 1)).unwrap();
    service.save_entry(&state, "Enforcer 2", day(2024, 5, 1)).unwrap();

    let values = service.submitted_values("Enforcer 2").unwrap();
    assert_eq!(values.len(), 1 + 2 * 17);
}

#[test]
fn form_values_do_not_leak_between_enforcers() {
    let mut state = SessionState::new();
    EntryForm::set_quantity(&mut state, "Enforcer 1", "Open Dumping of Waste", 9).unwrap();

    let other = EntryForm::collect(&state, "Enforcer 2", day(2024, 5, 1));
    assert!(other.iter().all(|record| record.quantity == 0));
    let own = EntryForm::collect(&state, "Enforcer 1", day(2024, 5, 1));
    assert_eq!(own.iter().map(|record| record.quantity).sum::<u32>(), 9);
}

#[test]
fn blank_and_unknown_enforcers_are_rejected_before_writing() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteTableRepository::try_new(&mut conn).unwrap();
    let mut service = EntryService::new(repo, Roster::default());
    let state = SessionState::new();

    let err = service.save_entry(&state, "  ", day(2024, 5, 1)).unwrap_err();
    assert!(matches!(err, EntryError::NoEnforcerSelected));
    let err = service
        .save_entry(&state, "Someone Else", day(2024, 5, 1))
        .unwrap_err();
    assert!(matches!(err, EntryError::UnknownEnforcer(_)));
    drop(service);

    let repo = SqliteTableRepository::try_new(&mut conn).unwrap();
    assert!(repo.list_tables().unwrap().is_empty());
}

#[test]
fn unknown_activity_is_rejected() {
    let mut state = SessionState::new();
    let err = EntryForm::set_quantity(&mut state, "Enforcer 1", "Juggling", 1).unwrap_err();
    assert!(matches!(err, EntryError::UnknownActivity(_)));
}

#[test]
fn saved_entries_show_up_in_reports() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteTableRepository::try_new(&mut conn).unwrap();
        let mut service = EntryService::new(repo, Roster::default());
        let mut state = SessionState::new();
        EntryForm::set_quantity(&mut state, "Enforcer 1", "Open Dumping of Waste", 4).unwrap();
        EntryForm::set_quantity(&mut state, "Enforcer 3", "Dissemination of IEC Materials", 6)
            .unwrap();
        service.save_entry(&state, "Enforcer 1", day(2024, 5, 1)).unwrap();
        service.save_entry(&state, "Enforcer 3", day(2024, 5, 2)).unwrap();
    }

    let repo = SqliteTableRepository::try_new(&mut conn).unwrap();
    let mut reports = ReportService::new(repo, Roster::default(), SnapshotCache::default());
    let mut state = SessionState::new();
    EnforcerFilter::select_all(&mut state, reports.roster());

    let report = reports
        .daily(&state, DailyRequest::default())
        .unwrap()
        .ready()
        .unwrap();
    assert_eq!(report.start, day(2024, 5, 1));
    assert_eq!(report.end, day(2024, 5, 2));
    assert_eq!(report.kpis.total, 10);
    assert_eq!(report.kpis.active_enforcers, 2);
    assert_eq!(report.kpis.percent_active, 40.0);
    let top = report.kpis.top_enforcer.unwrap();
    assert_eq!(top.name, "Enforcer 3");
    assert_eq!(top.quantity, 6);

    EnforcerFilter::set(&mut state, vec!["Enforcer 1".to_string()]);
    let report = reports
        .daily(&state, DailyRequest::default())
        .unwrap()
        .ready()
        .unwrap();
    assert_eq!(report.kpis.total, 4);
    assert_eq!(report.kpis.percent_active, 100.0);

    EnforcerFilter::set(
        &mut state,
        vec!["Enforcer 3".to_string(), "Enforcer 3".to_string()],
    );
    let report = reports
        .daily(&state, DailyRequest::default())
        .unwrap()
        .ready()
        .unwrap();
    assert_eq!(report.kpis.percent_active, 100.0);
}

#[test]
fn refresh_drops_a_stale_snapshot() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteTableRepository::try_new(&mut conn).unwrap();
    let mut entries = EntryService::new(repo, Roster::default());
    let mut state = SessionState::new();
    EntryForm::set_quantity(&mut state, "Enforcer 1", "Open Dumping of Waste", 2).unwrap();
    entries.save_entry(&state, "Enforcer 1", day(2024, 5, 1)).unwrap();
    drop(entries);

    let mut cache = SnapshotCache::default();
    cache
        .get_or_load(|| Ok::<_, Infallible>(UnifiedTable::default()))
        .unwrap();
    let repo = SqliteTableRepository::try_new(&mut conn).unwrap();
    let mut reports = ReportService::new(repo, Roster::default(), cache);

    assert_eq!(reports.snapshot().unwrap().total_quantity(), 0);
    reports.refresh();
    assert_eq!(reports.snapshot().unwrap().total_quantity(), 2);
}
