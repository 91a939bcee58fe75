use enforcelog_core::db::migrations::latest_version;
use enforcelog_core::db::{open_db, open_db_in_memory, open_db_with_retry, DbError, RetryPolicy};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "record_tables");
    assert_table_exists(&conn, "record_rows");
}

#[test]
fn record_rows_hold_only_position_and_cells() {
    let conn = open_db_in_memory().unwrap();
    let mut stmt = conn.prepare("PRAGMA table_info(record_rows);").unwrap();
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(columns, ["table_name", "position", "cells"]);
    assert_eq!(latest_version(), 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enforcelog.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "record_rows");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn newer_schema_version_is_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let policy = RetryPolicy {
        max_attempts: 3,
        delay: Duration::ZERO,
    };
    let err = open_db_with_retry(&path, &policy).unwrap_err();
    assert!(matches!(err, DbError::UnsupportedSchemaVersion { .. }));
}

#[test]
fn unreachable_store_exhausts_every_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("enforcelog.db");

    let policy = RetryPolicy {
        max_attempts: 2,
        delay: Duration::ZERO,
    };
    let err = open_db_with_retry(&path, &policy).unwrap_err();
    match err {
        DbError::OpenRetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 2);
            assert!(matches!(*last, DbError::Sqlite(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn retry_returns_connection_when_store_is_reachable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enforcelog.db");

    let conn = open_db_with_retry(&path, &RetryPolicy::default()).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
