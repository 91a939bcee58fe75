//! Record table repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Open-or-create named tables with the fixed header row.
//! - Append typed rows and read them back as cells or header-keyed records.
//! - Self-heal a missing or garbled header row.
//!
//! # Invariants
//! - Row positions are dense and zero-based; position 0 is the header.
//! - Appends of N rows commit atomically.
//! - Header repair shifts existing rows down without touching their cells.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::record::{header_cells, CellValue, RecordMap, RECORD_HEADERS};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record table operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    TableNotFound(String),
    InvalidTableName(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::TableNotFound(name) => write!(f, "record table not found: {name}"),
            Self::InvalidTableName(name) => write!(f, "invalid record table name: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted row data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::TableNotFound(_) | Self::InvalidTableName(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Handle to one existing record table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    name: String,
}

impl TableHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of a header check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRepair {
    /// First row already matched.
    Intact,
    /// Table was empty; header appended as the only row.
    Appended,
    /// First row differed; header inserted above existing rows.
    Inserted,
}

/// Repository interface for named record tables.
pub trait TableRepository {
    /// Lists table names in ascending order.
    fn list_tables(&self) -> RepoResult<Vec<String>>;
    /// Looks up a table without creating it.
    fn find_table(&self, name: &str) -> RepoResult<Option<TableHandle>>;
    /// Returns the named table, creating it with the header row on miss.
    fn open_or_create_table(&mut self, name: &str) -> RepoResult<TableHandle>;
    /// Guarantees the first row equals `RECORD_HEADERS`.
    fn ensure_header(&mut self, table: &TableHandle) -> RepoResult<HeaderRepair>;
    /// Appends all rows in one transaction and returns the count written.
    fn append_rows(&mut self, table: &TableHandle, rows: &[Vec<CellValue>]) -> RepoResult<usize>;
    /// Reads every row, header included, in position order.
    fn read_values(&self, table: &TableHandle) -> RepoResult<Vec<Vec<CellValue>>>;
    /// Reads rows below the header as maps keyed by header names.
    fn read_records(&self, table: &TableHandle) -> RepoResult<Vec<RecordMap>> {
        let values = self.read_values(table)?;
        Ok(rows_to_records(&values))
    }
}

/// SQLite-backed record table repository.
pub struct SqliteTableRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTableRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TableRepository for SqliteTableRepository<'_> {
    fn list_tables(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM record_tables ORDER BY name ASC;")?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get("name")?);
        }
        Ok(names)
    }

    fn find_table(&self, name: &str) -> RepoResult<Option<TableHandle>> {
        let normalized = normalize_table_name(name)?;
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM record_tables WHERE name = ?1;",
                [normalized.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.map(|name| TableHandle { name }))
    }

    fn open_or_create_table(&mut self, name: &str) -> RepoResult<TableHandle> {
        let normalized = normalize_table_name(name)?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO record_tables (name) VALUES (?1);",
            [normalized.as_str()],
        )?;
        if inserted > 0 {
            insert_row_at(&tx, normalized.as_str(), 0, &header_cells())?;
            info!(
                "event=table_create module=repo status=ok table={}",
                normalized
            );
        }
        tx.commit()?;
        Ok(TableHandle { name: normalized })
    }

    fn ensure_header(&mut self, table: &TableHandle) -> RepoResult<HeaderRepair> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        require_table(&tx, table.name())?;

        let first: Option<String> = tx
            .query_row(
                "SELECT cells FROM record_rows
                 WHERE table_name = ?1
                 ORDER BY position ASC
                 LIMIT 1;",
                [table.name()],
                |row| row.get(0),
            )
            .optional()?;

        let repair = match first {
            None => {
                insert_row_at(&tx, table.name(), 0, &header_cells())?;
                HeaderRepair::Appended
            }
            Some(cells_json) => {
                let cells = decode_cells(table.name(), &cells_json)?;
                if is_header_row(&cells) {
                    HeaderRepair::Intact
                } else {
                    shift_rows_down(&tx, table.name())?;
                    insert_row_at(&tx, table.name(), 0, &header_cells())?;
                    HeaderRepair::Inserted
                }
            }
        };
        tx.commit()?;

        match repair {
            HeaderRepair::Intact => debug!(
                "event=header_check module=repo status=ok table={}",
                table.name()
            ),
            HeaderRepair::Appended | HeaderRepair::Inserted => warn!(
                "event=header_check module=repo status=repaired table={} repair={:?}",
                table.name(),
                repair
            ),
        }
        Ok(repair)
    }

    fn append_rows(&mut self, table: &TableHandle, rows: &[Vec<CellValue>]) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        require_table(&tx, table.name())?;

        let mut position = next_position(&tx, table.name())?;
        for row in rows {
            insert_row_at(&tx, table.name(), position, row)?;
            position += 1;
        }
        tx.commit()?;

        info!(
            "event=rows_append module=repo status=ok table={} rows={}",
            table.name(),
            rows.len()
        );
        Ok(rows.len())
    }

    fn read_values(&self, table: &TableHandle) -> RepoResult<Vec<Vec<CellValue>>> {
        let mut stmt = self.conn.prepare(
            "SELECT cells FROM record_rows
             WHERE table_name = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([table.name()])?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let cells_json: String = row.get("cells")?;
            values.push(decode_cells(table.name(), &cells_json)?);
        }
        Ok(values)
    }
}

/// Maps rows after the first onto the first row's header names.
///
/// Short rows are padded with `CellValue::Empty`; cells beyond the header
/// width are dropped.
pub fn rows_to_records(values: &[Vec<CellValue>]) -> Vec<RecordMap> {
    let Some((header, data)) = values.split_first() else {
        return Vec::new();
    };
    let keys: Vec<String> = header.iter().map(ToString::to_string).collect();

    data.iter()
        .map(|row| {
            keys.iter()
                .enumerate()
                .map(|(index, key)| (key.clone(), row.get(index).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}

fn is_header_row(cells: &[CellValue]) -> bool {
    cells.len() == RECORD_HEADERS.len()
        && cells
            .iter()
            .zip(RECORD_HEADERS)
            .all(|(cell, expected)| matches!(cell, CellValue::Text(text) if text == expected))
}

fn normalize_table_name(name: &str) -> RepoResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidTableName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

fn require_table(tx: &Transaction<'_>, name: &str) -> RepoResult<()> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM record_tables WHERE name = ?1);",
        [name],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(RepoError::TableNotFound(name.to_string()));
    }
    Ok(())
}

fn next_position(tx: &Transaction<'_>, name: &str) -> RepoResult<i64> {
    let position = tx.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM record_rows WHERE table_name = ?1;",
        [name],
        |row| row.get(0),
    )?;
    Ok(position)
}

fn shift_rows_down(tx: &Transaction<'_>, name: &str) -> RepoResult<()> {
    // Two passes keep (table_name, position) unique at every step.
    tx.execute(
        "UPDATE record_rows SET position = -position - 1 WHERE table_name = ?1;",
        [name],
    )?;
    tx.execute(
        "UPDATE record_rows SET position = -position WHERE table_name = ?1 AND position < 0;",
        [name],
    )?;
    Ok(())
}

fn insert_row_at(
    tx: &Transaction<'_>,
    name: &str,
    position: i64,
    cells: &[CellValue],
) -> RepoResult<()> {
    let encoded = serde_json::to_string(cells)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode row for `{name}`: {err}")))?;
    tx.execute(
        "INSERT INTO record_rows (table_name, position, cells) VALUES (?1, ?2, ?3);",
        params![name, position, encoded],
    )?;
    Ok(())
}

fn decode_cells(name: &str, cells_json: &str) -> RepoResult<Vec<CellValue>> {
    serde_json::from_str(cells_json).map_err(|err| {
        RepoError::InvalidData(format!("undecodable row in table `{name}`: {err}"))
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if version != latest {
        return Err(RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version: version,
            latest_supported: latest,
        }));
    }
    Ok(())
}
