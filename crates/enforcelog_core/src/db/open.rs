//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.
//! - A newer-than-supported schema is never retried.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_OPEN_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Fixed-delay retry policy for the initial store open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_OPEN_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let mut conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a SQLite database file, retrying transient failures.
///
/// Each failed attempt except the last sleeps for `policy.delay`. When every
/// attempt fails the last error is returned inside
/// [`DbError::OpenRetriesExhausted`].
pub fn open_db_with_retry(path: impl AsRef<Path>, policy: &RetryPolicy) -> DbResult<Connection> {
    let path = path.as_ref();
    let attempts = policy.max_attempts.max(1);

    let mut attempt = 1;
    loop {
        match open_db(path) {
            Ok(conn) => return Ok(conn),
            Err(err @ DbError::UnsupportedSchemaVersion { .. }) => return Err(err),
            Err(err) if attempt >= attempts => {
                error!(
                    "event=db_open_retry module=db status=error attempt={} max_attempts={} error={}",
                    attempt, attempts, err
                );
                return Err(DbError::OpenRetriesExhausted {
                    attempts,
                    last: Box::new(err),
                });
            }
            Err(err) => {
                warn!(
                    "event=db_open_retry module=db status=retry attempt={} max_attempts={} delay_ms={} error={}",
                    attempt,
                    attempts,
                    policy.delay.as_millis(),
                    err
                );
                std::thread::sleep(policy.delay);
                attempt += 1;
            }
        }
    }
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let mut conn = Connection::open_in_memory()?;
    bootstrap_connection(&mut conn)?;

    info!(
        "event=db_open module=db status=ok mode=memory duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
