//! Record store: named enforcer tables persisted in SQLite.
//!
//! # Responsibility
//! - Define the table-level data access contract used by the entry form and
//!   the aggregation loader.
//! - Isolate SQLite query details from service/report orchestration.
//!
//! # Invariants
//! - Tables are append-only; no API rewrites or deletes data rows.
//! - The header row is the only row this layer ever inserts above data.

pub mod table_repo;
