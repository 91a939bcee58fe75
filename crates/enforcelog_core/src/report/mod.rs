//! Aggregation and reporting over all enforcer tables.
//!
//! # Responsibility
//! - Canonicalize categories and coerce stored cells into a unified table.
//! - Group, window and reduce that table into summaries and KPIs.
//! - Export tables as CSV for download.
//!
//! # Invariants
//! - Reports are recomputed from a snapshot on every read; nothing here
//!   writes back to the record store.

pub mod aggregate;
pub mod cache;
pub mod canonical;
pub mod dashboard;
pub mod export;
pub mod kpi;
pub mod table;
