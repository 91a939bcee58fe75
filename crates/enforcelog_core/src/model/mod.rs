//! Domain model for enforcement activity logging.
//!
//! # Responsibility
//! - Define the fixed category/activity taxonomy and the enforcer roster.
//! - Define stored cell values and the typed activity record written on save.
//! - Provide the `YYYY-MM` month bucket used by monthly reports.
//!
//! # Invariants
//! - The taxonomy is a compile-time constant; it is never derived from data.
//! - Records are append-only; nothing in the model mutates stored history.

pub mod month;
pub mod record;
pub mod taxonomy;
