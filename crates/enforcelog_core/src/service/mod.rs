//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store calls into entry and report use-cases.
//! - Keep CLI layers decoupled from storage details.

pub mod entry_service;
pub mod report_service;
