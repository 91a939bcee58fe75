//! Core domain logic for enforcement activity logging.
//! This crate is the single source of truth for record and report invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use logging::{init_logging, logging_status, LogTarget};
pub use model::month::YearMonth;
pub use model::record::{ActivityRecord, CellValue, RecordMap, RECORD_HEADERS};
pub use model::taxonomy::{taxonomy_entries, Category, Roster, TaxonomyEntry};
pub use repo::table_repo::{
    HeaderRepair, RepoError, RepoResult, SqliteTableRepository, TableHandle, TableRepository,
};
pub use report::canonical::canonicalize_category;
pub use report::dashboard::{
    DailyReport, DailyRequest, MonthlyReport, NoDataReason, ReportOutcome,
};
pub use report::kpi::{KpiSummary, KpiWindow, TopEnforcer};
pub use report::table::{UnifiedRow, UnifiedTable};
pub use service::entry_service::{EntryError, EntryForm, EntryService};
pub use service::report_service::ReportService;
pub use session::{EnforcerFilter, SessionState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
