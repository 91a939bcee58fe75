//! Entry use-case service.
//!
//! # Responsibility
//! - Map the fixed taxonomy onto session-scoped form fields.
//! - Save one row per activity to the enforcer's own table.
//! - Read an enforcer's submitted rows back for review/export.
//!
//! # Invariants
//! - No store access happens before an enforcer on the roster is chosen.
//! - A save always writes exactly one row per taxonomy activity, in order.
//! - The enforcer's table header is verified before every read or write.

use crate::model::record::{ActivityRecord, CellValue, RecordMap};
use crate::model::taxonomy::{taxonomy_entries, Roster};
use crate::repo::table_repo::{RepoError, TableHandle, TableRepository};
use crate::session::{SessionState, SessionValue};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for entry use-cases.
#[derive(Debug)]
pub enum EntryError {
    /// No enforcer name was chosen.
    NoEnforcerSelected,
    /// Name is not on the roster.
    UnknownEnforcer(String),
    /// Activity is not part of the taxonomy.
    UnknownActivity(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for EntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEnforcerSelected => write!(f, "please select your name to begin"),
            Self::UnknownEnforcer(name) => write!(f, "enforcer not on roster: `{name}`"),
            Self::UnknownActivity(name) => write!(f, "unknown activity: `{name}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EntryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EntryError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Session key of an activity's quantity field.
pub fn quantity_key(enforcer: &str, activity: &str) -> String {
    format!("{enforcer}_{activity}_qty")
}

/// Session key of an activity's remark field.
pub fn remark_key(enforcer: &str, activity: &str) -> String {
    format!("{enforcer}_{activity}_remark")
}

/// Entry form fields stored in session state.
///
/// Keys include the enforcer name so switching enforcers mid-session never
/// leaks values between forms.
pub struct EntryForm;

impl EntryForm {
    pub fn set_quantity(
        state: &mut SessionState,
        enforcer: &str,
        activity: &str,
        quantity: u32,
    ) -> Result<(), EntryError> {
        require_activity(activity)?;
        state.set(quantity_key(enforcer, activity), SessionValue::Quantity(quantity));
        Ok(())
    }

    pub fn set_remark(
        state: &mut SessionState,
        enforcer: &str,
        activity: &str,
        remark: impl Into<String>,
    ) -> Result<(), EntryError> {
        require_activity(activity)?;
        state.set(remark_key(enforcer, activity), SessionValue::Text(remark.into()));
        Ok(())
    }

    /// One record per taxonomy activity; untouched fields read as 0 / "".
    pub fn collect(state: &SessionState, enforcer: &str, date: NaiveDate) -> Vec<ActivityRecord> {
        taxonomy_entries()
            .into_iter()
            .map(|entry| ActivityRecord {
                date,
                enforcer: enforcer.to_string(),
                category: entry.category.label().to_string(),
                activity: entry.activity.to_string(),
                quantity: state.quantity(&quantity_key(enforcer, entry.activity)),
                remarks: state.text(&remark_key(enforcer, entry.activity)).to_string(),
            })
            .collect()
    }
}

/// Entry service facade over a record store.
pub struct EntryService<R: TableRepository> {
    repo: R,
    roster: Roster,
}

impl<R: TableRepository> EntryService<R> {
    pub fn new(repo: R, roster: Roster) -> Self {
        Self { repo, roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Validates the chosen name against the roster.
    pub fn select_enforcer(&self, name: &str) -> Result<String, EntryError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(EntryError::NoEnforcerSelected);
        }
        if !self.roster.contains(trimmed) {
            return Err(EntryError::UnknownEnforcer(trimmed.to_string()));
        }
        Ok(trimmed.to_string())
    }

    /// Appends the enforcer's current form as one batch.
    ///
    /// Returns the number of rows written.
    pub fn save_entry(
        &mut self,
        state: &SessionState,
        enforcer: &str,
        date: NaiveDate,
    ) -> Result<usize, EntryError> {
        let enforcer = self.select_enforcer(enforcer)?;
        let table = self.open_enforcer_table(&enforcer)?;

        let rows: Vec<Vec<CellValue>> = EntryForm::collect(state, &enforcer, date)
            .iter()
            .map(ActivityRecord::to_cells)
            .collect();
        let written = self.repo.append_rows(&table, &rows)?;

        info!(
            "event=entry_save module=service status=ok table={} rows={}",
            table.name(),
            written
        );
        Ok(written)
    }

    /// The enforcer's table as stored, header row first.
    pub fn submitted_values(&mut self, enforcer: &str) -> Result<Vec<Vec<CellValue>>, EntryError> {
        let enforcer = self.select_enforcer(enforcer)?;
        let table = self.open_enforcer_table(&enforcer)?;
        Ok(self.repo.read_values(&table)?)
    }

    /// The enforcer's data rows keyed by header names.
    pub fn submitted_records(&mut self, enforcer: &str) -> Result<Vec<RecordMap>, EntryError> {
        let enforcer = self.select_enforcer(enforcer)?;
        let table = self.open_enforcer_table(&enforcer)?;
        Ok(self.repo.read_records(&table)?)
    }

    fn open_enforcer_table(&mut self, enforcer: &str) -> Result<TableHandle, EntryError> {
        let table = self.repo.open_or_create_table(enforcer)?;
        self.repo.ensure_header(&table)?;
        Ok(table)
    }
}

fn require_activity(activity: &str) -> Result<(), EntryError> {
    if taxonomy_entries()
        .iter()
        .any(|entry| entry.activity == activity)
    {
        Ok(())
    } else {
        Err(EntryError::UnknownActivity(activity.to_string()))
    }
}
