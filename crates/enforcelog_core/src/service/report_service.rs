//! Report use-case service.
//!
//! # Responsibility
//! - Load (or serve from cache) the unified snapshot of all roster tables.
//! - Build daily/monthly reports for the session's enforcer filter.

use crate::model::month::YearMonth;
use crate::model::taxonomy::Roster;
use crate::repo::table_repo::{RepoResult, TableRepository};
use crate::report::cache::SnapshotCache;
use crate::report::dashboard::{
    build_daily_report, build_monthly_report, DailyReport, DailyRequest, MonthlyReport,
    ReportOutcome,
};
use crate::report::table::{load_unified, UnifiedTable};
use crate::session::{EnforcerFilter, SessionState};
use std::sync::Arc;

/// Report service facade over a record store.
pub struct ReportService<R: TableRepository> {
    repo: R,
    roster: Roster,
    cache: SnapshotCache,
}

impl<R: TableRepository> ReportService<R> {
    pub fn new(repo: R, roster: Roster, cache: SnapshotCache) -> Self {
        Self {
            repo,
            roster,
            cache,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Current snapshot; may be up to the cache TTL old.
    pub fn snapshot(&mut self) -> RepoResult<Arc<UnifiedTable>> {
        let repo = &self.repo;
        let roster = &self.roster;
        self.cache.get_or_load(|| load_unified(repo, roster))
    }

    /// Forces the next read to hit the store.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }

    pub fn daily(
        &mut self,
        state: &SessionState,
        request: DailyRequest,
    ) -> RepoResult<ReportOutcome<DailyReport>> {
        let snapshot = self.snapshot()?;
        let selection = EnforcerFilter::selected(state, &self.roster);
        Ok(build_daily_report(&snapshot, &selection, &self.roster, request))
    }

    pub fn monthly(
        &mut self,
        state: &SessionState,
        months: Option<Vec<YearMonth>>,
    ) -> RepoResult<ReportOutcome<MonthlyReport>> {
        let snapshot = self.snapshot()?;
        let selection = EnforcerFilter::selected(state, &self.roster);
        Ok(build_monthly_report(&snapshot, &selection, &self.roster, months))
    }
}
