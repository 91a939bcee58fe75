//! Time-bounded cache of the loaded unified snapshot.

use crate::report::table::UnifiedTable;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default snapshot lifetime.
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(60);

/// Serves one loaded snapshot until it is older than `ttl`.
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    entry: Option<(Instant, Arc<UnifiedTable>)>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Returns the cached snapshot, reloading it when missing or stale.
    pub fn get_or_load<E>(
        &mut self,
        load: impl FnOnce() -> Result<UnifiedTable, E>,
    ) -> Result<Arc<UnifiedTable>, E> {
        self.get_or_load_at(Instant::now(), load)
    }

    /// Same as [`Self::get_or_load`] with an explicit clock reading.
    pub fn get_or_load_at<E>(
        &mut self,
        now: Instant,
        load: impl FnOnce() -> Result<UnifiedTable, E>,
    ) -> Result<Arc<UnifiedTable>, E> {
        if let Some((loaded_at, snapshot)) = &self.entry {
            if now.saturating_duration_since(*loaded_at) < self.ttl {
                debug!("event=snapshot_cache module=report status=hit");
                return Ok(Arc::clone(snapshot));
            }
        }

        debug!("event=snapshot_cache module=report status=miss");
        let snapshot = Arc::new(load()?);
        self.entry = Some((now, Arc::clone(&snapshot)));
        Ok(snapshot)
    }

    /// Drops the cached snapshot so the next read reloads.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_TTL)
    }
}
