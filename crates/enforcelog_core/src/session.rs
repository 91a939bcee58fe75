//! Session-scoped key/value state.
//!
//! One `SessionState` lives for one user session and is passed into every
//! entry or report pass; there is no process-global UI state.

use crate::model::taxonomy::Roster;
use std::collections::{BTreeMap, BTreeSet};

/// Session key holding the report's enforcer filter.
pub const ENFORCER_FILTER_KEY: &str = "enf_filter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValue {
    Quantity(u32),
    Text(String),
    Names(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    values: BTreeMap<String, SessionValue>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: SessionValue) {
        self.values.insert(key.into(), value);
    }

    /// Quantity stored under `key`; absent or non-quantity values read as 0.
    pub fn quantity(&self, key: &str) -> u32 {
        match self.values.get(key) {
            Some(SessionValue::Quantity(value)) => *value,
            _ => 0,
        }
    }

    /// Text stored under `key`; absent or non-text values read as empty.
    pub fn text(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(SessionValue::Text(value)) => value.as_str(),
            _ => "",
        }
    }

    pub fn names(&self, key: &str) -> &[String] {
        match self.values.get(key) {
            Some(SessionValue::Names(value)) => value.as_slice(),
            _ => &[],
        }
    }
}

/// Enforcer filter persisted in session state across report passes.
pub struct EnforcerFilter;

impl EnforcerFilter {
    /// Current selection; names outside the roster are dropped.
    pub fn selected(state: &SessionState, roster: &Roster) -> Vec<String> {
        state
            .names(ENFORCER_FILTER_KEY)
            .iter()
            .filter(|name| roster.contains(name))
            .cloned()
            .collect()
    }

    /// Stores the selection; repeated names keep their first position only.
    pub fn set(state: &mut SessionState, names: Vec<String>) {
        let mut seen = BTreeSet::new();
        let names = names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect();
        state.set(ENFORCER_FILTER_KEY, SessionValue::Names(names));
    }

    pub fn select_all(state: &mut SessionState, roster: &Roster) {
        Self::set(state, roster.names().to_vec());
    }

    pub fn clear(state: &mut SessionState) {
        Self::set(state, Vec::new());
    }
}
