//! TOML application configuration.
//!
//! # Responsibility
//! - Load `enforcelog.toml` into typed sections with defaults.
//! - Validate values before any store or logger is opened.
//!
//! # Invariants
//! - Every section and key is optional; a missing file means all defaults.
//! - A configured roster replaces the default roster entirely.

use crate::db::RetryPolicy;
use crate::model::taxonomy::{Roster, DEFAULT_ROSTER};
use crate::report::cache::DEFAULT_SNAPSHOT_TTL;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "enforcelog.toml";
const DEFAULT_STORE_FILE: &str = "enforcelog.sqlite3";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub open_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            path: PathBuf::from(DEFAULT_STORE_FILE),
            open_attempts: retry.max_attempts,
            retry_delay_ms: u64::try_from(retry.delay.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Rolling log file directory; stderr when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub enforcers: Vec<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            enforcers: DEFAULT_ROSTER.iter().map(|name| (*name).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SNAPSHOT_TTL.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub roster: RosterConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, `enforcelog.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.open_attempts == 0 {
            return Err(ConfigError::Invalid(
                "store.open_attempts must be at least 1".to_string(),
            ));
        }
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store.path cannot be empty".to_string()));
        }
        self.roster()?;
        Ok(())
    }

    pub fn roster(&self) -> Result<Roster, ConfigError> {
        Roster::new(&self.roster.enforcers)
            .map_err(|err| ConfigError::Invalid(format!("roster.enforcers: {err}")))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.store.open_attempts,
            delay: Duration::from_millis(self.store.retry_delay_ms),
        }
    }

    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}
