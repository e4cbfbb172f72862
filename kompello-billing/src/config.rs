//! Billing engine configuration
//!
//! Sources are merged in precedence order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. `kompello.toml`, `kompello.yaml`, `kompello.json` when present
//! 3. `KOMPELLO_` environment variables, `__` separating nested keys
//!    (`KOMPELLO_DATABASE__PATH=/var/lib/kompello.db`)

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Default SQLite busy timeout
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file; `None` keeps everything in memory
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl BillingConfig {
    /// Load configuration from defaults, config files and the environment.
    pub fn load() -> Result<Self> {
        let config: Self = Self::figment().extract()?;
        debug!(?config, "loaded billing configuration");
        Ok(config)
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file("kompello.toml"))
            .merge(Yaml::file("kompello.yaml"))
            .merge(Json::file("kompello.json"))
            .merge(Env::prefixed("KOMPELLO_").split("__"))
    }

    /// Configuration for a throwaway in-memory database.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database.path = Some(path.into());
        self
    }
}
