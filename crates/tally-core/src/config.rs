//! Configuration file (`config.toml` in the data directory)
//!
//! Example:
//!
//! ```toml
//! [storage]
//! backend = "sqlite"     # sqlite | json | memory
//! path = "tally.db"      # relative paths resolve against the data directory
//!
//! [store]
//! strict_ids = false     # true: update/delete on an unknown id is an error
//!
//! [reports]
//! bucket_order = "sorted" # sorted | first_seen
//! ```
//!
//! Every section and key is optional; a missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::query::BucketOrder;
use crate::storage::{Backend, JsonFileStorage, KeyValueStore, MemoryStorage, SqliteStorage};
use crate::store::NotFoundPolicy;

/// Name of the config file inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Default SQLite file name inside the data directory
pub const DEFAULT_DB_FILE: &str = "tally.db";

/// Default data directory (`~/.local/share/tally` on Linux)
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: Backend,
    /// Database file (sqlite) or directory (json); relative to `data_dir`
    pub storage_path: Option<PathBuf>,
    pub not_found: NotFoundPolicy,
    pub bucket_order: BucketOrder,
}

impl Config {
    /// Defaults rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend: Backend::default(),
            storage_path: None,
            not_found: NotFoundPolicy::default(),
            bucket_order: BucketOrder::default(),
        }
    }

    /// Load `<data_dir>/config.toml`, or `path` when given
    ///
    /// A missing `<data_dir>/config.toml` yields defaults. An explicitly named
    /// file must exist; an unreadable or invalid file is an error.
    pub fn load(data_dir: impl Into<PathBuf>, path: Option<&Path>) -> Result<Self> {
        let data_dir = data_dir.into();
        let path = match path {
            Some(path) if !path.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let path = data_dir.join(CONFIG_FILE);
                if !path.exists() {
                    debug!(path = %path.display(), "No config file, using defaults");
                    return Ok(Self::new(data_dir));
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::parse(data_dir, &content)
    }

    /// Parse TOML content on top of the defaults
    pub fn parse(data_dir: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::new(data_dir);

        if let Some(storage) = raw.storage {
            if let Some(backend) = storage.backend {
                config.backend = backend.parse().map_err(Error::Config)?;
            }
            config.storage_path = storage.path.map(PathBuf::from);
        }

        if let Some(store) = raw.store {
            if store.strict_ids == Some(true) {
                config.not_found = NotFoundPolicy::Strict;
            }
        }

        if let Some(reports) = raw.reports {
            if let Some(order) = reports.bucket_order {
                config.bucket_order = order.parse().map_err(Error::Config)?;
            }
        }

        Ok(config)
    }

    /// Where the selected backend keeps its data
    pub fn storage_location(&self) -> PathBuf {
        let default = match self.backend {
            Backend::Sqlite => PathBuf::from(DEFAULT_DB_FILE),
            Backend::Json | Backend::Memory => PathBuf::from("store"),
        };
        let path = self.storage_path.clone().unwrap_or(default);
        if path.is_absolute() {
            path
        } else {
            self.data_dir.join(path)
        }
    }

    /// Open the configured backend
    pub fn open_storage(&self) -> Result<Box<dyn KeyValueStore>> {
        let storage: Box<dyn KeyValueStore> = match self.backend {
            Backend::Sqlite => Box::new(SqliteStorage::open(self.storage_location())?),
            Backend::Json => Box::new(JsonFileStorage::open(self.storage_location())?),
            Backend::Memory => Box::new(MemoryStorage::new()),
        };
        debug!(backend = %self.backend, "Opened storage");
        Ok(storage)
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    storage: Option<RawStorage>,
    store: Option<RawStore>,
    reports: Option<RawReports>,
}

#[derive(Debug, Deserialize)]
struct RawStorage {
    backend: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStore {
    strict_ids: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawReports {
    bucket_order: Option<String>,
}
