//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_config` - Resolve data dir, config file and backend override
//! - `open_store` / `open_session` - Shared utilities to open storage
//! - `cmd_init` - Initialize the data directory

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tally_core::config::{default_data_dir, Config};
use tally_core::storage::{Backend, KeyValueStore};
use tally_core::{ExpenseStore, Session};

pub type Store = ExpenseStore<Box<dyn KeyValueStore>>;

/// Resolve the effective configuration from the global flags
pub fn load_config(
    data_dir: Option<&Path>,
    config_path: Option<&Path>,
    backend: Option<&str>,
) -> Result<Config> {
    let data_dir: PathBuf = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_data_dir().context("Could not determine a data directory; pass --data-dir")?,
    };

    let mut config = Config::load(&data_dir, config_path).context("Failed to load config")?;
    if let Some(backend) = backend {
        config.backend = backend
            .parse::<Backend>()
            .map_err(|e: String| anyhow::anyhow!(e))?;
    }
    Ok(config)
}

/// Open the configured storage and load the expense store
pub fn open_store(config: &Config) -> Result<Store> {
    let storage = config.open_storage().context("Failed to open storage")?;
    Ok(ExpenseStore::load(storage).with_policy(config.not_found))
}

/// Open the configured storage for session commands
pub fn open_session(config: &Config) -> Result<Session<Box<dyn KeyValueStore>>> {
    let storage = config.open_storage().context("Failed to open storage")?;
    Ok(Session::new(storage))
}

pub fn cmd_init(config: &Config) -> Result<()> {
    println!("🔧 Initializing Tally in {}...", config.data_dir.display());

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.data_dir.display()
        )
    })?;

    let store = open_store(config)?;
    println!("   Backend: {}", config.backend);
    if config.backend != Backend::Memory {
        println!("   Location: {}", config.storage_location().display());
    }
    println!("   Expenses on record: {}", store.len());

    println!("✅ Ready!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: tally add -a 12.50 -c \"Food & Dining\" -d \"Lunch\"");
    println!("  2. See where it goes: tally dashboard");

    Ok(())
}
