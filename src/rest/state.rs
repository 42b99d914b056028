//! API state management for the REST server.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::shows::ShowService;
use crate::store::MemoryStore;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Show operations over the configured store
    pub service: ShowService,
    /// Application configuration
    pub config: Arc<Config>,
}

impl ApiState {
    /// State over a purely in-memory store
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: Config, store: Arc<MemoryStore>) -> Self {
        Self {
            service: ShowService::with_store(store),
            config: Arc::new(config),
        }
    }

    /// Build state from config, opening the snapshot file when one is set
    pub fn from_config(config: Config) -> Result<Self> {
        let store = match config.data_file_path() {
            Some(path) => {
                let store = MemoryStore::open(&path)
                    .with_context(|| format!("Failed to open data file {}", path.display()))?;
                tracing::info!("Persisting shows to {}", path.display());
                store
            }
            None => {
                tracing::warn!("No store.data_file configured; shows are kept in memory only");
                MemoryStore::new()
            }
        };

        Ok(Self::with_store(config, Arc::new(store)))
    }
}
