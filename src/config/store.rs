//! Shared configuration storage.
//!
//! In-memory config container with interior mutability. A [`Host`] reads it
//! at every mount, so a reload only affects instances mounted afterwards.
//!
//! [`Host`]: crate::binding::Host

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::loader::ConfigError;
use crate::config::types::EngineConfig;

/// Thread-safe config container.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<EngineConfig>>,
    path: Option<PathBuf>,
}

impl ConfigStore {
    /// Create a new ConfigStore from initial config and path.
    pub fn new(config: EngineConfig, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path: Some(path),
        }
    }

    /// A store not backed by any file. [`ConfigStore::reload`] keeps the
    /// config as given.
    pub fn in_memory(config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path: None,
        }
    }

    /// Load from `path` (defaults when the file is missing).
    pub fn open(path: PathBuf) -> Result<Self, ConfigError> {
        let config = EngineConfig::load_from(&path)?;
        Ok(Self::new(config, path))
    }

    /// Get a clone of the current config.
    pub fn get(&self) -> EngineConfig {
        self.inner.read().clone()
    }

    /// Reload config from the file.
    ///
    /// On success, atomically replaces the current config.
    /// On failure, keeps the old config and returns the error.
    /// In-memory stores have nothing to reload from.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            tracing::debug!("In-memory config store, reload skipped");
            return Ok(());
        };
        let config = EngineConfig::load_from(path)?;
        *self.inner.write() = config;
        Ok(())
    }

    /// Get the config file path, if the store is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
