// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

// Proxy Mode Manager - File-backed settings store

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{load_config, save_config, ManagerConfig};
use crate::error::Result;
use crate::traits::ConfigStore;
use crate::types::ProxyMode;

/// [`ConfigStore`] persisting the selection in the TOML config file
pub struct FileConfigStore {
    path: PathBuf,
    config: Mutex<ManagerConfig>,
}

impl FileConfigStore {
    /// Open the store, reading the current file contents
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = load_config(&path)?;
        debug!(
            "Opened settings store {} (mode {})",
            path.display(),
            config.proxy.mode
        );
        Ok(Self {
            path,
            config: Mutex::new(config),
        })
    }

    /// Snapshot of the cached configuration
    pub fn config(&self) -> ManagerConfig {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ManagerConfig> {
        self.config.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply a change on top of the file's current contents
    ///
    /// Other writers own parts of the file, so the cache is only the fallback
    /// when the file cannot be read.
    fn update(&self, apply: impl FnOnce(&mut ManagerConfig)) -> Result<()> {
        let mut cached = self.lock();
        let mut config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to reload {}: {}", self.path.display(), e);
                cached.clone()
            }
        };
        apply(&mut config);
        save_config(&self.path, &config)?;
        *cached = config;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    fn current_mode(&self) -> ProxyMode {
        self.lock().proxy.mode
    }

    fn set_mode(&self, mode: ProxyMode) -> Result<()> {
        debug!("Persisting proxy mode {}", mode);
        self.update(|config| config.proxy.mode = mode)
    }

    async fn is_helper_dns(&self) -> bool {
        // The DNS setting is owned by another screen, so re-read the file
        let cached = self.lock().proxy.dns_via_helper;
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => match toml::from_str::<ManagerConfig>(&contents) {
                Ok(config) => config.proxy.dns_via_helper,
                Err(e) => {
                    warn!("Failed to parse {}: {}", self.path.display(), e);
                    cached
                }
            },
            Err(_) => cached,
        }
    }

    fn clear_all_proxies(&self) -> Result<()> {
        debug!("Clearing all proxies");
        self.update(|config| config.proxy.mode = ProxyMode::None)
    }
}
