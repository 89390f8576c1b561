// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

// Proxy Mode Manager - CLI Config Module
// Wires the configuration file to the coordinator's collaborators

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use proxy_mode_common::{
    CommandHelper, FileConfigStore, HelperRegistry, InterfaceTunnelProbe, ManagerConfig,
    TunnelState,
};
use proxy_mode_gui_core::{Collaborators, CoreOptions, LifecycleCoordinator};

/// Everything a command needs
pub struct Session {
    pub config_path: PathBuf,
    pub config: ManagerConfig,
    pub store: Arc<FileConfigStore>,
    pub registry: Arc<dyn HelperRegistry>,
    pub tunnel: Arc<dyn TunnelState>,
    pub coordinator: LifecycleCoordinator,
}

/// Resolve the configuration file, honouring an explicit override
pub fn resolve_config_path(overridden: Option<PathBuf>) -> Result<PathBuf> {
    match overridden {
        Some(path) => Ok(path),
        None => proxy_mode_common::config_path().context("Failed to locate configuration file"),
    }
}

impl Session {
    /// Open the settings file and build the coordinator on top of it
    pub fn open(config_path: PathBuf) -> Result<Self> {
        let store = Arc::new(
            FileConfigStore::open(&config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()))?,
        );
        let config = store.config();

        let helper = Arc::new(CommandHelper::new(config.helper.clone()));
        let tunnel: Arc<dyn TunnelState> = Arc::new(InterfaceTunnelProbe::new(&config.tunnel));
        let registry: Arc<dyn HelperRegistry> = helper.clone();

        let coordinator = LifecycleCoordinator::new(
            Collaborators {
                config: store.clone(),
                registry: registry.clone(),
                tunnel: tunnel.clone(),
                helper,
            },
            CoreOptions {
                http_supported: config.helper.http_supported,
            },
        );

        Ok(Self {
            config_path,
            config,
            store,
            registry,
            tunnel,
            coordinator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxy_mode_common::{save_config, ProxyMode};

    #[test]
    fn test_resolve_override() {
        let path = PathBuf::from("/tmp/custom.toml");
        assert_eq!(resolve_config_path(Some(path.clone())).unwrap(), path);
    }

    #[tokio::test]
    async fn test_session_reads_persisted_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ManagerConfig::default();
        config.proxy.mode = ProxyMode::Socks5;
        config.helper.http_supported = false;
        save_config(&path, &config).unwrap();

        let session = Session::open(path).unwrap();
        assert_eq!(session.coordinator.current_mode(), ProxyMode::Socks5);
        assert_eq!(session.coordinator.mode_options().len(), 2);
    }
}
