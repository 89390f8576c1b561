// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

// Tunnel state probing

use std::path::PathBuf;

use tracing::debug;

use crate::config::TunnelConfig;
use crate::traits::TunnelState;

/// Reports the tunnel as active while its network interface exists
#[derive(Debug, Clone)]
pub struct InterfaceTunnelProbe {
    interface: String,
    sysfs_root: PathBuf,
}

impl InterfaceTunnelProbe {
    pub fn new(config: &TunnelConfig) -> Self {
        Self::with_root(config, "/sys/class/net")
    }

    /// Probe against a different interface listing (used by tests)
    pub fn with_root(config: &TunnelConfig, sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            interface: config.interface.clone(),
            sysfs_root: sysfs_root.into(),
        }
    }
}

impl TunnelState for InterfaceTunnelProbe {
    fn is_tunnel_active(&self) -> bool {
        let active = self.sysfs_root.join(&self.interface).exists();
        debug!("Tunnel interface {} active: {}", self.interface, active);
        active
    }
}
