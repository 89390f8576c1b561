// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

//! Collaborator traits
//!
//! The mode coordinator never talks to the settings file, the helper process
//! or the network stack directly. Each concern sits behind one of these
//! traits so front ends can plug in their own platform implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ProxyMode;

/// Persisted proxy settings
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Mode that was last persisted
    fn current_mode(&self) -> ProxyMode;

    /// Persist a new mode
    fn set_mode(&self, mode: ProxyMode) -> Result<()>;

    /// Whether DNS is resolved through the helper
    ///
    /// May touch storage, so it is only called off the selection path.
    async fn is_helper_dns(&self) -> bool;

    /// Remove every proxy from the routing configuration
    fn clear_all_proxies(&self) -> Result<()>;
}

/// Knows whether the helper application is present
pub trait HelperRegistry: Send + Sync {
    fn is_helper_installed(&self) -> bool;
}

/// Knows whether the underlying tunnel is up
pub trait TunnelState: Send + Sync {
    fn is_tunnel_active(&self) -> bool;
}

/// Drives the helper process
#[async_trait]
pub trait HelperControl: Send + Sync {
    /// Ask the helper to start serving the given mode
    async fn start_helper(&self, mode: ProxyMode) -> Result<()>;

    /// Ask the helper to stop; `interactive` lets the helper show its own UI
    fn stop_helper(&self, interactive: bool);

    /// Bring the helper's own UI to the front
    fn open_helper_app(&self);
}
