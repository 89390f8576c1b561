// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

// Proxy Mode Manager - Common Library
// Shared types, collaborator traits, and configuration structures

pub mod config;
pub mod error;
pub mod helper_process;
pub mod store;
pub mod traits;
pub mod tunnel;
pub mod types;

pub use config::{
    config_path, load_config, save_config, HelperConfig, ManagerConfig, ProxySettings,
    TunnelConfig,
};
pub use error::{Error, Result};
pub use helper_process::CommandHelper;
pub use store::FileConfigStore;
pub use traits::{ConfigStore, HelperControl, HelperRegistry, TunnelState};
pub use tunnel::InterfaceTunnelProbe;
pub use types::{ConnectionStatus, ProxyMode};
