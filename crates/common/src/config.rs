// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

// Configuration structures for Proxy Mode Manager

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::ProxyMode;

/// Placeholder replaced by the mode name in the helper start command
pub const MODE_PLACEHOLDER: &str = "{mode}";

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManagerConfig {
    #[serde(default)]
    pub helper: HelperConfig,
    #[serde(default)]
    pub tunnel: TunnelConfig,
    #[serde(default)]
    pub proxy: ProxySettings,
}

/// How to find and drive the helper process
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HelperConfig {
    /// Helper executable, looked up on PATH unless absolute
    #[serde(default = "default_helper_binary")]
    pub binary: String,
    /// Command that starts the helper; `{mode}` is replaced by the mode name
    #[serde(default = "default_start_command")]
    pub start_command: Vec<String>,
    /// Command that stops the helper
    #[serde(default = "default_stop_command")]
    pub stop_command: Vec<String>,
    /// Command that brings the helper's own UI to the front
    #[serde(default = "default_open_command")]
    pub open_command: Vec<String>,
    /// How long to wait for the start command to finish
    #[serde(default = "default_start_timeout")]
    pub start_timeout_secs: u64,
    /// Whether the platform can run the helper as an HTTP proxy
    #[serde(default = "default_true")]
    pub http_supported: bool,
}

/// Which transport must be up before a proxy mode may start
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TunnelConfig {
    /// Network interface of the tunnel (e.g. "tun0")
    #[serde(default = "default_tunnel_interface")]
    pub interface: String,
}

/// Persisted proxy selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProxySettings {
    /// Currently selected mode
    #[serde(default)]
    pub mode: ProxyMode,
    /// Whether DNS queries are resolved by the helper
    #[serde(default)]
    pub dns_via_helper: bool,
}

fn default_helper_binary() -> String {
    "tor-helper".to_string()
}

fn default_start_command() -> Vec<String> {
    vec![
        "tor-helper".to_string(),
        "start".to_string(),
        "--mode".to_string(),
        MODE_PLACEHOLDER.to_string(),
    ]
}

fn default_stop_command() -> Vec<String> {
    vec!["tor-helper".to_string(), "stop".to_string()]
}

fn default_open_command() -> Vec<String> {
    vec!["tor-helper".to_string(), "--show".to_string()]
}

fn default_start_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_tunnel_interface() -> String {
    "tun0".to_string()
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            binary: default_helper_binary(),
            start_command: default_start_command(),
            stop_command: default_stop_command(),
            open_command: default_open_command(),
            start_timeout_secs: default_start_timeout(),
            http_supported: default_true(),
        }
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            interface: default_tunnel_interface(),
        }
    }
}

impl HelperConfig {
    /// Start command with the mode placeholder filled in
    pub fn start_command_for(&self, mode: ProxyMode) -> Vec<String> {
        self.start_command
            .iter()
            .map(|arg| arg.replace(MODE_PLACEHOLDER, mode.as_str()))
            .collect()
    }
}

impl ManagerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.helper.binary.trim().is_empty() {
            return Err(Error::Config("Helper binary cannot be empty".to_string()));
        }

        for (name, command) in [
            ("start_command", &self.helper.start_command),
            ("stop_command", &self.helper.stop_command),
            ("open_command", &self.helper.open_command),
        ] {
            if command.first().map_or(true, |program| program.trim().is_empty()) {
                return Err(Error::Config(format!("Helper {} cannot be empty", name)));
            }
        }

        if self.helper.start_timeout_secs == 0 {
            return Err(Error::Config(
                "Helper start timeout must be greater than 0".to_string(),
            ));
        }

        if self.tunnel.interface.trim().is_empty() {
            return Err(Error::Config("Tunnel interface cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Get the default configuration file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("proxy-mode-manager").join("config.toml"))
}

/// Load configuration from a file, returning defaults if it does not exist
pub fn load_config(path: &Path) -> Result<ManagerConfig> {
    if !path.exists() {
        debug!("Config file does not exist, using defaults: {}", path.display());
        return Ok(ManagerConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: ManagerConfig = toml::from_str(&contents)?;
    config.validate()?;

    Ok(config)
}

/// Save configuration to a file
pub fn save_config(path: &Path, config: &ManagerConfig) -> Result<()> {
    config.validate()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let toml_content = toml::to_string_pretty(config)?;
    fs::write(path, toml_content)?;

    // Set restrictive permissions on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ManagerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.proxy.mode, ProxyMode::None);
        assert!(!config.proxy.dns_via_helper);
        assert!(config.helper.http_supported);
    }

    #[test]
    fn test_start_command_for_mode() {
        let helper = HelperConfig::default();
        assert_eq!(
            helper.start_command_for(ProxyMode::Socks5Http),
            vec!["tor-helper", "start", "--mode", "HTTP_SOCKS5"]
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ManagerConfig = toml::from_str(
            r#"
            [proxy]
            mode = "SOCKS5"
            dns_via_helper = true
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy.mode, ProxyMode::Socks5);
        assert!(config.proxy.dns_via_helper);
        assert_eq!(config.tunnel.interface, "tun0");
        assert_eq!(config.helper.start_timeout_secs, 30);
    }

    #[test]
    fn test_unknown_persisted_mode() {
        let config: ManagerConfig = toml::from_str("[proxy]\nmode = \"SOMETHING\"\n").unwrap();
        assert_eq!(config.proxy.mode, ProxyMode::None);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ManagerConfig::default();
        config.helper.stop_command.clear();
        assert!(config.validate().is_err());

        let mut config = ManagerConfig::default();
        config.helper.start_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ManagerConfig::default();
        config.tunnel.interface = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ManagerConfig::default();
        config.proxy.mode = ProxyMode::Http;
        config.helper.http_supported = false;
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ManagerConfig::default());
    }

    #[test]
    fn test_config_path() {
        let path = config_path().expect("Should get config path");
        assert!(path.to_string_lossy().contains("proxy-mode-manager"));
    }
}
