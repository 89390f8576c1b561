// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

// Common types for Proxy Mode Manager

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the helper routes the device's traffic.
///
/// Exactly one mode is current at any time. Persisted under the names
/// `NONE`, `SOCKS5`, `HTTP` and `HTTP_SOCKS5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProxyMode {
    /// Helper disabled, no proxy in use
    #[default]
    None,
    /// SOCKS5 proxy only
    Socks5,
    /// HTTP proxy only
    Http,
    /// SOCKS5 and HTTP proxies together
    Socks5Http,
}

impl ProxyMode {
    /// Every mode, in the order the options are offered to the user
    pub const ALL: [ProxyMode; 4] = [
        ProxyMode::None,
        ProxyMode::Socks5,
        ProxyMode::Http,
        ProxyMode::Socks5Http,
    ];

    /// Name used in persisted settings and on the helper command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyMode::None => "NONE",
            ProxyMode::Socks5 => "SOCKS5",
            ProxyMode::Http => "HTTP",
            ProxyMode::Socks5Http => "HTTP_SOCKS5",
        }
    }

    /// Check if the mode needs a running helper
    pub fn is_active(&self) -> bool {
        !matches!(self, ProxyMode::None)
    }

    /// Check if the mode needs platform support for an HTTP proxy
    pub fn requires_http(&self) -> bool {
        matches!(self, ProxyMode::Http | ProxyMode::Socks5Http)
    }

    /// Check if DNS can be carried over the helper in this mode
    pub fn carries_dns(&self) -> bool {
        matches!(self, ProxyMode::Socks5 | ProxyMode::Socks5Http)
    }

    /// Short label for the mode option
    pub fn label(&self) -> &'static str {
        match self {
            ProxyMode::None => "Disabled",
            ProxyMode::Socks5 => "SOCKS5",
            ProxyMode::Http => "HTTP",
            ProxyMode::Socks5Http => "SOCKS5 + HTTP",
        }
    }

    /// Explanation shown in the info dialog for the mode option
    pub fn description(&self) -> &'static str {
        match self {
            ProxyMode::None => "Traffic is not sent through the helper.",
            ProxyMode::Socks5 => {
                "All app traffic is sent through the helper's SOCKS5 proxy. \
                 DNS can optionally be resolved by the helper as well."
            }
            ProxyMode::Http => {
                "Apps that honour the system HTTP proxy send their traffic through \
                 the helper. Other traffic and DNS are not affected."
            }
            ProxyMode::Socks5Http => {
                "Traffic is sent through the helper's SOCKS5 proxy and the HTTP proxy \
                 is set for apps that prefer it."
            }
        }
    }
}

impl fmt::Display for ProxyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProxyMode {
    type Err = std::convert::Infallible;

    /// Unknown names read as [`ProxyMode::None`]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_uppercase().as_str() {
            "SOCKS5" => ProxyMode::Socks5,
            "HTTP" => ProxyMode::Http,
            "HTTP_SOCKS5" | "SOCKS5_HTTP" | "BOTH" => ProxyMode::Socks5Http,
            _ => ProxyMode::None,
        };
        Ok(mode)
    }
}

impl From<String> for ProxyMode {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(mode) => mode,
            Err(never) => match never {},
        }
    }
}

impl From<ProxyMode> for String {
    fn from(mode: ProxyMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Status derived from the shared connecting flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No start/stop sequence pending
    #[default]
    Idle,
    /// A start/stop sequence is in flight
    Connecting,
}

impl ConnectionStatus {
    pub fn from_connecting(connecting: bool) -> Self {
        if connecting {
            ConnectionStatus::Connecting
        } else {
            ConnectionStatus::Idle
        }
    }

    /// Check if the status represents a transitional state
    pub fn is_in_progress(&self) -> bool {
        matches!(self, ConnectionStatus::Connecting)
    }
}
