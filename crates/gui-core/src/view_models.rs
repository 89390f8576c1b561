// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

//! View models - Data structures prepared for UI display

use std::fmt;

use proxy_mode_common::ProxyMode;
use serde::Serialize;

use crate::events::StopDialogAction;

/// Status line shown while a start/stop sequence is in flight
pub const TRYING_TO_CONNECT: &str = "Trying to connect to the helper...";

const DNS_VIA_HELPER: &str = "DNS is resolved by the helper";
const DNS_VIA_RESOLVER: &str = "DNS uses the configured resolver";

/// Helper icon state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconState {
    Enabled,
    Disabled,
    /// Continuous indicator, runs until the status clears
    Animating,
}

/// Human-readable status line, split into its mode and DNS clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayText {
    pub mode_clause: &'static str,
    pub dns_clause: Option<&'static str>,
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dns_clause {
            Some(dns) => write!(f, "{}. {}.", self.mode_clause, dns),
            None => write!(f, "{}.", self.mode_clause),
        }
    }
}

/// Map the selected mode and the helper-DNS flag to the status line
///
/// The DNS flag only changes the DNS clause, and only for modes that can
/// carry DNS at all.
pub fn update_display(mode: ProxyMode, is_helper_dns: bool) -> DisplayText {
    let mode_clause = match mode {
        ProxyMode::None => "Helper proxy is disabled",
        ProxyMode::Socks5 => "App traffic is routed through the helper over SOCKS5",
        ProxyMode::Http => "The helper serves as HTTP proxy for apps that use it",
        ProxyMode::Socks5Http => "App traffic is routed through the helper over SOCKS5 and HTTP",
    };

    let dns_clause = mode.carries_dns().then(|| {
        if is_helper_dns {
            DNS_VIA_HELPER
        } else {
            DNS_VIA_RESOLVER
        }
    });

    DisplayText {
        mode_clause,
        dns_clause,
    }
}

/// One render of the proxy panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayUpdate {
    /// Mode-selection controls must not accept input
    pub locked: bool,
    /// Option to show as checked
    pub mode: ProxyMode,
    pub text: String,
    pub icon: IconState,
}

impl DisplayUpdate {
    /// Panel while a start/stop sequence is in flight
    pub fn locked(mode: ProxyMode) -> Self {
        Self {
            locked: true,
            mode,
            text: TRYING_TO_CONNECT.to_string(),
            icon: IconState::Animating,
        }
    }

    /// Panel once the status has settled
    pub fn settled(mode: ProxyMode, is_helper_dns: bool) -> Self {
        Self {
            locked: false,
            mode,
            text: update_display(mode, is_helper_dns).to_string(),
            icon: if mode.is_active() {
                IconState::Enabled
            } else {
                IconState::Disabled
            },
        }
    }
}

/// A selectable mode as presented to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeOption {
    pub mode: ProxyMode,
    pub label: &'static str,
    pub description: &'static str,
    pub selected: bool,
    pub enabled: bool,
}

/// Options to offer; HTTP-based modes are hidden where unsupported
pub fn mode_options(current: ProxyMode, locked: bool, http_supported: bool) -> Vec<ModeOption> {
    ProxyMode::ALL
        .into_iter()
        .filter(|mode| http_supported || !mode.requires_http())
        .map(|mode| ModeOption {
            mode,
            label: mode.label(),
            description: mode.description(),
            selected: mode == current,
            enabled: !locked,
        })
        .collect()
}

/// Message of the stop confirmation dialog
pub fn stop_confirmation_message(combined_message: bool) -> String {
    let base = "The helper has been asked to stop. Traffic is no longer proxied.";
    if combined_message {
        format!(
            "{} DNS is still configured to be resolved by the helper and will fail \
             until another DNS is chosen.",
            base
        )
    } else {
        base.to_string()
    }
}

/// Buttons of the stop confirmation dialog
pub fn stop_dialog_actions(combined_message: bool) -> &'static [StopDialogAction] {
    if combined_message {
        &[
            StopDialogAction::Dismiss,
            StopDialogAction::OpenHelperApp,
            StopDialogAction::ConfigureDns,
        ]
    } else {
        &[StopDialogAction::Dismiss, StopDialogAction::OpenHelperApp]
    }
}
