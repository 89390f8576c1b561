// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

//! Event handling traits and types

use crate::view_models::DisplayUpdate;

/// Framework-agnostic display sink
///
/// GUI implementations should implement this trait to render the proxy
/// panel. The core only keeps a weak reference, so dropping the view is
/// enough to detach it.
pub trait ProxyEventHandler: Send + Sync {
    /// Called whenever the panel must be re-rendered
    fn on_display_changed(&self, update: DisplayUpdate);

    /// Called for one-shot events (dialogs, notices, navigation)
    fn on_event(&self, event: GuiEvent);
}

/// GUI events that can be triggered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiEvent {
    /// Show the stop confirmation dialog
    ///
    /// `combined_message` is set when DNS was routed through the helper; the
    /// dialog then also explains the DNS impact and offers
    /// [`StopDialogAction::ConfigureDns`].
    ShowStopConfirmation { combined_message: bool },

    /// Show a short non-blocking notice
    ShowNotice(Notice),

    /// Navigate to the DNS configuration screen
    NavigateToDnsSettings,
}

/// Expected, user-facing conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A proxy mode was requested while the tunnel is down
    TunnelInactive,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::TunnelInactive => "VPN is disabled. Start the tunnel to use the helper proxy.",
        }
    }
}

/// Buttons of the stop confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDialogAction {
    Dismiss,
    OpenHelperApp,
    /// Only offered with the combined message
    ConfigureDns,
}

impl StopDialogAction {
    pub fn label(&self) -> &'static str {
        match self {
            StopDialogAction::Dismiss => "Dismiss",
            StopDialogAction::OpenHelperApp => "Open helper",
            StopDialogAction::ConfigureDns => "Configure DNS",
        }
    }
}
