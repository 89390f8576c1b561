// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

//! Framework-agnostic GUI core for Proxy Mode Manager
//!
//! This crate contains the proxy mode state machine, the helper start/stop
//! sequencing and the status-driven interaction lock. Front ends implement
//! [`ProxyEventHandler`] and feed user clicks into [`LifecycleCoordinator`].

pub mod events;
pub mod lifecycle;
pub mod lock;
pub mod state;
pub mod status;
pub mod view_models;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use events::{GuiEvent, Notice, ProxyEventHandler, StopDialogAction};
pub use lifecycle::{
    Collaborators, CoreOptions, LifecycleCoordinator, Rejection, StartReport, StopReport,
    Transition,
};
pub use lock::{LockState, UiLockProtocol};
pub use state::ProxyModeSelector;
pub use status::StatusSignal;
pub use view_models::{
    mode_options, stop_confirmation_message, stop_dialog_actions, update_display, DisplayText,
    DisplayUpdate, IconState, ModeOption,
};

// Re-export types from common crate for convenience
pub use proxy_mode_common::{ConnectionStatus, ProxyMode};
