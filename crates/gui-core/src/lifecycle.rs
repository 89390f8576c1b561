// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

//! Helper lifecycle coordination
//!
//! [`LifecycleCoordinator`] turns mode selections into start/stop calls on the
//! helper. Mode and status are only changed inside one short critical
//! section; the helper calls and settings reads run on spawned tasks whose
//! handles are returned to the caller.
//!
//! Must be used from within a tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use proxy_mode_common::{
    ConfigStore, ConnectionStatus, HelperControl, HelperRegistry, ProxyMode, TunnelState,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::events::{GuiEvent, Notice, ProxyEventHandler, StopDialogAction};
use crate::lock::UiLockProtocol;
use crate::state::CoreState;
use crate::status::StatusSignal;
use crate::view_models::{self, DisplayUpdate, ModeOption};

/// External collaborators the coordinator drives
#[derive(Clone)]
pub struct Collaborators {
    pub config: Arc<dyn ConfigStore>,
    pub registry: Arc<dyn HelperRegistry>,
    pub tunnel: Arc<dyn TunnelState>,
    pub helper: Arc<dyn HelperControl>,
}

/// Platform capabilities
#[derive(Debug, Clone, Copy)]
pub struct CoreOptions {
    /// Whether the helper can run as an HTTP proxy on this platform
    pub http_supported: bool,
}

impl Default for CoreOptions {
    fn default() -> Self {
        Self {
            http_supported: true,
        }
    }
}

/// Why a start request was dropped before anything changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `start` only accepts modes that need the helper
    NotAProxyMode,
    /// HTTP-based mode on a platform without HTTP proxy support
    HttpUnsupported,
    /// Helper application is not installed; dropped silently
    HelperNotInstalled,
    /// Tunnel is down; the user got a notice
    TunnelInactive,
}

/// Result of a finished start sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartReport {
    pub mode: ProxyMode,
    /// Whether the helper accepted the start call
    pub succeeded: bool,
    /// A newer start/stop took over before this one finished
    pub superseded: bool,
}

/// Result of a finished stop sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopReport {
    /// DNS was routed through the helper
    pub combined_message: bool,
    /// The stop confirmation reached a view
    pub delivered: bool,
}

/// What a call to [`LifecycleCoordinator::select`] set in motion
#[derive(Debug)]
pub enum Transition {
    /// Target was already current
    Unchanged,
    Rejected(Rejection),
    Starting(JoinHandle<StartReport>),
    Stopping(JoinHandle<StopReport>),
}

struct Shared {
    state: Mutex<CoreState>,
    status: StatusSignal,
    collaborators: Collaborators,
    options: CoreOptions,
    sink: Mutex<Option<Weak<dyn ProxyEventHandler>>>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, CoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn sink(&self) -> Option<Arc<dyn ProxyEventHandler>> {
        self.sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .and_then(Weak::upgrade)
    }
}

/// Mode selection and helper start/stop sequencing
#[derive(Clone)]
pub struct LifecycleCoordinator {
    shared: Arc<Shared>,
}

impl LifecycleCoordinator {
    /// Create a coordinator, reading the persisted mode from the config store
    pub fn new(collaborators: Collaborators, options: CoreOptions) -> Self {
        let initial = collaborators.config.current_mode();
        debug!("Proxy mode coordinator starting in {} mode", initial);

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(CoreState::new(initial)),
                status: StatusSignal::new(),
                collaborators,
                options,
                sink: Mutex::new(None),
            }),
        }
    }

    pub fn current_mode(&self) -> ProxyMode {
        self.shared.state().selector.current_mode()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.shared.status.status()
    }

    /// Mode controls must not accept input
    pub fn locked(&self) -> bool {
        self.status().is_in_progress()
    }

    /// Handle on the shared status signal
    pub fn status_signal(&self) -> StatusSignal {
        self.shared.status.clone()
    }

    pub fn ui_lock(&self) -> UiLockProtocol {
        UiLockProtocol::new(&self.shared.status)
    }

    /// Options to offer in the current state
    pub fn mode_options(&self) -> Vec<ModeOption> {
        view_models::mode_options(
            self.current_mode(),
            self.locked(),
            self.shared.options.http_supported,
        )
    }

    /// Switch to `target`
    ///
    /// Selecting the current mode does nothing. Selecting [`ProxyMode::None`]
    /// stops the helper interactively; any other mode starts it.
    pub fn select(&self, target: ProxyMode) -> Transition {
        if self.current_mode() == target {
            debug!("Proxy mode {} already selected", target);
            return Transition::Unchanged;
        }

        if !target.is_active() {
            return Transition::Stopping(self.stop(true));
        }

        match self.start(target) {
            Ok(handle) => Transition::Starting(handle),
            Err(rejection) => Transition::Rejected(rejection),
        }
    }

    /// Start the helper in `mode`
    ///
    /// Preconditions are checked before anything changes. Once they pass the
    /// mode is switched and the status becomes connecting; the returned task
    /// runs the helper call and settles the status when it finishes.
    pub fn start(&self, mode: ProxyMode) -> Result<JoinHandle<StartReport>, Rejection> {
        let collaborators = &self.shared.collaborators;

        if !mode.is_active() {
            return Err(Rejection::NotAProxyMode);
        }

        if mode.requires_http() && !self.shared.options.http_supported {
            debug!("Ignoring {} mode, HTTP proxy is not supported", mode);
            return Err(Rejection::HttpUnsupported);
        }

        if !collaborators.registry.is_helper_installed() {
            debug!("Helper not installed, dropping start of {} mode", mode);
            return Err(Rejection::HelperNotInstalled);
        }

        if !collaborators.tunnel.is_tunnel_active() {
            info!("Tunnel inactive, not starting {} mode", mode);
            self.emit_event(GuiEvent::ShowNotice(Notice::TunnelInactive));
            return Err(Rejection::TunnelInactive);
        }

        let generation = {
            let mut state = self.shared.state();
            state.selector.apply(mode);
            self.shared.status.publish(true);
            state.next_generation()
        };

        if let Err(e) = collaborators.config.set_mode(mode) {
            warn!("Failed to persist proxy mode {}: {}", mode, e);
        }

        let this = self.clone();
        Ok(tokio::spawn(async move {
            info!("Starting helper in {} mode", mode);
            let result = this.shared.collaborators.helper.start_helper(mode).await;
            if let Err(e) = &result {
                warn!("Helper failed to start in {} mode: {}", mode, e);
            }

            let superseded = !this.settle(generation);
            StartReport {
                mode,
                succeeded: result.is_ok(),
                superseded,
            }
        }))
    }

    /// Stop the helper and switch to [`ProxyMode::None`]
    ///
    /// The returned task reads the helper-DNS setting and emits exactly one
    /// [`GuiEvent::ShowStopConfirmation`].
    pub fn stop(&self, interactive: bool) -> JoinHandle<StopReport> {
        let collaborators = &self.shared.collaborators;

        if let Err(e) = collaborators.config.clear_all_proxies() {
            warn!("Failed to clear proxies: {}", e);
        }

        {
            let mut state = self.shared.state();
            state.selector.apply(ProxyMode::None);
            state.next_generation();
            self.shared.status.publish(false);
        }

        if let Err(e) = collaborators.config.set_mode(ProxyMode::None) {
            warn!("Failed to persist proxy mode {}: {}", ProxyMode::None, e);
        }

        info!("Stopping helper");
        collaborators.helper.stop_helper(interactive);

        let this = self.clone();
        tokio::spawn(async move {
            let combined_message = this.shared.collaborators.config.is_helper_dns().await;
            let delivered = this.emit_event(GuiEvent::ShowStopConfirmation { combined_message });
            StopReport {
                combined_message,
                delivered,
            }
        })
    }

    /// Carry out a button of the stop confirmation dialog
    pub fn handle_stop_dialog_action(&self, action: StopDialogAction) {
        match action {
            StopDialogAction::Dismiss => {}
            StopDialogAction::OpenHelperApp => self.open_helper_app(),
            StopDialogAction::ConfigureDns => {
                self.emit_event(GuiEvent::NavigateToDnsSettings);
            }
        }
    }

    pub fn open_helper_app(&self) {
        debug!("Opening helper app");
        self.shared.collaborators.helper.open_helper_app();
    }

    /// Register the view and keep it rendered
    ///
    /// Emits the current panel, then re-renders on every status change. The
    /// returned task ends once the view has been dropped.
    pub fn attach(&self, sink: &Arc<dyn ProxyEventHandler>) -> JoinHandle<()> {
        let weak = Arc::downgrade(sink);
        *self
            .shared
            .sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(weak.clone());

        let mut lock = self.ui_lock();
        let this = self.clone();
        tokio::spawn(async move {
            let mut state = lock.current();
            loop {
                let update = if state.locked {
                    DisplayUpdate::locked(this.current_mode())
                } else {
                    let is_helper_dns = this.shared.collaborators.config.is_helper_dns().await;
                    if lock.locked() {
                        // Superseded while reading; the next change renders it
                        state = match lock.changed().await {
                            Some(state) => state,
                            None => break,
                        };
                        continue;
                    }
                    DisplayUpdate::settled(this.current_mode(), is_helper_dns)
                };

                match weak.upgrade() {
                    Some(sink) => sink.on_display_changed(update),
                    None => {
                        debug!("View detached, stopping display updates");
                        break;
                    }
                }

                state = match lock.changed().await {
                    Some(state) => state,
                    None => break,
                };
            }
        })
    }

    /// Return the status to idle unless a newer sequence took over
    fn settle(&self, generation: u64) -> bool {
        let state = self.shared.state();
        if state.generation != generation {
            debug!(
                "Sequence {} superseded by {}, leaving status alone",
                generation, state.generation
            );
            return false;
        }
        self.shared.status.publish(false);
        true
    }

    /// Deliver a one-shot event; returns false when no view is attached
    fn emit_event(&self, event: GuiEvent) -> bool {
        match self.shared.sink() {
            Some(sink) => {
                sink.on_event(event);
                true
            }
            None => {
                debug!("No view attached, dropping {:?}", event);
                false
            }
        }
    }
}
