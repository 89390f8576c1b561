// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

//! Interaction lock derived from the connecting signal

use tokio::sync::watch;

use crate::status::StatusSignal;
use crate::view_models::TRYING_TO_CONNECT;

/// What the view must do with the mode controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockState {
    pub locked: bool,
    /// Status line to show while locked
    pub message: Option<&'static str>,
}

impl LockState {
    fn from_connecting(connecting: bool) -> Self {
        Self {
            locked: connecting,
            message: connecting.then_some(TRYING_TO_CONNECT),
        }
    }
}

/// Reader of the status signal that reports the lock state
#[derive(Debug, Clone)]
pub struct UiLockProtocol {
    rx: watch::Receiver<bool>,
}

impl UiLockProtocol {
    pub fn new(signal: &StatusSignal) -> Self {
        Self {
            rx: signal.subscribe(),
        }
    }

    pub fn locked(&self) -> bool {
        *self.rx.borrow()
    }

    pub fn lock_state(&self) -> LockState {
        LockState::from_connecting(self.locked())
    }

    /// Latest lock state, marking it as seen
    pub fn current(&mut self) -> LockState {
        LockState::from_connecting(*self.rx.borrow_and_update())
    }

    /// Wait for the next published status
    ///
    /// Returns `None` once the signal is gone.
    pub async fn changed(&mut self) -> Option<LockState> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }
}
