// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

//! Shared "helper is (dis)connecting" signal
//!
//! Backed by a `watch` channel: every reader sees the latest value, older
//! values are never buffered. The coordinator is the writer; anything that
//! tracks the helper's own status stream may publish through a clone too.

use std::sync::Arc;

use proxy_mode_common::ConnectionStatus;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct StatusSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for StatusSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSignal {
    /// Create a signal in the idle state
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Publish a new value, waking every subscriber even if it is unchanged
    pub fn publish(&self, connecting: bool) {
        self.tx.send_replace(connecting);
    }

    pub fn is_connecting(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus::from_connecting(self.is_connecting())
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let signal = StatusSignal::new();
        assert_eq!(signal.status(), ConnectionStatus::Idle);

        signal.publish(true);
        assert!(signal.is_connecting());
        assert_eq!(signal.status(), ConnectionStatus::Connecting);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let signal = StatusSignal::new();
        let mut rx = signal.subscribe();

        signal.publish(true);
        signal.publish(false);
        signal.publish(true);

        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let signal = StatusSignal::new();
        let external = signal.clone();
        let mut rx = signal.subscribe();

        external.publish(true);
        rx.changed().await.unwrap();
        assert!(signal.is_connecting());
    }
}
