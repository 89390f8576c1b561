// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

//! Mock collaborators for tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proxy_mode_common::{
    ConfigStore, Error, HelperControl, HelperRegistry, ProxyMode, Result, TunnelState,
};
use tokio::sync::Semaphore;

use crate::events::{GuiEvent, ProxyEventHandler};
use crate::lifecycle::{Collaborators, CoreOptions, LifecycleCoordinator};
use crate::view_models::DisplayUpdate;

// ===== MockConfigStore =====

pub struct MockConfigStore {
    mode: Mutex<ProxyMode>,
    helper_dns: AtomicBool,
    clears: AtomicUsize,
}

impl MockConfigStore {
    pub fn new() -> Self {
        Self {
            mode: Mutex::new(ProxyMode::None),
            helper_dns: AtomicBool::new(false),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn set_stored_mode(&self, mode: ProxyMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn stored_mode(&self) -> ProxyMode {
        *self.mode.lock().unwrap()
    }

    pub fn set_helper_dns(&self, value: bool) {
        self.helper_dns.store(value, Ordering::SeqCst);
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigStore for MockConfigStore {
    fn current_mode(&self) -> ProxyMode {
        self.stored_mode()
    }

    fn set_mode(&self, mode: ProxyMode) -> Result<()> {
        self.set_stored_mode(mode);
        Ok(())
    }

    async fn is_helper_dns(&self) -> bool {
        self.helper_dns.load(Ordering::SeqCst)
    }

    fn clear_all_proxies(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ===== MockRegistry / MockTunnel =====

pub struct MockRegistry {
    installed: AtomicBool,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            installed: AtomicBool::new(true),
        }
    }

    pub fn set_installed(&self, value: bool) {
        self.installed.store(value, Ordering::SeqCst);
    }
}

impl HelperRegistry for MockRegistry {
    fn is_helper_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }
}

pub struct MockTunnel {
    active: AtomicBool,
}

impl MockTunnel {
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
        }
    }

    pub fn set_active(&self, value: bool) {
        self.active.store(value, Ordering::SeqCst);
    }
}

impl TunnelState for MockTunnel {
    fn is_tunnel_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

// ===== MockHelper =====

pub struct MockHelper {
    /// When set, start calls wait for `release_start`
    held: AtomicBool,
    releases: Semaphore,
    fail_start: AtomicBool,
    starts: Mutex<Vec<ProxyMode>>,
    stops: Mutex<Vec<bool>>,
    opens: AtomicUsize,
}

impl MockHelper {
    pub fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
            releases: Semaphore::new(0),
            fail_start: AtomicBool::new(false),
            starts: Mutex::new(Vec::new()),
            stops: Mutex::new(Vec::new()),
            opens: AtomicUsize::new(0),
        }
    }

    pub fn hold_starts(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let one held start call finish
    pub fn release_start(&self) {
        self.releases.add_permits(1);
    }

    pub fn fail_starts(&self, value: bool) {
        self.fail_start.store(value, Ordering::SeqCst);
    }

    pub fn started_modes(&self) -> Vec<ProxyMode> {
        self.starts.lock().unwrap().clone()
    }

    pub fn stop_calls(&self) -> Vec<bool> {
        self.stops.lock().unwrap().clone()
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HelperControl for MockHelper {
    async fn start_helper(&self, mode: ProxyMode) -> Result<()> {
        self.starts.lock().unwrap().push(mode);
        if self.held.load(Ordering::SeqCst) {
            self.releases
                .acquire()
                .await
                .map_err(|e| Error::Unknown(e.to_string()))?
                .forget();
        }
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(Error::Helper("start refused".to_string()));
        }
        Ok(())
    }

    fn stop_helper(&self, interactive: bool) {
        self.stops.lock().unwrap().push(interactive);
    }

    fn open_helper_app(&self) {
        self.opens.fetch_add(1, Ordering::SeqCst);
    }
}

// ===== RecordingHandler =====

pub struct RecordingHandler {
    updates: Mutex<Vec<DisplayUpdate>>,
    events: Mutex<Vec<GuiEvent>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            updates: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn updates(&self) -> Vec<DisplayUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn last_update(&self) -> Option<DisplayUpdate> {
        self.updates.lock().unwrap().last().cloned()
    }

    pub fn events(&self) -> Vec<GuiEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProxyEventHandler for RecordingHandler {
    fn on_display_changed(&self, update: DisplayUpdate) {
        self.updates.lock().unwrap().push(update);
    }

    fn on_event(&self, event: GuiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ===== Factories =====

pub struct TestRig {
    pub config: Arc<MockConfigStore>,
    pub registry: Arc<MockRegistry>,
    pub tunnel: Arc<MockTunnel>,
    pub helper: Arc<MockHelper>,
}

impl TestRig {
    /// Helper installed, tunnel up, mode `None`, DNS not via helper
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfigStore::new()),
            registry: Arc::new(MockRegistry::new()),
            tunnel: Arc::new(MockTunnel::new()),
            helper: Arc::new(MockHelper::new()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            config: self.config.clone(),
            registry: self.registry.clone(),
            tunnel: self.tunnel.clone(),
            helper: self.helper.clone(),
        }
    }
}

pub fn coordinator(rig: &TestRig) -> LifecycleCoordinator {
    LifecycleCoordinator::new(rig.collaborators(), CoreOptions::default())
}
