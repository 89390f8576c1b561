// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

//! Framework-agnostic selection state

use proxy_mode_common::ProxyMode;

/// Owner of the current proxy mode
///
/// The mode is a single value, so switching replaces it in one step and no
/// observer can ever see zero or several modes selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProxyModeSelector {
    current: ProxyMode,
}

impl ProxyModeSelector {
    pub fn new(initial: ProxyMode) -> Self {
        Self { current: initial }
    }

    pub fn current_mode(&self) -> ProxyMode {
        self.current
    }

    /// Make `target` the current mode
    ///
    /// Returns the previous mode, or `None` when `target` was already current.
    pub fn apply(&mut self, target: ProxyMode) -> Option<ProxyMode> {
        if self.current == target {
            return None;
        }
        Some(std::mem::replace(&mut self.current, target))
    }
}

/// State guarded by the coordinator's lock
#[derive(Debug, Default)]
pub(crate) struct CoreState {
    pub(crate) selector: ProxyModeSelector,
    /// Bumped by every start/stop sequence; only the latest may settle the status
    pub(crate) generation: u64,
}

impl CoreState {
    pub(crate) fn new(initial: ProxyMode) -> Self {
        Self {
            selector: ProxyModeSelector::new(initial),
            generation: 0,
        }
    }

    /// Begin a new sequence, superseding any in flight
    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_replaces_mode() {
        let mut selector = ProxyModeSelector::default();
        assert_eq!(selector.current_mode(), ProxyMode::None);

        assert_eq!(selector.apply(ProxyMode::Http), Some(ProxyMode::None));
        assert_eq!(selector.current_mode(), ProxyMode::Http);

        assert_eq!(selector.apply(ProxyMode::Socks5Http), Some(ProxyMode::Http));
        assert_eq!(selector.current_mode(), ProxyMode::Socks5Http);
    }

    #[test]
    fn test_apply_same_mode_is_noop() {
        let mut selector = ProxyModeSelector::new(ProxyMode::Socks5);
        assert_eq!(selector.apply(ProxyMode::Socks5), None);
        assert_eq!(selector.current_mode(), ProxyMode::Socks5);
    }

    #[test]
    fn test_generations_increase() {
        let mut state = CoreState::new(ProxyMode::None);
        let first = state.next_generation();
        let second = state.next_generation();
        assert!(second > first);
        assert_eq!(state.generation, second);
    }
}
