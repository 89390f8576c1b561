// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

// Terminal rendering of the proxy panel

use std::sync::Mutex;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use proxy_mode_gui_core::{DisplayUpdate, GuiEvent, IconState, ProxyEventHandler};

/// View that shows a spinner while locked and queues dialogs for the caller
///
/// Dialogs cannot block inside the callback, so the stop confirmation is kept
/// until the command asks for it.
#[derive(Default)]
pub struct TerminalView {
    spinner: Mutex<Option<ProgressBar>>,
    pending_confirmation: Mutex<Option<bool>>,
    dns_navigation: Mutex<bool>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop confirmation received since the last call, if any
    pub fn take_stop_confirmation(&self) -> Option<bool> {
        self.pending_confirmation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    /// Whether the user asked to go to the DNS settings
    pub fn wants_dns_settings(&self) -> bool {
        *self
            .dns_navigation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Clear the spinner if one is still running
    pub fn finish(&self) {
        if let Some(spinner) = self
            .spinner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            spinner.finish_and_clear();
        }
    }
}

impl ProxyEventHandler for TerminalView {
    fn on_display_changed(&self, update: DisplayUpdate) {
        let mut spinner = self
            .spinner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if update.locked {
            let bar = spinner.get_or_insert_with(|| {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{spinner:.cyan} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            });
            bar.set_message(format!("{} ({})", update.text, update.mode.label()));
        } else if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }
    }

    fn on_event(&self, event: GuiEvent) {
        match event {
            GuiEvent::ShowStopConfirmation { combined_message } => {
                *self
                    .pending_confirmation
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(combined_message);
            }
            GuiEvent::ShowNotice(notice) => {
                eprintln!("{}", notice.message().yellow());
            }
            GuiEvent::NavigateToDnsSettings => {
                *self
                    .dns_navigation
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = true;
            }
        }
    }
}

/// Print a settled panel line
pub fn print_display(update: &DisplayUpdate) {
    let marker = match update.icon {
        IconState::Enabled => "●".green(),
        IconState::Disabled => "○".dimmed(),
        IconState::Animating => "◌".cyan(),
    };
    println!("{} {} {}", marker, update.mode.label().bold(), update.text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxy_mode_gui_core::{Notice, ProxyMode};

    #[test]
    fn test_spinner_follows_lock() {
        let view = TerminalView::new();
        view.on_display_changed(DisplayUpdate::locked(ProxyMode::Socks5));
        assert!(view.spinner.lock().unwrap().is_some());

        view.on_display_changed(DisplayUpdate::settled(ProxyMode::Socks5, false));
        assert!(view.spinner.lock().unwrap().is_none());
    }

    #[test]
    fn test_confirmation_is_taken_once() {
        let view = TerminalView::new();
        view.on_event(GuiEvent::ShowNotice(Notice::TunnelInactive));
        assert_eq!(view.take_stop_confirmation(), None);

        view.on_event(GuiEvent::ShowStopConfirmation {
            combined_message: true,
        });
        assert_eq!(view.take_stop_confirmation(), Some(true));
        assert_eq!(view.take_stop_confirmation(), None);
    }

    #[test]
    fn test_dns_navigation() {
        let view = TerminalView::new();
        assert!(!view.wants_dns_settings());
        view.on_event(GuiEvent::NavigateToDnsSettings);
        assert!(view.wants_dns_settings());
    }
}
