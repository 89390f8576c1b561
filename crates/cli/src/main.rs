// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

// Proxy Mode Manager - CLI Client
// Command-line front end for choosing how the helper proxies traffic

mod config;
mod terminal;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Select;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proxy_mode_common::{ConfigStore, HelperRegistry, TunnelState};
use proxy_mode_gui_core::{
    stop_confirmation_message, stop_dialog_actions, ConnectionStatus, DisplayUpdate,
    ProxyEventHandler, ProxyMode, Rejection, StopDialogAction, Transition,
};

use config::Session;
use terminal::{print_display, TerminalView};

#[derive(Parser)]
#[command(name = "proxy-mode")]
#[command(about = "Choose how the helper proxies this device's traffic", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the selected mode and helper status
    Status {
        /// Output as JSON for scripting
        #[arg(short, long)]
        json: bool,
    },

    /// List the available modes
    Modes,

    /// Switch to a proxy mode (none, socks5, http, both)
    Select {
        #[arg(value_parser = parse_mode)]
        mode: ProxyMode,

        /// Start the helper again even if the mode is already selected
        #[arg(short, long)]
        restart: bool,
    },

    /// Stop the helper and disable the proxy
    Stop {
        /// Do not let the helper show its own UI, skip the confirmation
        #[arg(short = 'y', long)]
        non_interactive: bool,
    },

    /// Bring the helper's own UI to the front
    Open,
}

#[derive(Serialize)]
struct StatusReport {
    mode: ProxyMode,
    status: ConnectionStatus,
    dns_via_helper: bool,
    helper_installed: bool,
    tunnel_active: bool,
    display: DisplayUpdate,
}

fn parse_mode(value: &str) -> std::result::Result<ProxyMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "none" | "off" | "disabled" => Ok(ProxyMode::None),
        "socks5" => Ok(ProxyMode::Socks5),
        "http" => Ok(ProxyMode::Http),
        "both" | "socks5http" | "http_socks5" | "socks5+http" => Ok(ProxyMode::Socks5Http),
        other => Err(format!(
            "unknown mode '{}' (expected none, socks5, http or both)",
            other
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "proxy_mode=debug"
    } else {
        "proxy_mode=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = config::resolve_config_path(cli.config)?;
    let session = Session::open(config_path)?;
    debug!(
        "Using settings {} (mode {})",
        session.config_path.display(),
        session.coordinator.current_mode()
    );

    match cli.command {
        Commands::Status { json } => show_status(&session, json).await?,
        Commands::Modes => list_modes(&session),
        Commands::Select { mode, restart } => select_mode(&session, mode, restart).await?,
        Commands::Stop { non_interactive } => stop_helper(&session, !non_interactive).await?,
        Commands::Open => {
            session.coordinator.open_helper_app();
            println!("{}", "Asked the helper to show itself".dimmed());
        }
    }

    Ok(())
}

async fn current_display(session: &Session) -> DisplayUpdate {
    let coordinator = &session.coordinator;
    if coordinator.locked() {
        DisplayUpdate::locked(coordinator.current_mode())
    } else {
        DisplayUpdate::settled(coordinator.current_mode(), session.store.is_helper_dns().await)
    }
}

async fn show_status(session: &Session, json: bool) -> Result<()> {
    let display = current_display(session).await;

    if json {
        let report = StatusReport {
            mode: session.coordinator.current_mode(),
            status: session.coordinator.status(),
            dns_via_helper: session.store.is_helper_dns().await,
            helper_installed: session.registry.is_helper_installed(),
            tunnel_active: session.tunnel.is_tunnel_active(),
            display,
        };
        let output =
            serde_json::to_string_pretty(&report).context("Failed to serialize status")?;
        println!("{}", output);
        return Ok(());
    }

    print_display(&display);
    if !session.registry.is_helper_installed() {
        println!(
            "{}",
            format!("Helper '{}' is not installed", session.config.helper.binary).yellow()
        );
    }
    if !session.tunnel.is_tunnel_active() {
        println!(
            "{}",
            format!("Tunnel interface '{}' is down", session.config.tunnel.interface).yellow()
        );
    }
    println!(
        "{}",
        format!("Settings: {}", session.config_path.display()).dimmed()
    );
    Ok(())
}

fn list_modes(session: &Session) {
    for option in session.coordinator.mode_options() {
        let marker = if option.selected {
            "●".green()
        } else {
            "○".normal()
        };
        println!("{} {}", marker, option.label.bold());
        println!("    {}", option.description.dimmed());
    }
}

/// Select `mode`, or start the helper again in it when `restart` is set
///
/// A failed start leaves the mode selected, so a plain re-selection would be
/// a no-op.
fn request_mode(session: &Session, mode: ProxyMode, restart: bool) -> Transition {
    let coordinator = &session.coordinator;
    if restart && mode.is_active() && coordinator.current_mode() == mode {
        debug!("Restarting helper in {} mode", mode);
        return match coordinator.start(mode) {
            Ok(handle) => Transition::Starting(handle),
            Err(rejection) => Transition::Rejected(rejection),
        };
    }
    coordinator.select(mode)
}

async fn select_mode(session: &Session, mode: ProxyMode, restart: bool) -> Result<()> {
    let view = Arc::new(TerminalView::new());
    let sink: Arc<dyn ProxyEventHandler> = view.clone();
    let _render = session.coordinator.attach(&sink);

    match request_mode(session, mode, restart) {
        Transition::Unchanged => {
            println!("{}", format!("{} is already selected", mode.label()).dimmed());
            if mode.is_active() {
                println!(
                    "{}",
                    "Pass --restart to start the helper in this mode again".dimmed()
                );
            }
        }
        Transition::Rejected(rejection) => {
            // The tunnel notice has already been shown by the view
            match rejection {
                Rejection::HelperNotInstalled => println!(
                    "{}",
                    format!("Helper '{}' is not installed", session.config.helper.binary)
                        .yellow()
                ),
                Rejection::HttpUnsupported => println!(
                    "{}",
                    "HTTP proxy modes are not supported on this system".yellow()
                ),
                Rejection::TunnelInactive | Rejection::NotAProxyMode => {}
            }
        }
        Transition::Starting(handle) => {
            let report = handle.await.context("Start task failed")?;
            view.finish();
            if !report.succeeded {
                println!(
                    "{}",
                    format!(
                        "The helper did not confirm the start; run `proxy-mode select {} --restart` to retry",
                        mode.as_str().to_ascii_lowercase()
                    )
                    .yellow()
                );
            }
        }
        Transition::Stopping(handle) => {
            let report = handle.await.context("Stop task failed")?;
            view.finish();
            confirm_stop(session, &view, report.combined_message)?;
        }
    }

    print_display(&current_display(session).await);
    Ok(())
}

async fn stop_helper(session: &Session, interactive: bool) -> Result<()> {
    let view = Arc::new(TerminalView::new());
    let sink: Arc<dyn ProxyEventHandler> = view.clone();
    let _render = session.coordinator.attach(&sink);

    let report = session
        .coordinator
        .stop(interactive)
        .await
        .context("Stop task failed")?;
    view.finish();

    if interactive {
        confirm_stop(session, &view, report.combined_message)?;
    }

    print_display(&current_display(session).await);
    Ok(())
}

/// Show the stop confirmation and carry out the chosen button
fn confirm_stop(session: &Session, view: &TerminalView, fallback: bool) -> Result<()> {
    let combined_message = view.take_stop_confirmation().unwrap_or(fallback);
    println!("{}", "Helper stopped".green().bold());
    println!("{}", stop_confirmation_message(combined_message));

    let actions = stop_dialog_actions(combined_message);
    let action = if std::io::stdin().is_terminal() {
        let labels: Vec<&str> = actions.iter().map(|action| action.label()).collect();
        let choice = Select::new()
            .items(&labels)
            .default(0)
            .interact()
            .context("Failed to read selection")?;
        actions[choice]
    } else {
        StopDialogAction::Dismiss
    };

    session.coordinator.handle_stop_dialog_action(action);

    if view.wants_dns_settings() {
        println!(
            "Set {} in {} to stop resolving DNS through the helper",
            "proxy.dns_via_helper = false".bold(),
            session.config_path.display()
        );
    }
    Ok(())
}
