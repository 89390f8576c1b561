// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Proxy Mode Manager Contributors

// Proxy Mode Manager - Helper process control
// Drives the external helper through its command line

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::HelperConfig;
use crate::error::{Error, Result};
use crate::traits::{HelperControl, HelperRegistry};
use crate::types::ProxyMode;

/// Environment variable telling the helper whether it may show its own UI
pub const INTERACTIVE_ENV: &str = "HELPER_INTERACTIVE";

/// Helper driven through configured shell commands
#[derive(Debug, Clone)]
pub struct CommandHelper {
    config: HelperConfig,
}

impl CommandHelper {
    pub fn new(config: HelperConfig) -> Self {
        Self { config }
    }

    /// Resolve the helper executable, searching PATH for bare names
    pub fn resolve_binary(&self) -> Option<PathBuf> {
        let binary = Path::new(&self.config.binary);
        if binary.components().count() > 1 {
            return binary.is_file().then(|| binary.to_path_buf());
        }

        let path_var = std::env::var_os("PATH")?;
        std::env::split_paths(&path_var)
            .map(|dir| dir.join(binary))
            .find(|candidate| candidate.is_file())
    }

    fn build_command<S: AsRef<OsStr>>(args: &[S]) -> Result<Command> {
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| Error::Config("Helper command is empty".to_string()))?;
        let mut command = Command::new(program);
        command
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Ok(command)
    }

    /// Spawn a command without waiting for it on the caller
    fn spawn_detached(&self, args: &[String], interactive: bool, what: &'static str) {
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("Cannot {} helper outside of a runtime", what);
            return;
        }

        let mut command = match Self::build_command(args) {
            Ok(command) => command,
            Err(e) => {
                warn!("Cannot {} helper: {}", what, e);
                return;
            }
        };
        command
            .env(INTERACTIVE_ENV, if interactive { "1" } else { "0" })
            .kill_on_drop(false);

        match command.spawn() {
            Ok(mut child) => {
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) if status.success() => debug!("Helper {} finished", what),
                        Ok(status) => warn!("Helper {} exited with {}", what, status),
                        Err(e) => warn!("Failed to wait for helper {}: {}", what, e),
                    }
                });
            }
            Err(e) => warn!("Failed to {} helper: {}", what, e),
        }
    }
}

impl HelperRegistry for CommandHelper {
    fn is_helper_installed(&self) -> bool {
        let found = self.resolve_binary();
        debug!("Helper binary {}: {:?}", self.config.binary, found);
        found.is_some()
    }
}

#[async_trait]
impl HelperControl for CommandHelper {
    async fn start_helper(&self, mode: ProxyMode) -> Result<()> {
        let args = self.config.start_command_for(mode);
        info!("Starting helper in {} mode", mode);

        let mut command = Self::build_command(&args)?;
        command.env(INTERACTIVE_ENV, "0");
        let child = command.spawn()?;

        let timeout = Duration::from_secs(self.config.start_timeout_secs);
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::HelperTimeout(self.config.start_timeout_secs))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Helper(format!(
                "start exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        info!("Helper accepted {} mode", mode);
        Ok(())
    }

    fn stop_helper(&self, interactive: bool) {
        info!("Stopping helper (interactive: {})", interactive);
        self.spawn_detached(&self.config.stop_command, interactive, "stop");
    }

    fn open_helper_app(&self) {
        self.spawn_detached(&self.config.open_command, true, "open");
    }
}
