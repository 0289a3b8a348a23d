//! Control of the OS service running the application.
//!
//! [`ServiceControl`] returns the exit status of each command rather than
//! failing on a non-zero status: the status of the final start or restart is
//! what the process itself exits with.

use anyhow::Result;
use std::future::Future;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::{ServiceSettings, TemplateVars, render};
use crate::core::DeployError;
use crate::utils::platform::get_shell_command;

/// Stops and starts the managed application.
pub trait ServiceControl: Send + Sync {
    fn stop(&self) -> impl Future<Output = Result<i32>> + Send;

    fn start(&self) -> impl Future<Output = Result<i32>> + Send;

    /// Stop then start. The status of the start is returned; a failing stop
    /// is logged and does not prevent the start.
    fn restart(&self) -> impl Future<Output = Result<i32>> + Send {
        async move {
            let stopped = self.stop().await?;
            if stopped != 0 {
                warn!("Stop command exited with status {stopped}, starting anyway");
            }
            self.start().await
        }
    }
}

/// Runs the configured stop/start command lines through the platform shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellServiceControl {
    stop_command: String,
    start_command: String,
}

impl ShellServiceControl {
    #[must_use]
    pub fn new(stop_command: impl Into<String>, start_command: impl Into<String>) -> Self {
        Self {
            stop_command: stop_command.into(),
            start_command: start_command.into(),
        }
    }

    /// Render the `[service]` templates for one run.
    ///
    /// # Errors
    ///
    /// Returns an error if a template does not render.
    pub fn from_settings(settings: &ServiceSettings, vars: &TemplateVars<'_>) -> Result<Self> {
        Ok(Self::new(render(&settings.stop, vars)?, render(&settings.start, vars)?))
    }

    #[must_use]
    pub fn stop_command(&self) -> &str {
        &self.stop_command
    }

    #[must_use]
    pub fn start_command(&self) -> &str {
        &self.start_command
    }

    async fn run(command: &str) -> Result<i32> {
        let (shell, flag) = get_shell_command();
        info!("Running: {command}");

        let output = Command::new(shell).arg(flag).arg(command).output().await.map_err(|e| {
            DeployError::ServiceCommand {
                command: command.to_string(),
                reason: e.to_string(),
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            debug!("stdout: {}", stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            debug!("stderr: {}", stderr.trim_end());
        }

        // Killed by a signal.
        let code = output.status.code().unwrap_or(1);
        debug!("'{command}' exited with status {code}");
        Ok(code)
    }
}

impl ServiceControl for ShellServiceControl {
    async fn stop(&self) -> Result<i32> {
        Self::run(&self.stop_command).await
    }

    async fn start(&self) -> Result<i32> {
        Self::run(&self.start_command).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_settings_renders_app() {
        let vars = TemplateVars::new("rtb", "release", "bundle-distance");
        let control = ShellServiceControl::from_settings(&ServiceSettings::default(), &vars).unwrap();

        assert_eq!(control.stop_command(), "systemctl stop bundle-distance");
        assert_eq!(control.start_command(), "systemctl start bundle-distance");
    }

    #[tokio::test]
    async fn test_exit_status_is_returned() {
        let control = ShellServiceControl::new("true", "exit 3");

        assert_eq!(control.stop().await.unwrap(), 0);
        assert_eq!(control.start().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_restart_runs_stop_then_start() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("calls.log");
        let control = ShellServiceControl::new(
            format!("echo stop >> '{}'; exit 1", log.display()),
            format!("echo start >> '{}'", log.display()),
        );

        assert_eq!(control.restart().await.unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "stop\nstart\n");
    }
}
