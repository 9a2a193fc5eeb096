//! Running the `adb` executable.
//!
//! The adapter talks to devices only through [`CommandRunner`], so tests can
//! script command results without a real `adb` on the host.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::AdbError;

/// Captured result of one finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status 0.
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Executes `adb` with the given arguments.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run one command to completion.
    ///
    /// # Errors
    ///
    /// Returns [`AdbError::Spawn`] when the process cannot be started and
    /// [`AdbError::Timeout`] when it does not finish in time.
    async fn run(&self, args: &[String]) -> Result<CommandOutput, AdbError>;
}

/// [`CommandRunner`] spawning a real child process per call.
///
/// A child that outlives the timeout is killed.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    binary: PathBuf,
    timeout: Duration,
}

impl ProcessRunner {
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput, AdbError> {
        tracing::trace!(binary = %self.binary.display(), ?args, "running adb");
        let child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| AdbError::Timeout {
                timeout: self.timeout,
            })?
            .map_err(|source| AdbError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
