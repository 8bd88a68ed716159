//! External command execution.
//!
//! The completion generator and the self-check both run the freshly
//! installed executable. They do so through [`CommandExecutor`] so tests can
//! script the responses.

use crate::error::{InstallerError, Result};
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gh_flow_installer::command::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("gh-flow", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), gh_flow_installer::error::InstallerError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        log::debug!("running {cmd} {}", args.join(" "));
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(InstallerError::from)
    }
}

/// Summarise captured output for an error message.
///
/// Prefers stderr, falls back to stdout, and trims both.
pub(crate) fn output_excerpt(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_owned();
    }
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}
