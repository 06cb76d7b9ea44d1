//! Seams to the host system.
//!
//! The iterator never spawns processes or touches the filesystem directly.
//! It goes through [`CommandExecutor`] for the install and package steps and
//! through [`ArtefactMover`] for the rename, so tests can drive it without
//! side effects.

use crate::error::{PinpackError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::{Command, Output, Stdio};

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command with arguments to completion and returns the captured
    /// output. Standard input is inherited so interactive prompts still
    /// reach the terminal.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pinpack::executor::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor::default();
    /// let output = executor.run("npm", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), pinpack::error::PinpackError>(())
    /// ```
    fn run<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output>;
}

/// Executes commands on the host system, optionally inside a fixed
/// working directory.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor {
    current_dir: Option<Utf8PathBuf>,
}

impl SystemCommandExecutor {
    /// Create an executor that runs every command inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            current_dir: Some(dir.into()),
        }
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut command = Command::new(cmd);
        command.args(args).stdin(Stdio::inherit());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command.output().map_err(PinpackError::from)
    }
}

/// Abstraction for moving the packaged artefact.
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactMover {
    /// Move `from` to `to`, replacing `to` if it exists.
    ///
    /// # Errors
    ///
    /// Returns the I/O error reported by the platform, for example when
    /// `from` does not exist.
    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> std::io::Result<()>;
}

/// Renames files with [`std::fs::rename`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtefactMover;

impl ArtefactMover for FsArtefactMover {
    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> std::io::Result<()> {
        std::fs::rename(from, to)
    }
}
