//! Shared test utilities for pinpack.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! integration tests under `tests/`.

use crate::error::{PinpackError, Result};
use crate::executor::{ArtefactMover, CommandExecutor};
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// A side effect observed by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// An external command was run.
    Command {
        /// Program name.
        program: String,
        /// Arguments in order.
        args: Vec<String>,
    },
    /// A rename was requested.
    Rename {
        /// Source path.
        from: Utf8PathBuf,
        /// Destination path.
        to: Utf8PathBuf,
    },
}

impl HostEvent {
    /// Render the event as a single shell-like line, e.g.
    /// `npm i pkg@1.0.0` or `mv app-9.9.9.ext app-pkg@1.0.0.ext`.
    ///
    /// Rename paths are reduced to their file names.
    #[must_use]
    pub fn line(&self) -> String {
        match self {
            Self::Command { program, args } => std::iter::once(program.as_str())
                .chain(args.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" "),
            Self::Rename { from, to } => format!(
                "mv {} {}",
                from.file_name().unwrap_or(from.as_str()),
                to.file_name().unwrap_or(to.as_str())
            ),
        }
    }
}

/// Records every command and rename, in order, and succeeds unless told
/// otherwise.
#[derive(Debug, Default)]
pub struct RecordingHost {
    events: RefCell<Vec<HostEvent>>,
    failing: Vec<String>,
    unspawnable: Vec<String>,
}

impl RecordingHost {
    /// Create a host on which every command and rename succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every event whose [`HostEvent::line`] contains `needle` fail:
    /// commands exit with status 1, renames return `NotFound`.
    #[must_use]
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.failing.push(needle.into());
        self
    }

    /// Make every command whose line contains `needle` fail to spawn.
    #[must_use]
    pub fn unspawnable(mut self, needle: impl Into<String>) -> Self {
        self.unspawnable.push(needle.into());
        self
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    /// Recorded events rendered with [`HostEvent::line`].
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events.borrow().iter().map(HostEvent::line).collect()
    }

    fn record(&self, event: HostEvent) -> String {
        let line = event.line();
        self.events.borrow_mut().push(event);
        line
    }

    fn matches(needles: &[String], line: &str) -> bool {
        needles.iter().any(|needle| line.contains(needle.as_str()))
    }
}

impl CommandExecutor for RecordingHost {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let line = self.record(HostEvent::Command {
            program: cmd.to_owned(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
        });

        if Self::matches(&self.unspawnable, &line) {
            return Err(PinpackError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{cmd}: command not found"),
            )));
        }
        if Self::matches(&self.failing, &line) {
            return Ok(failure_output(&format!("{line} failed")));
        }
        Ok(success_output())
    }
}

impl ArtefactMover for RecordingHost {
    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> std::io::Result<()> {
        let line = self.record(HostEvent::Rename {
            from: from.to_owned(),
            to: to.to_owned(),
        });

        if Self::matches(&self.failing, &line) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{from}: no such file"),
            ));
        }
        Ok(())
    }
}
