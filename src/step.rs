//! The three steps run for every pinned version and their outcomes.

use serde::Serialize;
use std::fmt;

/// One of the per-version steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Install the dependency pinned to the current version.
    Install,
    /// Run the packaging command.
    Package,
    /// Move the packaged artefact to its version-qualified name.
    Rename,
}

impl Step {
    /// All steps in the order they run.
    pub const ALL: [Self; 3] = [Self::Install, Self::Package, Self::Rename];

    /// Lowercase label used in logs and error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Package => "package",
            Self::Rename => "rename",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepStatus {
    /// The step ran and reported success.
    Succeeded,
    /// The step ran (or failed to start) and reported failure.
    Failed {
        /// Exit status or I/O error, plus trimmed stderr when available.
        reason: String,
    },
    /// The step was not attempted because an earlier step failed.
    Skipped,
}

impl StepStatus {
    /// Returns `true` for [`StepStatus::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns `true` for [`StepStatus::Succeeded`].
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// A fully resolved external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCommand {
    /// Program to execute.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl StepCommand {
    /// Split a configured command vector into program and arguments,
    /// appending `extra` arguments. Returns `None` for an empty vector.
    #[must_use]
    pub fn from_parts(parts: &[String], extra: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.iter().chain(extra).cloned().collect(),
        })
    }

    /// Arguments as string slices, ready for
    /// [`crate::executor::CommandExecutor::run`].
    #[must_use]
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for StepCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
