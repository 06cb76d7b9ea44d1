//! What the iterator does after a step fails.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reaction to a failed install, package or rename step.
///
/// Under [`FailurePolicy::Continue`] a failed install still lets the
/// packaging step run against whatever version is installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log the failure and attempt the next step anyway.
    #[default]
    Continue,
    /// Skip the remaining steps of the failing version, then carry on with
    /// the next version.
    SkipVersion,
    /// Stop the whole run at the first failure.
    Abort,
}

impl FailurePolicy {
    /// Kebab-case name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::SkipVersion => "skip-version",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
