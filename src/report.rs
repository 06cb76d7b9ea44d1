//! Per-version outcomes collected during a run.
//!
//! The report is what replaces "inspect the directory by hand afterwards":
//! it records, for every processed version, whether each step succeeded,
//! failed or was skipped, and which artefact path it should have produced.

use crate::error::{PinpackError, Result};
use crate::policy::FailurePolicy;
use crate::step::{Step, StepStatus};
use crate::version::DependencyVersion;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

/// Outcome of processing one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionOutcome {
    /// The version that was pinned.
    pub version: DependencyVersion,
    /// Destination of the rename step.
    pub artefact: Utf8PathBuf,
    /// Outcome of the install step.
    pub install: StepStatus,
    /// Outcome of the package step.
    pub package: StepStatus,
    /// Outcome of the rename step.
    pub rename: StepStatus,
}

impl VersionOutcome {
    /// Create an outcome with every step still marked as skipped.
    #[must_use]
    pub fn pending(version: DependencyVersion, artefact: Utf8PathBuf) -> Self {
        Self {
            version,
            artefact,
            install: StepStatus::Skipped,
            package: StepStatus::Skipped,
            rename: StepStatus::Skipped,
        }
    }

    /// Status of `step`.
    #[must_use]
    pub const fn status(&self, step: Step) -> &StepStatus {
        match step {
            Step::Install => &self.install,
            Step::Package => &self.package,
            Step::Rename => &self.rename,
        }
    }

    /// Record the status of `step`.
    pub fn set_status(&mut self, step: Step, status: StepStatus) {
        match step {
            Step::Install => self.install = status,
            Step::Package => self.package = status,
            Step::Rename => self.rename = status,
        }
    }

    /// Returns `true` when every step succeeded.
    ///
    /// This only says the commands reported success; it cannot prove the
    /// artefact was built against the pinned version.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        Step::ALL.iter().all(|step| self.status(*step).is_succeeded())
    }

    /// Steps that failed, in execution order.
    #[must_use]
    pub fn failed_steps(&self) -> Vec<Step> {
        Step::ALL
            .into_iter()
            .filter(|step| self.status(*step).is_failed())
            .collect()
    }
}

/// Everything that happened during one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// The dependency that was pinned.
    pub dependency: String,
    /// Policy in force during the run.
    pub on_failure: FailurePolicy,
    /// One entry per processed version, in processing order.
    pub outcomes: Vec<VersionOutcome>,
    /// `true` when the `abort` policy stopped the run early.
    pub aborted: bool,
}

impl RunReport {
    /// Create an empty report.
    #[must_use]
    pub fn new(dependency: impl Into<String>, on_failure: FailurePolicy) -> Self {
        Self {
            dependency: dependency.into(),
            on_failure,
            outcomes: Vec::new(),
            aborted: false,
        }
    }

    /// Number of versions whose every step succeeded.
    #[must_use]
    pub fn clean_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_clean()).count()
    }

    /// Number of versions with at least one failed step.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| !o.failed_steps().is_empty())
            .count()
    }

    /// The failure that stopped an aborted run, if any.
    ///
    /// Returns `None` unless [`Self::aborted`] is set.
    #[must_use]
    pub fn abort_error(&self) -> Option<PinpackError> {
        if !self.aborted {
            return None;
        }
        let outcome = self.outcomes.last()?;
        let step = outcome.failed_steps().into_iter().next()?;
        let message = match outcome.status(step) {
            StepStatus::Failed { reason } => reason.clone(),
            StepStatus::Succeeded | StepStatus::Skipped => String::new(),
        };
        Some(PinpackError::StepFailed {
            step,
            version: outcome.version.clone(),
            message,
        })
    }

    /// One-line human summary of the run.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinpack::policy::FailurePolicy;
    /// use pinpack::report::RunReport;
    ///
    /// let report = RunReport::new("pkg", FailurePolicy::Continue);
    /// assert_eq!(report.summary(), "Packaged 0 of 0 version(s)");
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        let total = self.outcomes.len();
        let clean = self.clean_count();
        let failures = self.failure_count();
        let mut line = format!("Packaged {clean} of {total} version(s)");
        if failures > 0 {
            line.push_str(&format!("; {failures} with failures"));
        }
        if self.aborted {
            line.push_str("; run aborted");
        }
        line
    }

    /// Serialise the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PinpackError::Io`] if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| PinpackError::Io(err.into()))
    }

    /// Write the JSON report to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PinpackError::ReportWrite`] if the file cannot be written.
    pub fn write_json(&self, path: &Utf8Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| PinpackError::ReportWrite {
            path: path.to_owned(),
            source,
        })
    }
}
