//! The version iterator.
//!
//! [`PackagingMatrix::run`] walks the configured versions in order and, for
//! each one, prints a progress marker, installs the pinned dependency, runs
//! the packaging command and renames the artefact. Everything is blocking
//! and sequential: the package step of a version only starts once its
//! install has exited, and the next version only starts once the rename of
//! the previous one has returned.

use crate::artefact::ArtefactNaming;
use crate::config::PinpackConfig;
use crate::error::{PinpackError, Result};
use crate::executor::{ArtefactMover, CommandExecutor};
use crate::output::progress_line;
use crate::policy::FailurePolicy;
use crate::report::{RunReport, VersionOutcome};
use crate::step::{Step, StepCommand, StepStatus};
use crate::version::DependencyVersion;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, error, info, warn};
use std::io::Write;
use std::process::Output;

/// One version's worth of planned invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedVersion {
    /// The version to pin.
    pub version: DependencyVersion,
    /// Install invocation.
    pub install: StepCommand,
    /// Packaging invocation.
    pub package: StepCommand,
    /// Artefact written by the packaging command.
    pub rename_from: Utf8PathBuf,
    /// Version-qualified artefact name.
    pub rename_to: Utf8PathBuf,
}

/// Runs install, package and rename for every configured version.
#[derive(Debug, Clone)]
pub struct PackagingMatrix {
    dependency: String,
    versions: Vec<DependencyVersion>,
    naming: ArtefactNaming,
    install: StepCommand,
    package: StepCommand,
    policy: FailurePolicy,
    project_dir: Utf8PathBuf,
}

impl PackagingMatrix {
    /// Build the iterator from a merged configuration.
    ///
    /// Artefact paths are resolved against `project_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PinpackError::InvalidSetting`] when the configuration does
    /// not pass [`PinpackConfig::validate`].
    pub fn from_config(config: &PinpackConfig, project_dir: &Utf8Path) -> Result<Self> {
        config.validate()?;
        let install = StepCommand::from_parts(&config.commands.install, &[]).ok_or(
            PinpackError::InvalidSetting {
                field: "commands.install",
                reason: "must name a program",
            },
        )?;
        let package = StepCommand::from_parts(&config.commands.package, &[]).ok_or(
            PinpackError::InvalidSetting {
                field: "commands.package",
                reason: "must name a program",
            },
        )?;

        Ok(Self {
            dependency: config.dependency.clone(),
            versions: config.versions.clone(),
            naming: config.artefact.clone(),
            install,
            package,
            policy: config.on_failure,
            project_dir: project_dir.to_owned(),
        })
    }

    /// Versions in processing order.
    #[must_use]
    pub fn versions(&self) -> &[DependencyVersion] {
        &self.versions
    }

    /// Policy applied when a step fails.
    #[must_use]
    pub const fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Install invocation pinning the dependency to `version`.
    #[must_use]
    pub fn install_command(&self, version: &DependencyVersion) -> StepCommand {
        let mut command = self.install.clone();
        command.args.push(format!("{}@{version}", self.dependency));
        command
    }

    /// Packaging invocation.
    #[must_use]
    pub const fn package_command(&self) -> &StepCommand {
        &self.package
    }

    /// Every invocation a run would perform, without performing any.
    #[must_use]
    pub fn plan(&self) -> Vec<PlannedVersion> {
        self.versions
            .iter()
            .map(|version| {
                let (rename_from, rename_to) =
                    self.naming
                        .rename_paths(&self.project_dir, &self.dependency, version);
                PlannedVersion {
                    version: version.clone(),
                    install: self.install_command(version),
                    package: self.package.clone(),
                    rename_from,
                    rename_to,
                }
            })
            .collect()
    }

    /// Process every version in order.
    ///
    /// One progress line per version is written to `progress` before its
    /// install starts. Step failures never produce an `Err`: they are logged
    /// and recorded in the returned report, and the failure policy decides
    /// whether the next step runs. Under [`FailurePolicy::Abort`] the report
    /// is returned early with [`RunReport::aborted`] set; use
    /// [`RunReport::abort_error`] to turn it into an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use pinpack::config::PinpackConfig;
    /// use pinpack::matrix::PackagingMatrix;
    /// # use pinpack::executor::{ArtefactMover, CommandExecutor};
    /// # struct Offline;
    /// # impl CommandExecutor for Offline {
    /// #     fn run(&self, _: &str, _: &[&str]) -> pinpack::error::Result<std::process::Output> {
    /// #         Err(std::io::Error::other("offline").into())
    /// #     }
    /// # }
    /// # impl ArtefactMover for Offline {
    /// #     fn rename(&self, _: &camino::Utf8Path, _: &camino::Utf8Path) -> std::io::Result<()> {
    /// #         Err(std::io::Error::other("offline"))
    /// #     }
    /// # }
    ///
    /// let config = PinpackConfig {
    ///     versions: Vec::new(),
    ///     ..PinpackConfig::default()
    /// };
    /// let matrix = PackagingMatrix::from_config(&config, Utf8Path::new("."))?;
    /// let mut progress = Vec::new();
    /// let report = matrix.run(&Offline, &Offline, &mut progress);
    /// assert!(report.outcomes.is_empty());
    /// assert!(progress.is_empty());
    /// # Ok::<(), pinpack::error::PinpackError>(())
    /// ```
    pub fn run(
        &self,
        executor: &dyn CommandExecutor,
        mover: &dyn ArtefactMover,
        progress: &mut dyn Write,
    ) -> RunReport {
        let mut report = RunReport::new(self.dependency.clone(), self.policy);

        for version in &self.versions {
            write_progress(progress, version);
            let outcome = self.process_version(executor, mover, version);
            let stop = self.policy == FailurePolicy::Abort && !outcome.failed_steps().is_empty();
            report.outcomes.push(outcome);
            if stop {
                error!("aborting run after failure on version {version}");
                report.aborted = true;
                break;
            }
        }

        report
    }

    fn process_version(
        &self,
        executor: &dyn CommandExecutor,
        mover: &dyn ArtefactMover,
        version: &DependencyVersion,
    ) -> VersionOutcome {
        let (from, to) = self
            .naming
            .rename_paths(&self.project_dir, &self.dependency, version);
        let mut outcome = VersionOutcome::pending(version.clone(), to.clone());

        for step in Step::ALL {
            let status = match step {
                Step::Install => run_command(executor, &self.install_command(version)),
                Step::Package => run_command(executor, &self.package),
                Step::Rename => rename_artefact(mover, &from, &to),
            };

            let failed = match &status {
                StepStatus::Failed { reason } => {
                    warn!("{step} failed for {}@{version}: {reason}", self.dependency);
                    true
                }
                StepStatus::Succeeded | StepStatus::Skipped => false,
            };
            outcome.set_status(step, status);

            if failed && self.policy != FailurePolicy::Continue {
                if self.policy == FailurePolicy::SkipVersion {
                    info!("skipping remaining steps for version {version}");
                }
                break;
            }
        }

        outcome
    }
}

fn run_command(executor: &dyn CommandExecutor, command: &StepCommand) -> StepStatus {
    info!("running {command}");
    match executor.run(&command.program, &command.arg_refs()) {
        Ok(output) => status_from_output(&output),
        Err(err) => StepStatus::Failed {
            reason: err.to_string(),
        },
    }
}

fn status_from_output(output: &Output) -> StepStatus {
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!("stdout: {}", stdout.trim());
    }

    if output.status.success() {
        return StepStatus::Succeeded;
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let reason = if stderr.is_empty() {
        output.status.to_string()
    } else {
        format!("{}: {stderr}", output.status)
    };
    StepStatus::Failed { reason }
}

fn rename_artefact(mover: &dyn ArtefactMover, from: &Utf8Path, to: &Utf8Path) -> StepStatus {
    info!("renaming {from} to {to}");
    match mover.rename(from, to) {
        Ok(()) => StepStatus::Succeeded,
        Err(err) => StepStatus::Failed {
            reason: err.to_string(),
        },
    }
}

fn write_progress(progress: &mut dyn Write, version: &DependencyVersion) {
    if let Err(err) = writeln!(progress, "{}", progress_line(version)) {
        warn!("failed to write progress for {version}: {err}");
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
