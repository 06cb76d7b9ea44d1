//! CLI argument definitions for pinpack.
//!
//! Kept apart from the binary entrypoint so the parser can be exercised in
//! unit tests.

use crate::config::ConfigOverrides;
use crate::policy::FailurePolicy;
use camino::Utf8PathBuf;
use clap::Parser;

/// Package one artefact per pinned dependency version.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pinpack")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package one artefact per pinned dependency version.\n\n",
    "For every configured version, pinpack installs the dependency at exactly ",
    "that version, runs the project's packaging command, and renames the ",
    "produced artefact so that its filename records the dependency version.\n\n",
    "Settings come from built-in defaults, then pinpack.toml in the project ",
    "directory (or --config), then the flags below.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Package every configured version:\n",
    "    $ pinpack\n\n",
    "  Package two specific versions and stop at the first failure:\n",
    "    $ pinpack -p 1.6.2 -p 1.5.0 --on-failure abort\n\n",
    "  Preview the invocations without running them:\n",
    "    $ pinpack --dry-run\n\n",
    "  Keep a machine-readable record of the run:\n",
    "    $ pinpack --report pinpack-report.json",
))]
pub struct Cli {
    /// Configuration file [default: pinpack.toml in the project directory].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Directory where commands run and artefacts are renamed.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_dir: Option<Utf8PathBuf>,

    /// Dependency to pin at each version.
    #[arg(short, long, value_name = "NAME")]
    pub dependency: Option<String>,

    /// Version to process (repeatable; replaces the configured list).
    #[arg(short = 'p', long = "dep-version", value_name = "VERSION")]
    pub versions: Vec<String>,

    /// Leading part of the artefact filename.
    #[arg(long, value_name = "PREFIX")]
    pub artefact_prefix: Option<String>,

    /// Version embedded in the filename the packaging command writes.
    #[arg(long, value_name = "VERSION")]
    pub target_version: Option<String>,

    /// Artefact file extension, without the dot.
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// What to do when a step fails.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_failure: Option<FailurePolicy>,

    /// Write a JSON report of every step's outcome to this file.
    #[arg(long, value_name = "FILE")]
    pub report: Option<Utf8PathBuf>,

    /// Show the planned invocations and exit without running them.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress the closing summary and log only errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Overrides to layer on top of the configuration file.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            dependency: self.dependency.clone(),
            versions: self.versions.clone(),
            artefact_prefix: self.artefact_prefix.clone(),
            target_version: self.target_version.clone(),
            extension: self.extension.clone(),
            on_failure: self.on_failure,
        }
    }

    /// Log filter implied by `--quiet` and `--verbose`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use pinpack::cli::Cli;
    ///
    /// assert_eq!(Cli::parse_from(["pinpack"]).log_filter(), "warn");
    /// assert_eq!(Cli::parse_from(["pinpack", "-vv"]).log_filter(), "debug");
    /// assert_eq!(Cli::parse_from(["pinpack", "-q"]).log_filter(), "error");
    /// ```
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
