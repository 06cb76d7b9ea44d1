//! Error types for the pinpack CLI.
//!
//! Start-up problems (configuration, invalid versions) and the failure that
//! ends an `abort` run are reported through [`PinpackError`]. Step failures
//! under the other policies never surface here; they are logged and recorded
//! in the run report instead.

use crate::step::Step;
use crate::version::DependencyVersion;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or running pinpack.
#[derive(Debug, Error)]
pub enum PinpackError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found at {path}")]
    ConfigNotFound {
        /// Path that was requested.
        path: Utf8PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {path}")]
    ConfigRead {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::PinpackConfig`].
    #[error("invalid configuration in {path}: {reason}")]
    ConfigParse {
        /// Path of the invalid file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// A version string cannot be used to pin a dependency or name an artefact.
    #[error("invalid dependency version {version:?}: {reason}")]
    InvalidVersion {
        /// The rejected version string.
        version: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A required setting is missing or malformed after merging all sources.
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting {
        /// Name of the offending setting.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A step failed while the `abort` failure policy was active.
    #[error("{step} failed for version {version}: {message}")]
    StepFailed {
        /// The step that failed.
        step: Step,
        /// The version being processed.
        version: DependencyVersion,
        /// Description of the failure.
        message: String,
    },

    /// The JSON run report could not be written.
    #[error("failed to write run report to {path}")]
    ReportWrite {
        /// Destination of the report.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`PinpackError`].
pub type Result<T> = std::result::Result<T, PinpackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_failed_names_step_and_version() {
        let err = PinpackError::StepFailed {
            step: Step::Install,
            version: DependencyVersion::parse("1.5.0").expect("valid version"),
            message: "exit status 1".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("install"));
        assert!(msg.contains("1.5.0"));
        assert!(msg.contains("exit status 1"));
    }

    #[test]
    fn invalid_version_quotes_the_input() {
        let err = PinpackError::InvalidVersion {
            version: "1.0 beta".to_owned(),
            reason: "contains whitespace",
        };
        assert_eq!(
            err.to_string(),
            "invalid dependency version \"1.0 beta\": contains whitespace"
        );
    }

    #[test]
    fn config_read_preserves_source() {
        let err = PinpackError::ConfigRead {
            path: Utf8PathBuf::from("pinpack.toml"),
            source: std::io::Error::other("permission denied"),
        };
        assert!(err.to_string().contains("pinpack.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn report_write_preserves_source() {
        let err = PinpackError::ReportWrite {
            path: Utf8PathBuf::from("/tmp/report.json"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.to_string().contains("report"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
