//! Configuration loading for pinpack.
//!
//! Settings are layered: built-in defaults (the `vslilypond` extension's
//! packaging run against `jzz-midi-smf`), then an optional
//! `pinpack.toml`, then command-line overrides. Every table and field in the
//! TOML file is optional; unknown keys are rejected so typos surface early.

use crate::artefact::ArtefactNaming;
use crate::error::{PinpackError, Result};
use crate::policy::FailurePolicy;
use crate::version::{DependencyVersion, parse_versions};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::{Deserialize, Serialize};

/// Name of the configuration file discovered in the project directory.
pub const CONFIG_FILE_NAME: &str = "pinpack.toml";

/// Dependency pinned by default.
pub const DEFAULT_DEPENDENCY: &str = "jzz-midi-smf";

/// Versions processed by default, newest first.
pub const DEFAULT_VERSIONS: &[&str] = &[
    "1.6.2", "1.6.1", "1.6.0", "1.5.9", "1.5.8", "1.5.7", "1.5.6", "1.5.5", "1.5.4", "1.5.3",
    "1.5.2", "1.5.1", "1.5.0",
];

/// External commands used by the install and package steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandConfig {
    /// Install command; `<dependency>@<version>` is appended as the final
    /// argument.
    pub install: Vec<String>,
    /// Packaging command, run without extra arguments.
    pub package: Vec<String>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            install: vec!["npm".to_owned(), "i".to_owned()],
            package: vec!["npm".to_owned(), "run".to_owned(), "package".to_owned()],
        }
    }
}

/// Complete pinpack configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinpackConfig {
    /// Package pinned at each iteration.
    pub dependency: String,
    /// Versions to process, in order. Duplicates are processed again.
    pub versions: Vec<DependencyVersion>,
    /// Reaction to failed steps.
    pub on_failure: FailurePolicy,
    /// Naming of the packaged artefact.
    pub artefact: ArtefactNaming,
    /// External commands.
    pub commands: CommandConfig,
}

impl Default for PinpackConfig {
    fn default() -> Self {
        Self {
            dependency: DEFAULT_DEPENDENCY.to_owned(),
            versions: DEFAULT_VERSIONS
                .iter()
                .filter_map(|raw| DependencyVersion::parse(*raw).ok())
                .collect(),
            on_failure: FailurePolicy::default(),
            artefact: ArtefactNaming::default(),
            commands: CommandConfig::default(),
        }
    }
}

/// Values supplied on the command line that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replacement dependency name.
    pub dependency: Option<String>,
    /// Replacement version list; an empty list leaves the configured one.
    pub versions: Vec<String>,
    /// Replacement artefact prefix.
    pub artefact_prefix: Option<String>,
    /// Replacement artefact target version.
    pub target_version: Option<String>,
    /// Replacement artefact extension.
    pub extension: Option<String>,
    /// Replacement failure policy.
    pub on_failure: Option<FailurePolicy>,
}

impl PinpackConfig {
    /// Parse configuration from TOML text. `origin` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`PinpackError::ConfigParse`] for malformed TOML, unknown
    /// keys, or invalid version strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use pinpack::config::PinpackConfig;
    ///
    /// let config = PinpackConfig::from_toml_str(
    ///     "versions = [\"1.0.0\"]\n[artefact]\nprefix = \"app\"\n",
    ///     Utf8Path::new("pinpack.toml"),
    /// )?;
    /// assert_eq!(config.artefact.prefix, "app");
    /// assert_eq!(config.artefact.extension, "vsix");
    /// # Ok::<(), pinpack::error::PinpackError>(())
    /// ```
    pub fn from_toml_str(contents: &str, origin: &Utf8Path) -> Result<Self> {
        toml::from_str(contents).map_err(|err| PinpackError::ConfigParse {
            path: origin.to_owned(),
            reason: err.to_string().trim().to_owned(),
        })
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PinpackError::ConfigNotFound`] when the file is missing,
    /// [`PinpackError::ConfigRead`] when it cannot be read, and
    /// [`PinpackError::ConfigParse`] when it is invalid.
    pub fn load_from_path(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                PinpackError::ConfigNotFound {
                    path: path.to_owned(),
                }
            } else {
                PinpackError::ConfigRead {
                    path: path.to_owned(),
                    source,
                }
            }
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Load the explicit file when given, otherwise `pinpack.toml` from
    /// `project_dir` when present, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::load_from_path`]. A missing explicit
    /// file is an error; a missing discovered file is not.
    pub fn discover(project_dir: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("loading configuration from {path}");
            return Self::load_from_path(path);
        }

        let candidate = project_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!("loading configuration from {candidate}");
            Self::load_from_path(&candidate)
        } else {
            debug!("no {CONFIG_FILE_NAME} in {project_dir}; using defaults");
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides on top of this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PinpackError::InvalidVersion`] when an overriding version
    /// is invalid.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(dependency) = &overrides.dependency {
            self.dependency.clone_from(dependency);
        }
        if !overrides.versions.is_empty() {
            self.versions = parse_versions(&overrides.versions)?;
        }
        if let Some(prefix) = &overrides.artefact_prefix {
            self.artefact.prefix.clone_from(prefix);
        }
        if let Some(target_version) = &overrides.target_version {
            self.artefact.target_version.clone_from(target_version);
        }
        if let Some(extension) = &overrides.extension {
            self.artefact.extension.clone_from(extension);
        }
        if let Some(policy) = overrides.on_failure {
            self.on_failure = policy;
        }
        Ok(())
    }

    /// Check the merged configuration for empty or unusable settings.
    ///
    /// An empty version list is valid and yields a run that does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PinpackError::InvalidSetting`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<()> {
        let non_empty: [(&'static str, &str); 4] = [
            ("dependency", &self.dependency),
            ("artefact.prefix", &self.artefact.prefix),
            ("artefact.target_version", &self.artefact.target_version),
            ("artefact.extension", &self.artefact.extension),
        ];
        for (field, value) in non_empty {
            if value.trim().is_empty() {
                return Err(PinpackError::InvalidSetting {
                    field,
                    reason: "must not be empty",
                });
            }
        }

        if self.dependency.contains(['/', '\\']) {
            return Err(PinpackError::InvalidSetting {
                field: "dependency",
                reason: "must not contain a path separator",
            });
        }
        if self.dependency.contains('@') || self.dependency.chars().any(char::is_whitespace) {
            return Err(PinpackError::InvalidSetting {
                field: "dependency",
                reason: "must not contain `@` or whitespace",
            });
        }

        for (field, command) in [
            ("commands.install", &self.commands.install),
            ("commands.package", &self.commands.package),
        ] {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(PinpackError::InvalidSetting {
                    field,
                    reason: "must name a program",
                });
            }
        }

        Ok(())
    }
}

/// Resolve the project directory: the explicit one when given, otherwise
/// the current working directory.
///
/// # Errors
///
/// Returns [`PinpackError::Io`] when the current directory cannot be read,
/// or [`PinpackError::InvalidSetting`] when it is not valid UTF-8.
pub fn resolve_project_dir(explicit: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_owned());
    }
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|_| PinpackError::InvalidSetting {
        field: "project_dir",
        reason: "current directory is not valid UTF-8",
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
