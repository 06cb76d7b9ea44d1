//! Artefact filename computation.
//!
//! The packaging command always writes `<prefix>-<target_version>.<ext>`.
//! After each run that file is moved to
//! `<prefix>-<dependency>@<version>.<ext>`, so every pinned version leaves
//! its own artefact behind.

use crate::version::DependencyVersion;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Naming settings for the artefact produced by the packaging command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtefactNaming {
    /// Leading part of every artefact filename.
    pub prefix: String,
    /// Version of the packaged project itself, as written by the packager.
    pub target_version: String,
    /// File extension without the leading dot.
    pub extension: String,
}

impl Default for ArtefactNaming {
    fn default() -> Self {
        Self {
            prefix: "vslilypond".to_owned(),
            target_version: "1.7.3".to_owned(),
            extension: "vsix".to_owned(),
        }
    }
}

impl ArtefactNaming {
    /// Filename the packaging command produces.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinpack::artefact::ArtefactNaming;
    ///
    /// let naming = ArtefactNaming {
    ///     prefix: "app".to_owned(),
    ///     target_version: "9.9.9".to_owned(),
    ///     extension: "ext".to_owned(),
    /// };
    /// assert_eq!(naming.packaged_file_name(), "app-9.9.9.ext");
    /// ```
    #[must_use]
    pub fn packaged_file_name(&self) -> String {
        format!("{}-{}.{}", self.prefix, self.target_version, self.extension)
    }

    /// Filename the artefact is renamed to once `dependency` was pinned at
    /// `version`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinpack::artefact::ArtefactNaming;
    /// use pinpack::version::DependencyVersion;
    ///
    /// let naming = ArtefactNaming {
    ///     prefix: "app".to_owned(),
    ///     target_version: "9.9.9".to_owned(),
    ///     extension: "ext".to_owned(),
    /// };
    /// let version = DependencyVersion::parse("1.0.0")?;
    /// assert_eq!(naming.pinned_file_name("pkg", &version), "app-pkg@1.0.0.ext");
    /// # Ok::<(), pinpack::error::PinpackError>(())
    /// ```
    #[must_use]
    pub fn pinned_file_name(&self, dependency: &str, version: &DependencyVersion) -> String {
        format!(
            "{}-{}@{}.{}",
            self.prefix, dependency, version, self.extension
        )
    }

    /// Source and destination paths of the rename for one version, rooted
    /// at `project_dir`.
    #[must_use]
    pub fn rename_paths(
        &self,
        project_dir: &Utf8Path,
        dependency: &str,
        version: &DependencyVersion,
    ) -> (Utf8PathBuf, Utf8PathBuf) {
        (
            project_dir.join(self.packaged_file_name()),
            project_dir.join(self.pinned_file_name(dependency, version)),
        )
    }
}
