//! Output formatting for the pinpack CLI.
//!
//! Progress markers go to stdout, one per version. Dry-run plans and the
//! closing summary go to stderr so that stdout stays line-per-version.

use crate::matrix::PlannedVersion;
use crate::policy::FailurePolicy;
use crate::version::DependencyVersion;
use camino::Utf8Path;

/// Progress marker printed before a version is processed.
///
/// # Example
///
/// ```
/// use pinpack::output::progress_line;
/// use pinpack::version::DependencyVersion;
///
/// let version = DependencyVersion::parse("1.6.2")?;
/// assert_eq!(progress_line(&version), "=== PROCESSING 1.6.2 ===");
/// # Ok::<(), pinpack::error::PinpackError>(())
/// ```
#[must_use]
pub fn progress_line(version: &DependencyVersion) -> String {
    format!("=== PROCESSING {version} ===")
}

/// Configuration and planned invocations for dry-run output.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Directory where commands would run.
    pub project_dir: &'a Utf8Path,
    /// Dependency being pinned.
    pub dependency: &'a str,
    /// Policy that would apply to failures.
    pub on_failure: FailurePolicy,
    /// Invocations, one entry per version.
    pub plan: &'a [PlannedVersion],
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut lines = vec![
            "Dry run - no commands will be executed".to_owned(),
            String::new(),
            format!("Project directory: {}", self.project_dir),
            format!("Dependency: {}", self.dependency),
            format!("On failure: {}", self.on_failure),
            format!("Versions: {}", self.plan.len()),
        ];

        for entry in self.plan {
            lines.push(String::new());
            lines.push(progress_line(&entry.version));
            lines.push(format!("  {}", entry.install));
            lines.push(format!("  {}", entry.package));
            lines.push(format!(
                "  mv {} {}",
                file_name_or_path(&entry.rename_from),
                file_name_or_path(&entry.rename_to)
            ));
        }

        lines.join("\n")
    }
}

fn file_name_or_path(path: &Utf8Path) -> &str {
    path.file_name().unwrap_or(path.as_str())
}
