//! Validated dependency version strings.
//!
//! A version is pasted into both a package-manager argument
//! (`<dependency>@<version>`) and a filename, so it must not contain
//! whitespace, path separators or `@`. No semantic-version parsing is done:
//! the package manager is the authority on what a version means.

use crate::error::{PinpackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency version identifier such as `1.6.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DependencyVersion(String);

impl DependencyVersion {
    /// Validate and wrap a version string.
    ///
    /// # Errors
    ///
    /// Returns [`PinpackError::InvalidVersion`] when the string is empty or
    /// contains whitespace, a path separator or `@`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinpack::version::DependencyVersion;
    ///
    /// let version = DependencyVersion::parse("1.6.2")?;
    /// assert_eq!(version.as_str(), "1.6.2");
    /// assert!(DependencyVersion::parse("../1.0").is_err());
    /// # Ok::<(), pinpack::error::PinpackError>(())
    /// ```
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        match rejection_reason(&raw) {
            Some(reason) => Err(PinpackError::InvalidVersion {
                version: raw,
                reason,
            }),
            None => Ok(Self(raw)),
        }
    }

    /// Get the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn rejection_reason(raw: &str) -> Option<&'static str> {
    if raw.is_empty() {
        Some("must not be empty")
    } else if raw.chars().any(char::is_whitespace) {
        Some("contains whitespace")
    } else if raw.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if raw.contains('@') {
        Some("contains `@`")
    } else {
        None
    }
}

/// Parse every string in order, stopping at the first invalid one.
///
/// # Errors
///
/// Returns the first [`PinpackError::InvalidVersion`] encountered.
pub fn parse_versions<S: AsRef<str>>(raw: &[S]) -> Result<Vec<DependencyVersion>> {
    raw.iter()
        .map(|s| DependencyVersion::parse(s.as_ref()))
        .collect()
}

impl TryFrom<String> for DependencyVersion {
    type Error = PinpackError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<DependencyVersion> for String {
    fn from(value: DependencyVersion) -> Self {
        value.0
    }
}

impl AsRef<str> for DependencyVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DependencyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.6.2")]
    #[case("2.0.0-beta.1")]
    #[case("latest")]
    fn accepts_plain_versions(#[case] raw: &str) {
        let version = DependencyVersion::parse(raw).expect("version should be accepted");
        assert_eq!(version.to_string(), raw);
    }

    #[rstest]
    #[case("", "must not be empty")]
    #[case("1.0 beta", "contains whitespace")]
    #[case("1.0/2", "contains a path separator")]
    #[case("..\\1.0", "contains a path separator")]
    #[case("pkg@1.0", "contains `@`")]
    fn rejects_unsafe_versions(#[case] raw: &str, #[case] expected: &str) {
        let err = DependencyVersion::parse(raw).expect_err("version should be rejected");
        assert!(
            matches!(err, PinpackError::InvalidVersion { reason, .. } if reason == expected),
            "unexpected rejection for {raw:?}"
        );
    }

    #[test]
    fn parse_versions_keeps_order_and_duplicates() {
        let versions = parse_versions(&["1.0.0", "2.0.0", "1.0.0"]).expect("valid list");
        let rendered: Vec<&str> = versions.iter().map(DependencyVersion::as_str).collect();
        assert_eq!(rendered, ["1.0.0", "2.0.0", "1.0.0"]);
    }

    #[test]
    fn parse_versions_reports_first_invalid_entry() {
        let err = parse_versions(&["1.0.0", "", "bad version"]).expect_err("invalid list");
        assert!(matches!(err, PinpackError::InvalidVersion { version, .. } if version.is_empty()));
    }

    #[test]
    fn deserialises_from_toml_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            version: DependencyVersion,
        }

        let parsed: Wrapper = toml::from_str("version = \"1.5.9\"").expect("valid toml");
        assert_eq!(parsed.version.as_str(), "1.5.9");
        assert!(toml::from_str::<Wrapper>("version = \"a b\"").is_err());
    }
}
