//! Release version newtype for archive URLs.
//!
//! Versions appear in the release tag as `v<version>`, so the value itself
//! must not carry the `v`. The accepted grammar is `MAJOR.MINOR.PATCH` with
//! an optional pre-release or build suffix.

use super::error::{ArtefactError, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A validated release version string such as `1.2.0` or `1.3.0-rc.1`.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::artefact::version::ReleaseVersion;
///
/// let version: ReleaseVersion = "1.2.0".try_into().expect("valid version");
/// assert_eq!(version.tag(), "v1.2.0");
///
/// assert!(ReleaseVersion::try_from("v1.2.0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the git tag the release archives are published under.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }
}

fn is_valid_suffix_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}

fn validate_suffix(kind: &str, suffix: Option<&str>) -> std::result::Result<(), String> {
    let Some(body) = suffix else {
        return Ok(());
    };
    if body.is_empty() {
        return Err(format!("{kind} suffix must not be empty"));
    }
    if let Some(bad) = body.chars().find(|c| !is_valid_suffix_char(*c)) {
        return Err(format!("invalid character '{bad}' in {kind} suffix"));
    }
    Ok(())
}

fn validate(value: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err("version must not be empty".to_owned());
    }
    if value.starts_with(['v', 'V']) {
        return Err("drop the leading \"v\"; the tag prefix is added automatically".to_owned());
    }

    let (rest, build) = match value.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (value, None),
    };
    let (core, pre) = match rest.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (rest, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() != 3 {
        return Err(format!(
            "expected MAJOR.MINOR.PATCH, got {} component(s)",
            parts.len()
        ));
    }
    if let Some(part) = parts
        .iter()
        .find(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(format!("version component \"{part}\" is not a number"));
    }
    if let Some(part) = parts.iter().find(|part| part.len() > 1 && part.starts_with('0')) {
        return Err(format!("version component \"{part}\" has a leading zero"));
    }

    validate_suffix("pre-release", pre)?;
    validate_suffix("build", build)?;
    Ok(())
}

impl TryFrom<&str> for ReleaseVersion {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        validate(trimmed).map_err(|reason| ArtefactError::InvalidVersion {
            value: value.to_owned(),
            reason,
        })?;
        Ok(Self(trimmed.to_owned()))
    }
}

impl TryFrom<String> for ReleaseVersion {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl<'de> Deserialize<'de> for ReleaseVersion {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
