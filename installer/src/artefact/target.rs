//! Target triples of the published `gh-flow` release archives.
//!
//! The release pipeline builds exactly four archives per version. The set is
//! closed, so it is modelled as an enum and mapped from a [`PlatformKey`] by
//! an exhaustive `match`: adding a platform family without adding a triple
//! fails to compile.

use super::error::{ArtefactError, Result};
use crate::platform::{ArchFamily, OsFamily, PlatformKey};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A target triple for which a prebuilt archive is published.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::artefact::target::TargetTriple;
/// use gh_flow_installer::platform::{ArchFamily, OsFamily, PlatformKey};
///
/// let key = PlatformKey::new(OsFamily::MacOs, ArchFamily::Aarch64);
/// assert_eq!(TargetTriple::for_platform(key).as_str(), "aarch64-apple-darwin");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetTriple {
    /// `x86_64-apple-darwin`
    X86_64AppleDarwin,
    /// `aarch64-apple-darwin`
    Aarch64AppleDarwin,
    /// `x86_64-unknown-linux-gnu`
    X86_64UnknownLinuxGnu,
    /// `aarch64-unknown-linux-gnu`
    Aarch64UnknownLinuxGnu,
}

impl TargetTriple {
    /// Every published triple, in manifest order.
    pub const ALL: [Self; 4] = [
        Self::X86_64AppleDarwin,
        Self::Aarch64AppleDarwin,
        Self::X86_64UnknownLinuxGnu,
        Self::Aarch64UnknownLinuxGnu,
    ];

    /// Map a platform key to the triple of its archive.
    #[must_use]
    pub const fn for_platform(key: PlatformKey) -> Self {
        match (key.os(), key.arch()) {
            (OsFamily::MacOs, ArchFamily::X86_64) => Self::X86_64AppleDarwin,
            (OsFamily::MacOs, ArchFamily::Aarch64) => Self::Aarch64AppleDarwin,
            (OsFamily::Linux, ArchFamily::X86_64) => Self::X86_64UnknownLinuxGnu,
            (OsFamily::Linux, ArchFamily::Aarch64) => Self::Aarch64UnknownLinuxGnu,
        }
    }

    /// Return the platform key this triple was built for.
    #[must_use]
    pub const fn platform(self) -> PlatformKey {
        match self {
            Self::X86_64AppleDarwin => PlatformKey::new(OsFamily::MacOs, ArchFamily::X86_64),
            Self::Aarch64AppleDarwin => PlatformKey::new(OsFamily::MacOs, ArchFamily::Aarch64),
            Self::X86_64UnknownLinuxGnu => PlatformKey::new(OsFamily::Linux, ArchFamily::X86_64),
            Self::Aarch64UnknownLinuxGnu => {
                PlatformKey::new(OsFamily::Linux, ArchFamily::Aarch64)
            }
        }
    }

    /// Return the triple as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86_64AppleDarwin => "x86_64-apple-darwin",
            Self::Aarch64AppleDarwin => "aarch64-apple-darwin",
            Self::X86_64UnknownLinuxGnu => "x86_64-unknown-linux-gnu",
            Self::Aarch64UnknownLinuxGnu => "aarch64-unknown-linux-gnu",
        }
    }

    /// Comma-separated list of every published triple, for error messages.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|triple| triple.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<&str> for TargetTriple {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|triple| triple.as_str() == value)
            .ok_or_else(|| ArtefactError::UnsupportedTarget {
                value: value.to_owned(),
                expected: Self::supported_list(),
            })
    }
}

impl std::str::FromStr for TargetTriple {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self> {
        Self::try_from(value)
    }
}

impl<'de> Deserialize<'de> for TargetTriple {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::try_from(raw.as_str()).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
