//! Release manifest: the version and checksum table for one release.
//!
//! The manifest is the installer's only source of truth about which archives
//! exist. It is read from TOML:
//!
//! ```toml
//! version = "1.2.0"
//! release_base = "https://github.com/say828/gh-flow"
//!
//! [checksums]
//! x86_64-unknown-linux-gnu = "<64 hex characters>"
//! ```
//!
//! Entries may be missing. A missing entry is only reported when the host
//! actually needs it, and then it is fatal.

use super::descriptor::ArtifactDescriptor;
use super::error::ArtefactError;
use super::naming::{ArtefactName, asset_url};
use super::sha256_digest::Sha256Digest;
use super::target::TargetTriple;
use super::version::ReleaseVersion;
use crate::error::{InstallerError, Result};
use crate::platform::PlatformKey;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Repository URL the release archives are published under by default.
pub const DEFAULT_RELEASE_BASE: &str = "https://github.com/say828/gh-flow";

/// The version and per-target checksum table of a release.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::artefact::manifest::ReleaseManifest;
/// use gh_flow_installer::artefact::sha256_digest::Sha256Digest;
/// use gh_flow_installer::artefact::target::TargetTriple;
/// use gh_flow_installer::platform::{ArchFamily, OsFamily, PlatformKey};
///
/// let manifest = ReleaseManifest::new("1.2.0", "https://example.test/gh-flow")
///     .expect("valid manifest")
///     .with_checksum(TargetTriple::X86_64UnknownLinuxGnu, Sha256Digest::of_bytes(b"archive"));
///
/// let linux = PlatformKey::new(OsFamily::Linux, ArchFamily::X86_64);
/// let descriptor = manifest.locate(linux).expect("listed target");
/// assert!(descriptor.url.ends_with("/v1.2.0/gh-flow-x86_64-unknown-linux-gnu.tar.gz"));
///
/// let mac = PlatformKey::new(OsFamily::MacOs, ArchFamily::Aarch64);
/// assert!(manifest.locate(mac).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseManifest {
    version: ReleaseVersion,
    #[serde(
        default = "default_release_base",
        deserialize_with = "deserialize_release_base"
    )]
    release_base: String,
    #[serde(default)]
    checksums: BTreeMap<TargetTriple, Sha256Digest>,
}

impl ReleaseManifest {
    /// Create a manifest with an empty checksum table.
    ///
    /// # Errors
    ///
    /// Returns an [`ArtefactError`] when the version or base URL is invalid.
    pub fn new(version: &str, release_base: &str) -> std::result::Result<Self, ArtefactError> {
        Ok(Self {
            version: ReleaseVersion::try_from(version)?,
            release_base: normalise_release_base(release_base)?,
            checksums: BTreeMap::new(),
        })
    }

    /// Add or replace the checksum for `target`.
    #[must_use]
    pub fn with_checksum(mut self, target: TargetTriple, digest: Sha256Digest) -> Self {
        self.checksums.insert(target, digest);
        self
    }

    /// Return the release version.
    #[must_use]
    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Return the repository URL archives are published under.
    #[must_use]
    pub fn release_base(&self) -> &str {
        &self.release_base
    }

    /// Return the checksum recorded for `target`, if any.
    #[must_use]
    pub fn checksum(&self, target: TargetTriple) -> Option<&Sha256Digest> {
        self.checksums.get(&target)
    }

    /// Return the targets that have a checksum entry.
    pub fn listed_targets(&self) -> impl Iterator<Item = TargetTriple> + '_ {
        self.checksums.keys().copied()
    }

    /// Resolve the archive descriptor for `platform`.
    ///
    /// This is a pure table lookup; it performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] when the table has no
    /// checksum for the platform's target triple.
    pub fn locate(&self, platform: PlatformKey) -> Result<ArtifactDescriptor> {
        let target = TargetTriple::for_platform(platform);
        let Some(expected_checksum) = self.checksum(target) else {
            return Err(InstallerError::UnsupportedPlatform {
                platform: target.to_string(),
                reason: format!(
                    "release {} lists no checksum for this target (listed: {})",
                    self.version,
                    self.listed_summary()
                ),
            });
        };

        let url = asset_url(&self.release_base, &self.version, &ArtefactName::new(target));
        Ok(ArtifactDescriptor {
            version: self.version.clone(),
            platform,
            target,
            url,
            expected_checksum: expected_checksum.clone(),
        })
    }

    fn listed_summary(&self) -> String {
        if self.checksums.is_empty() {
            return "none".to_owned();
        }
        self.listed_targets()
            .map(|target| target.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn default_release_base() -> String {
    DEFAULT_RELEASE_BASE.to_owned()
}

fn deserialize_release_base<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    normalise_release_base(&raw).map_err(serde::de::Error::custom)
}

/// Validate a release base URL and strip trailing slashes.
fn normalise_release_base(value: &str) -> std::result::Result<String, ArtefactError> {
    let trimmed = value.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(host_and_path) if !host_and_path.is_empty() => Ok(trimmed.to_owned()),
        Some(_) => Err(ArtefactError::InvalidReleaseBase {
            value: value.to_owned(),
            reason: "missing host".to_owned(),
        }),
        None => Err(ArtefactError::InvalidReleaseBase {
            value: value.to_owned(),
            reason: "expected an http:// or https:// URL".to_owned(),
        }),
    }
}
