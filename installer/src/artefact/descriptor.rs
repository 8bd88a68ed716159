//! Resolved artefact descriptors.
//!
//! A descriptor is the output of the locator: everything the fetcher and the
//! verifier need for one archive, and nothing else.

use super::naming::ArtefactName;
use super::sha256_digest::Sha256Digest;
use super::target::TargetTriple;
use super::version::ReleaseVersion;
use crate::platform::PlatformKey;
use std::fmt;

/// The download URL and expected digest of one release archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Release version the archive belongs to.
    pub version: ReleaseVersion,
    /// Platform the archive was built for.
    pub platform: PlatformKey,
    /// Target triple embedded in the archive name.
    pub target: TargetTriple,
    /// Absolute download URL.
    pub url: String,
    /// SHA-256 digest the downloaded bytes must match.
    pub expected_checksum: Sha256Digest,
}

impl ArtifactDescriptor {
    /// Return the archive file name.
    #[must_use]
    pub fn archive_name(&self) -> ArtefactName {
        ArtefactName::new(self.target)
    }
}

impl fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) sha256:{}",
            self.archive_name(),
            self.version,
            self.platform,
            self.expected_checksum
        )
    }
}
