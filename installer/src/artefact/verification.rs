//! Integrity verification for downloaded archives.
//!
//! [`VerifiedArchive`] can only be produced by [`verify_archive`]. Extraction
//! accepts nothing else, so unverified bytes cannot reach the filesystem.

use super::descriptor::ArtifactDescriptor;
use super::sha256_digest::Sha256Digest;
use std::fmt;

/// The downloaded bytes hash to something other than the published digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("checksum mismatch for {url}: expected sha256 {expected}, got {actual}")]
pub struct IntegrityError {
    /// URL the bytes were fetched from.
    pub url: String,
    /// Digest recorded in the release manifest.
    pub expected: Sha256Digest,
    /// Digest of the bytes actually received.
    pub actual: Sha256Digest,
}

/// Archive bytes whose SHA-256 digest matched the release manifest.
#[derive(Clone, PartialEq, Eq)]
pub struct VerifiedArchive {
    bytes: Vec<u8>,
    digest: Sha256Digest,
}

impl VerifiedArchive {
    /// Return the verified bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return the digest the bytes were verified against.
    #[must_use]
    pub fn digest(&self) -> &Sha256Digest {
        &self.digest
    }
}

impl fmt::Debug for VerifiedArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifiedArchive")
            .field("len", &self.bytes.len())
            .field("digest", &self.digest)
            .finish()
    }
}

/// Check `bytes` against the digest recorded in `descriptor`.
///
/// The comparison is on normalised lowercase hex, so it is exact.
///
/// # Errors
///
/// Returns [`IntegrityError`] carrying both digests when they differ.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::artefact::manifest::ReleaseManifest;
/// use gh_flow_installer::artefact::sha256_digest::Sha256Digest;
/// use gh_flow_installer::artefact::target::TargetTriple;
/// use gh_flow_installer::artefact::verification::verify_archive;
///
/// let target = TargetTriple::Aarch64AppleDarwin;
/// let manifest = ReleaseManifest::new("1.2.0", "https://example.test")
///     .expect("valid manifest")
///     .with_checksum(target, Sha256Digest::of_bytes(b"archive"));
/// let descriptor = manifest.locate(target.platform()).expect("listed");
///
/// assert!(verify_archive(&descriptor, b"archive".to_vec()).is_ok());
/// assert!(verify_archive(&descriptor, b"tampered".to_vec()).is_err());
/// ```
pub fn verify_archive(
    descriptor: &ArtifactDescriptor,
    bytes: Vec<u8>,
) -> Result<VerifiedArchive, IntegrityError> {
    let actual = Sha256Digest::of_bytes(&bytes);
    if actual != descriptor.expected_checksum {
        log::warn!(
            "checksum mismatch for {}: expected {}, got {actual}",
            descriptor.url,
            descriptor.expected_checksum
        );
        return Err(IntegrityError {
            url: descriptor.url.clone(),
            expected: descriptor.expected_checksum.clone(),
            actual,
        });
    }
    log::debug!("verified {} ({} bytes)", descriptor.url, bytes.len());
    Ok(VerifiedArchive {
        bytes,
        digest: actual,
    })
}
