//! SHA-256 digest newtype for archive verification.
//!
//! The release table carries one hex digest per archive. Values are checked
//! when the manifest is loaded so that a template placeholder or a truncated
//! digest is reported before any download starts.

use super::error::{ArtefactError, Result};
use serde::{Deserialize, Deserializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// A validated, lowercase, hex-encoded SHA-256 digest.
///
/// Uppercase hex is accepted and normalised, since release tooling differs
/// in the case it emits.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::artefact::sha256_digest::Sha256Digest;
///
/// let digest = Sha256Digest::of_bytes(b"gh-flow");
/// assert_eq!(digest.as_str().len(), 64);
///
/// let parsed: Sha256Digest = "AB".repeat(32).as_str().try_into().expect("valid digest");
/// assert_eq!(parsed.as_str(), "ab".repeat(32));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Compute the digest of an in-memory buffer.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.len() != DIGEST_HEX_LEN {
            return Err(invalid(
                value,
                format!(
                    "expected {DIGEST_HEX_LEN} hex characters, got {}",
                    trimmed.len()
                ),
            ));
        }
        if let Some(bad) = trimmed.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(invalid(value, format!("non-hex character '{bad}'")));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid(value: &str, reason: String) -> ArtefactError {
    ArtefactError::InvalidSha256Digest {
        value: value.to_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn of_bytes_matches_known_vector() {
        let digest = Sha256Digest::of_bytes(b"abc");
        assert_eq!(
            digest.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn accepts_and_lowercases_uppercase_hex() {
        let digest = Sha256Digest::try_from("F".repeat(64)).expect("valid digest");
        assert_eq!(digest.as_str(), "f".repeat(64));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let padded = format!("  {}\n", "0".repeat(64));
        let digest = Sha256Digest::try_from(padded).expect("valid digest");
        assert_eq!(digest.as_str(), "0".repeat(64));
    }

    #[rstest]
    #[case::too_short("abcdef")]
    #[case::placeholder("SHA256_PLACEHOLDER_LINUX_INTEL")]
    #[case::empty("")]
    fn rejects_wrong_length(#[case] value: &str) {
        let err = Sha256Digest::try_from(value).expect_err("expected rejection");
        assert!(
            matches!(err, ArtefactError::InvalidSha256Digest { ref reason, .. }
                if reason.contains("expected 64 hex characters")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn rejects_too_long() {
        let err = Sha256Digest::try_from("a".repeat(65)).expect_err("expected rejection");
        assert!(err.to_string().contains("got 65"));
    }

    #[test]
    fn rejects_non_hex_characters() {
        let mut bad = "a".repeat(63);
        bad.push('g');
        let err = Sha256Digest::try_from(bad).expect_err("expected rejection");
        assert!(err.to_string().contains("non-hex character 'g'"));
    }
}
