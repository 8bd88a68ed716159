//! Error types for release artefact values.
//!
//! Each variant names the rejected input and the constraint it violated, so
//! manifest problems can be fixed without reading the source.

use thiserror::Error;

/// Errors arising from invalid artefact-related values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// The target triple is not one of the published archive triples.
    #[error("unsupported target triple \"{value}\"; expected one of: {expected}")]
    UnsupportedTarget {
        /// The rejected triple string.
        value: String,
        /// Comma-separated list of accepted triples.
        expected: String,
    },

    /// A SHA-256 digest is not a valid 64-character hex string.
    #[error("invalid SHA-256 digest \"{value}\": {reason}")]
    InvalidSha256Digest {
        /// The rejected digest string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A release version is empty or not of the form `MAJOR.MINOR.PATCH`.
    #[error("invalid release version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The release base URL is not an HTTP(S) URL.
    #[error("invalid release base \"{value}\": {reason}")]
    InvalidReleaseBase {
        /// The rejected base URL.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;
