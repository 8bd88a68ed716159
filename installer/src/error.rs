//! Error types for the gh-flow installer.
//!
//! Every variant is fatal to an install run. Completion problems are not
//! errors at all; they travel as [`crate::completions::CompletionWarning`]
//! values instead.

use crate::artefact::download::FetchError;
use crate::artefact::packaging_error::PackagingError;
use crate::artefact::verification::IntegrityError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while installing `gh-flow`.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The release manifest could not be read or failed validation.
    #[error("invalid release manifest {path}: {reason}")]
    InvalidManifest {
        /// Path of the manifest file.
        path: Utf8PathBuf,
        /// Description of the parse or validation failure.
        reason: String,
    },

    /// The host, or its archive, is outside the published platform matrix.
    #[error("unsupported platform {platform}: {reason}")]
    UnsupportedPlatform {
        /// The host or triple that could not be served.
        platform: String,
        /// Why no archive applies.
        reason: String,
    },

    /// The archive could not be downloaded.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The downloaded bytes do not match the expected digest.
    #[error("integrity check failed: {0}")]
    Integrity(#[from] IntegrityError),

    /// The verified archive does not contain a usable executable.
    #[error("packaging error: {0}")]
    Packaging(#[from] PackagingError),

    /// No binary or completion directory could be determined.
    #[error("could not determine install locations: {reason}")]
    LayoutUnavailable {
        /// Which directory is missing and why.
        reason: String,
    },

    /// The executable could not be written to the binary directory.
    #[error("failed to install {path}: {reason}")]
    InstallFailed {
        /// Destination path of the executable.
        path: Utf8PathBuf,
        /// Description of the I/O failure.
        reason: String,
    },

    /// The installed executable did not pass the post-install smoke test.
    #[error("self-check failed for {path}: {reason}")]
    Verification {
        /// Path of the installed executable.
        path: Utf8PathBuf,
        /// What the check observed.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
