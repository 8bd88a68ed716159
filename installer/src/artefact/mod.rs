//! Release archive naming, manifest, download, and verification.
//!
//! The release manifest maps each supported target triple to the SHA-256
//! digest of its archive. Locating an archive never touches the network;
//! fetching returns raw bytes; only [`verification::verify_archive`] can turn
//! those bytes into a [`verification::VerifiedArchive`], which is the sole
//! input extraction accepts.
//!
//! # Sub-modules
//!
//! - [`descriptor`] - Resolved archive URL and digest (`ArtifactDescriptor`).
//! - [`download`] - Archive fetch trait and HTTP implementation.
//! - [`error`] - Semantic error types for validation failures.
//! - [`extraction`] - In-memory executable extraction with path checks.
//! - [`manifest`] - Release manifest and archive locator.
//! - [`manifest_parser`] - Manifest TOML loading.
//! - [`naming`] - Archive naming and URL policy (`ArtefactName`).
//! - [`packaging_error`] - Error types for archive contents.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`target`] - Supported target triples (`TargetTriple`).
//! - [`verification`] - Digest verification (`VerifiedArchive`).
//! - [`version`] - Release version newtype (`ReleaseVersion`).

pub mod descriptor;
pub mod download;
pub mod error;
pub mod extraction;
pub mod manifest;
pub mod manifest_parser;
pub mod naming;
pub mod packaging_error;
pub mod sha256_digest;
pub mod target;
pub mod verification;
pub mod version;
