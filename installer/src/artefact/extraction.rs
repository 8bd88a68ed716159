//! Executable extraction from verified release archives.
//!
//! Release archives are gzip-compressed tarballs holding the `gh-flow`
//! executable, either at the root or inside one top-level directory. The
//! archive is decoded in memory and only the executable's bytes are kept;
//! nothing is unpacked to disk here.

use super::packaging_error::PackagingError;
use super::verification::VerifiedArchive;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Component, Path};

/// The executable bytes taken from a verified archive.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtractedExecutable {
    name: String,
    bytes: Vec<u8>,
}

impl ExtractedExecutable {
    #[cfg(any(test, feature = "test-support"))]
    pub(crate) fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_owned(),
            bytes,
        }
    }

    /// Return the executable's file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the executable's contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for ExtractedExecutable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractedExecutable")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Pull the executable called `name` out of a verified archive.
///
/// Directory entries are skipped. Every other entry path is checked for
/// traversal before it is considered.
///
/// # Errors
///
/// Returns [`PackagingError::PathTraversal`] for absolute or `..` entry
/// paths, [`PackagingError::MissingExecutable`] or
/// [`PackagingError::AmbiguousExecutable`] unless exactly one candidate
/// exists, [`PackagingError::NotRegularFile`] if the candidate is a link, and
/// [`PackagingError::Corrupt`] if the stream cannot be decoded.
pub fn extract_executable(
    archive: &VerifiedArchive,
    name: &str,
) -> Result<ExtractedExecutable, PackagingError> {
    let mut tar = tar::Archive::new(GzDecoder::new(archive.bytes()));
    let mut found: Option<Vec<u8>> = None;
    let mut candidates = 0usize;

    for entry_result in tar.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();
        validate_entry_path(&entry_path)?;

        let kind = entry.header().entry_type();
        if kind.is_dir() || !is_candidate(&entry_path, name) {
            continue;
        }
        if !kind.is_file() {
            return Err(PackagingError::NotRegularFile {
                path: entry_path.display().to_string(),
            });
        }

        candidates += 1;
        if found.is_none() {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            log::debug!(
                "extracted {} ({} bytes)",
                entry_path.display(),
                bytes.len()
            );
            found = Some(bytes);
        }
    }

    match (found, candidates) {
        (Some(bytes), 1) => Ok(ExtractedExecutable {
            name: name.to_owned(),
            bytes,
        }),
        (None, _) => Err(PackagingError::MissingExecutable {
            name: name.to_owned(),
        }),
        (Some(_), count) => Err(PackagingError::AmbiguousExecutable {
            name: name.to_owned(),
            count,
        }),
    }
}

/// Reject entry paths that are absolute or contain `..`.
fn validate_entry_path(path: &Path) -> Result<(), PackagingError> {
    let escapes = path.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(PackagingError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// An entry is a candidate when it is `name` at the root or one level down.
fn is_candidate(path: &Path, name: &str) -> bool {
    let parts: Vec<_> = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    matches!(parts.len(), 1 | 2)
        && parts
            .last()
            .is_some_and(|last| last.as_os_str() == name)
}
