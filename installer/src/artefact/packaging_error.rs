//! Error types for archive unpacking.
//!
//! Covers a corrupt gzip or tar stream, unsafe entry paths, and archives
//! that do not hold exactly one `gh-flow` executable.

use thiserror::Error;

/// Errors arising while extracting the executable from a verified archive.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// The gzip or tar stream could not be read.
    #[error("corrupt archive: {0}")]
    Corrupt(#[from] std::io::Error),

    /// An entry path is absolute or climbs out of the archive root.
    #[error("unsafe path in archive: {path}")]
    PathTraversal {
        /// The offending entry path.
        path: String,
    },

    /// No entry is the expected executable.
    #[error("archive does not contain {name}")]
    MissingExecutable {
        /// The executable name that was searched for.
        name: String,
    },

    /// More than one entry could be the expected executable.
    #[error("archive contains {count} candidates for {name}")]
    AmbiguousExecutable {
        /// The executable name that was searched for.
        name: String,
        /// Number of matching entries.
        count: usize,
    },

    /// The entry named like the executable is a link or directory.
    #[error("{path} is not a regular file")]
    NotRegularFile {
        /// The offending entry path.
        path: String,
    },
}
