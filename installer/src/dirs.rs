//! Directory resolution abstraction for platform-specific paths.
//!
//! Wraps `directories-next` behind a trait so tests can substitute fixed
//! paths without touching the real home directory.

use std::path::PathBuf;

/// Source of the per-user directories the installer writes into.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Return the directory user executables are installed into.
    fn bin_dir(&self) -> Option<PathBuf>;

    /// Return the user data directory completion scripts live under.
    fn data_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by the host's conventions.
///
/// The bin directory is the XDG executable directory where one exists and
/// `~/.local/bin` otherwise. The data directory is the XDG data home on
/// Linux and `~/.local/share` on macOS.
///
/// # Examples
///
/// ```no_run
/// use gh_flow_installer::dirs::{BaseDirs, SystemBaseDirs};
///
/// let dirs = SystemBaseDirs::new().expect("home directory available");
/// println!("{:?}", dirs.bin_dir());
/// ```
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    inner: directories_next::BaseDirs,
}

impl SystemBaseDirs {
    /// Resolve the host directories, or `None` without a home directory.
    #[must_use]
    pub fn new() -> Option<Self> {
        directories_next::BaseDirs::new().map(|inner| Self { inner })
    }
}

impl BaseDirs for SystemBaseDirs {
    fn bin_dir(&self) -> Option<PathBuf> {
        self.inner
            .executable_dir()
            .map(std::path::Path::to_path_buf)
            .or_else(|| Some(self.inner.home_dir().join(".local").join("bin")))
    }

    #[cfg(not(target_os = "macos"))]
    fn data_dir(&self) -> Option<PathBuf> {
        Some(self.inner.data_dir().to_path_buf())
    }

    // Shells on macOS do not read `~/Library/Application Support`.
    #[cfg(target_os = "macos")]
    fn data_dir(&self) -> Option<PathBuf> {
        Some(self.inner.home_dir().join(".local").join("share"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_dirs_resolve_every_location() {
        // Containers without a home directory have nothing to check.
        let Some(dirs) = SystemBaseDirs::new() else {
            return;
        };
        assert!(dirs.bin_dir().is_some());
        assert!(dirs.data_dir().is_some());
    }
}
