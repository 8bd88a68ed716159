//! Install locations.
//!
//! An [`InstallLayout`] names the binary directory and the per-shell
//! completion directories. It comes from a Homebrew-style prefix, from the
//! user's platform directories, or from explicit overrides.

use crate::completions::Shell;
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Completion directory for each shell that should receive a script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionDirs {
    dirs: BTreeMap<Shell, Utf8PathBuf>,
}

impl CompletionDirs {
    /// Place every shell's directory under a `share` directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use gh_flow_installer::completions::Shell;
    /// use gh_flow_installer::layout::CompletionDirs;
    ///
    /// let dirs = CompletionDirs::under_share(Utf8Path::new("/opt/homebrew/share"));
    /// assert_eq!(
    ///     dirs.get(Shell::Zsh).map(|dir| dir.as_str()),
    ///     Some("/opt/homebrew/share/zsh/site-functions")
    /// );
    /// ```
    #[must_use]
    pub fn under_share(share: &Utf8Path) -> Self {
        let dirs = Shell::ALL
            .into_iter()
            .map(|shell| (shell, share.join(shell.share_subdir())))
            .collect();
        Self { dirs }
    }

    /// Set the directory for one shell.
    #[must_use]
    pub fn with_dir(mut self, shell: Shell, dir: Utf8PathBuf) -> Self {
        self.dirs.insert(shell, dir);
        self
    }

    /// Return the directory for `shell`, if configured.
    #[must_use]
    pub fn get(&self, shell: Shell) -> Option<&Utf8Path> {
        self.dirs.get(&shell).map(Utf8PathBuf::as_path)
    }

    /// Iterate over configured shells in generation order.
    pub fn iter(&self) -> impl Iterator<Item = (Shell, &Utf8Path)> + '_ {
        self.dirs.iter().map(|(shell, dir)| (*shell, dir.as_path()))
    }
}

/// Where the executable and its completion scripts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    /// Directory the executable is placed in.
    pub bin_dir: Utf8PathBuf,
    /// Completion script directories.
    pub completions: CompletionDirs,
}

impl InstallLayout {
    /// Homebrew's layout under `prefix`: `bin/` and `share/`.
    #[must_use]
    pub fn with_prefix(prefix: &Utf8Path) -> Self {
        Self {
            bin_dir: prefix.join("bin"),
            completions: CompletionDirs::under_share(&prefix.join("share")),
        }
    }

    /// The per-user layout: the platform bin directory and completions
    /// under the user data directory.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::LayoutUnavailable`] when either directory
    /// cannot be determined or is not valid UTF-8.
    pub fn for_user(dirs: &dyn BaseDirs) -> Result<Self> {
        let bin_dir = utf8_dir(dirs.bin_dir(), "binary")?;
        let data_dir = utf8_dir(dirs.data_dir(), "data")?;
        Ok(Self {
            bin_dir,
            completions: CompletionDirs::under_share(&data_dir),
        })
    }

    /// Return where the executable called `name` is placed.
    #[must_use]
    pub fn executable_path(&self, name: &str) -> Utf8PathBuf {
        self.bin_dir.join(name)
    }
}

fn utf8_dir(dir: Option<PathBuf>, what: &str) -> Result<Utf8PathBuf> {
    let dir = dir.ok_or_else(|| InstallerError::LayoutUnavailable {
        reason: format!("could not determine the user {what} directory"),
    })?;
    Utf8PathBuf::from_path_buf(dir).map_err(|path| InstallerError::LayoutUnavailable {
        reason: format!(
            "user {what} directory is not valid UTF-8: {}",
            path.display()
        ),
    })
}
