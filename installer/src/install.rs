//! Atomic placement of the executable into the binary directory.
//!
//! The new binary is written to a temporary file beside its destination,
//! made executable, synced, and renamed over the old one. Readers see either
//! the previous binary or the complete new one.

use crate::artefact::extraction::ExtractedExecutable;
use crate::artefact::version::ReleaseVersion;
use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;

/// Permission bits of an installed executable.
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// An executable that has been placed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledExecutable {
    path: Utf8PathBuf,
    version: ReleaseVersion,
}

impl InstalledExecutable {
    /// Describe an executable already on disk.
    #[must_use]
    pub fn new(path: Utf8PathBuf, version: ReleaseVersion) -> Self {
        Self { path, version }
    }

    /// Return the executable's path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Return the version that was installed.
    #[must_use]
    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }
}

/// Writes executables into one binary directory.
#[derive(Debug, Clone)]
pub struct BinaryInstaller {
    bin_dir: Utf8PathBuf,
}

impl BinaryInstaller {
    /// Create an installer targeting `bin_dir`.
    #[must_use]
    pub fn new(bin_dir: Utf8PathBuf) -> Self {
        Self { bin_dir }
    }

    /// Return the binary directory.
    #[must_use]
    pub fn bin_dir(&self) -> &Utf8Path {
        &self.bin_dir
    }

    /// Return where an executable called `name` is placed.
    #[must_use]
    pub fn destination(&self, name: &str) -> Utf8PathBuf {
        self.bin_dir.join(name)
    }

    /// Place `executable` into the binary directory, replacing any previous
    /// copy.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InstallFailed`] if the directory cannot be
    /// created or any write, permission change, or rename fails. A failure
    /// leaves the previous binary untouched.
    pub fn install(
        &self,
        executable: &ExtractedExecutable,
        version: &ReleaseVersion,
    ) -> Result<InstalledExecutable> {
        let dest = self.destination(executable.name());
        let failed = |reason: String| InstallerError::InstallFailed {
            path: dest.clone(),
            reason,
        };

        fs::create_dir_all(&self.bin_dir)
            .map_err(|e| failed(format!("cannot create {}: {e}", self.bin_dir)))?;

        let mut temp = tempfile::Builder::new()
            .prefix(".gh-flow-install-")
            .tempfile_in(&self.bin_dir)
            .map_err(|e| failed(format!("cannot create temporary file: {e}")))?;
        temp.write_all(executable.bytes())
            .map_err(|e| failed(format!("cannot write executable: {e}")))?;
        make_executable(temp.as_file()).map_err(|e| failed(format!("cannot set mode: {e}")))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| failed(format!("cannot sync executable: {e}")))?;
        temp.persist(&dest)
            .map_err(|e| failed(format!("cannot replace {dest}: {}", e.error)))?;

        log::info!("installed {dest} ({} bytes)", executable.bytes().len());
        Ok(InstalledExecutable::new(dest, version.clone()))
    }
}

#[cfg(unix)]
fn make_executable(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn make_executable(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::extracted_executable;
    use rstest::{fixture, rstest};

    struct Sandbox {
        _temp: tempfile::TempDir,
        bin_dir: Utf8PathBuf,
    }

    #[fixture]
    fn sandbox() -> Sandbox {
        let temp = tempfile::tempdir().expect("temp dir");
        let bin_dir = Utf8PathBuf::try_from(temp.path().join("bin")).expect("UTF-8 path");
        Sandbox {
            _temp: temp,
            bin_dir,
        }
    }

    fn version() -> ReleaseVersion {
        ReleaseVersion::try_from("1.2.0").expect("valid version")
    }

    #[rstest]
    fn install_creates_bin_dir_and_writes_bytes(sandbox: Sandbox) {
        let installer = BinaryInstaller::new(sandbox.bin_dir.clone());
        let installed = installer
            .install(&extracted_executable(b"first"), &version())
            .expect("install");

        assert_eq!(installed.path(), sandbox.bin_dir.join("gh-flow"));
        assert_eq!(installed.version().as_str(), "1.2.0");
        assert_eq!(fs::read(installed.path()).expect("read back"), b"first");
    }

    #[cfg(unix)]
    #[rstest]
    fn install_sets_execute_permission(sandbox: Sandbox) {
        use std::os::unix::fs::PermissionsExt;

        let installed = BinaryInstaller::new(sandbox.bin_dir.clone())
            .install(&extracted_executable(b"#!/bin/sh\n"), &version())
            .expect("install");
        let mode = fs::metadata(installed.path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, EXECUTABLE_MODE);
    }

    #[rstest]
    fn reinstall_replaces_contents_completely(sandbox: Sandbox) {
        let installer = BinaryInstaller::new(sandbox.bin_dir.clone());
        installer
            .install(&extracted_executable(b"a much longer first payload"), &version())
            .expect("first install");
        let installed = installer
            .install(&extracted_executable(b"second"), &version())
            .expect("second install");

        assert_eq!(fs::read(installed.path()).expect("read back"), b"second");
    }

    #[rstest]
    fn install_leaves_no_temporary_files(sandbox: Sandbox) {
        BinaryInstaller::new(sandbox.bin_dir.clone())
            .install(&extracted_executable(b"payload"), &version())
            .expect("install");
        let names: Vec<String> = fs::read_dir(&sandbox.bin_dir)
            .expect("list bin dir")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["gh-flow".to_owned()]);
    }

    #[rstest]
    fn install_fails_when_bin_dir_is_a_file(sandbox: Sandbox) {
        let parent = sandbox.bin_dir.parent().expect("parent").to_owned();
        fs::create_dir_all(&parent).expect("create parent");
        fs::write(&sandbox.bin_dir, b"not a directory").expect("write blocker");

        let err = BinaryInstaller::new(sandbox.bin_dir.clone())
            .install(&extracted_executable(b"payload"), &version())
            .expect_err("expected failure");
        assert!(
            matches!(err, InstallerError::InstallFailed { ref path, .. } if path.ends_with("gh-flow")),
            "unexpected error: {err}"
        );
    }
}
