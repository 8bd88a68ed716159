//! Archive naming policy for `gh-flow` releases.
//!
//! Release archives are named `gh-flow-<target>.tar.gz` and published under
//! the `v<version>` tag of the project's GitHub releases.

use super::target::TargetTriple;
use super::version::ReleaseVersion;
use crate::PROGRAM_NAME;
use std::fmt;

/// The fixed file extension of release archives.
const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// The archive file name for one target triple.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::artefact::naming::ArtefactName;
/// use gh_flow_installer::artefact::target::TargetTriple;
///
/// let name = ArtefactName::new(TargetTriple::X86_64UnknownLinuxGnu);
/// assert_eq!(name.to_string(), "gh-flow-x86_64-unknown-linux-gnu.tar.gz");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtefactName {
    target: TargetTriple,
}

impl ArtefactName {
    /// Create the archive name for `target`.
    #[must_use]
    pub const fn new(target: TargetTriple) -> Self {
        Self { target }
    }

    /// Return the target triple component.
    #[must_use]
    pub const fn target(&self) -> TargetTriple {
        self.target
    }

    /// Return the filename as an owned string.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArtefactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PROGRAM_NAME}-{}{ARCHIVE_EXTENSION}", self.target)
    }
}

/// Build the download URL of an archive.
///
/// `release_base` is the repository URL without a trailing slash.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::artefact::naming::{ArtefactName, asset_url};
/// use gh_flow_installer::artefact::target::TargetTriple;
/// use gh_flow_installer::artefact::version::ReleaseVersion;
///
/// let version = ReleaseVersion::try_from("1.2.0").expect("valid version");
/// let name = ArtefactName::new(TargetTriple::Aarch64AppleDarwin);
/// assert_eq!(
///     asset_url("https://github.com/say828/gh-flow", &version, &name),
///     "https://github.com/say828/gh-flow/releases/download/v1.2.0/gh-flow-aarch64-apple-darwin.tar.gz"
/// );
/// ```
#[must_use]
pub fn asset_url(release_base: &str, version: &ReleaseVersion, name: &ArtefactName) -> String {
    format!("{release_base}/releases/download/{}/{name}", version.tag())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::macos_intel(TargetTriple::X86_64AppleDarwin, "gh-flow-x86_64-apple-darwin.tar.gz")]
    #[case::linux_arm(
        TargetTriple::Aarch64UnknownLinuxGnu,
        "gh-flow-aarch64-unknown-linux-gnu.tar.gz"
    )]
    fn filename_embeds_triple(#[case] target: TargetTriple, #[case] expected: &str) {
        let name = ArtefactName::new(target);
        assert_eq!(name.filename(), expected);
        assert_eq!(name.target(), target);
    }

    #[test]
    fn different_targets_produce_different_names() {
        let names: std::collections::HashSet<String> = TargetTriple::ALL
            .into_iter()
            .map(|target| ArtefactName::new(target).filename())
            .collect();
        assert_eq!(names.len(), TargetTriple::ALL.len());
    }

    #[test]
    fn url_uses_version_tag() {
        let version = ReleaseVersion::try_from("1.2.0").expect("valid version");
        let url = asset_url(
            "https://example.test/org/gh-flow",
            &version,
            &ArtefactName::new(TargetTriple::X86_64UnknownLinuxGnu),
        );
        assert_eq!(
            url,
            "https://example.test/org/gh-flow/releases/download/v1.2.0/gh-flow-x86_64-unknown-linux-gnu.tar.gz"
        );
    }
}
