//! Release manifest deserialization.
//!
//! Parses the TOML release manifest into the validated [`ReleaseManifest`]
//! type. All newtype validation (version grammar, known target triples,
//! digest shape) runs during deserialization, so a manifest that still holds
//! template placeholders is rejected before any stage runs.

use super::manifest::ReleaseManifest;
use crate::error::{InstallerError, Result};
use camino::Utf8Path;

/// Errors arising from manifest parsing.
#[derive(Debug, thiserror::Error)]
pub enum ManifestParseError {
    /// TOML deserialization or field validation failed.
    #[error("manifest parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Parse a TOML string into a validated [`ReleaseManifest`].
///
/// # Errors
///
/// Returns an error if the TOML is malformed, has unknown keys, or any field
/// fails validation.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::artefact::manifest_parser::parse_manifest;
/// use gh_flow_installer::artefact::target::TargetTriple;
///
/// let toml = format!(
///     "version = \"1.2.0\"\n[checksums]\naarch64-apple-darwin = \"{}\"\n",
///     "0".repeat(64)
/// );
/// let manifest = parse_manifest(&toml).expect("valid manifest");
/// assert_eq!(manifest.version().as_str(), "1.2.0");
/// assert!(manifest.checksum(TargetTriple::Aarch64AppleDarwin).is_some());
/// ```
pub fn parse_manifest(text: &str) -> std::result::Result<ReleaseManifest, ManifestParseError> {
    Ok(toml::from_str(text)?)
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Returns [`InstallerError::InvalidManifest`] if the file cannot be read or
/// parsed.
pub fn load_manifest(path: &Utf8Path) -> Result<ReleaseManifest> {
    let text = std::fs::read_to_string(path).map_err(|e| InstallerError::InvalidManifest {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    let manifest = parse_manifest(&text).map_err(|e| InstallerError::InvalidManifest {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    log::debug!(
        "loaded release manifest {path} for version {}",
        manifest.version()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::manifest::DEFAULT_RELEASE_BASE;
    use crate::artefact::target::TargetTriple;
    use camino::Utf8PathBuf;
    use rstest::rstest;

    fn digest_line(target: &str, fill: char) -> String {
        format!("{target} = \"{}\"\n", fill.to_string().repeat(64))
    }

    fn full_manifest_toml() -> String {
        let mut text = String::from(
            "version = \"1.2.0\"\nrelease_base = \"https://example.test/gh-flow/\"\n[checksums]\n",
        );
        text.push_str(&digest_line("x86_64-apple-darwin", 'a'));
        text.push_str(&digest_line("aarch64-apple-darwin", 'b'));
        text.push_str(&digest_line("x86_64-unknown-linux-gnu", 'c'));
        text.push_str(&digest_line("aarch64-unknown-linux-gnu", 'd'));
        text
    }

    #[test]
    fn parses_full_manifest() {
        let manifest = parse_manifest(&full_manifest_toml()).expect("valid manifest");
        assert_eq!(manifest.version().as_str(), "1.2.0");
        assert_eq!(manifest.release_base(), "https://example.test/gh-flow");
        assert_eq!(manifest.listed_targets().count(), 4);
        assert_eq!(
            manifest
                .checksum(TargetTriple::X86_64UnknownLinuxGnu)
                .map(|digest| digest.as_str().to_owned()),
            Some("c".repeat(64))
        );
    }

    #[test]
    fn release_base_defaults_to_project_repository() {
        let manifest = parse_manifest("version = \"1.2.0\"\n").expect("valid manifest");
        assert_eq!(manifest.release_base(), DEFAULT_RELEASE_BASE);
        assert_eq!(manifest.listed_targets().count(), 0);
    }

    #[rstest]
    #[case::placeholder_digest(
        "version = \"1.2.0\"\n[checksums]\nx86_64-apple-darwin = \"SHA256_PLACEHOLDER_MACOS_INTEL\"\n",
        "invalid SHA-256 digest"
    )]
    #[case::unknown_target(
        "version = \"1.2.0\"\n[checksums]\nx86_64-pc-windows-msvc = \"\"\n",
        "unsupported target triple"
    )]
    #[case::placeholder_version("version = \"VERSION_PLACEHOLDER\"\n", "invalid release version")]
    #[case::leading_v("version = \"v1.2.0\"\n", "leading \"v\"")]
    #[case::unknown_key("version = \"1.2.0\"\nsha256 = \"abc\"\n", "unknown field")]
    #[case::missing_version("[checksums]\n", "missing field")]
    fn rejects_invalid_manifests(#[case] text: &str, #[case] expected: &str) {
        let err = parse_manifest(text).expect_err("expected rejection");
        let msg = err.to_string();
        assert!(msg.contains(expected), "expected '{expected}' in: {msg}");
    }

    #[test]
    fn load_manifest_reports_missing_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().join("absent.toml")).expect("UTF-8 path");
        let err = load_manifest(&path).expect_err("expected missing file");
        assert!(
            matches!(err, InstallerError::InvalidManifest { ref path, .. } if path.as_str().ends_with("absent.toml")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn load_manifest_reads_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().join("release.toml")).expect("UTF-8 path");
        std::fs::write(&path, full_manifest_toml()).expect("write manifest");
        let manifest = load_manifest(&path).expect("valid manifest");
        assert_eq!(manifest.listed_targets().count(), 4);
    }
}
