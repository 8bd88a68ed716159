//! Host platform detection.
//!
//! Classifies the executing host into a [`PlatformKey`]: an OS family and an
//! architecture family. Classification never guesses. A value outside the
//! recognised families is an error even when the other axis is known.

use crate::error::{InstallerError, Result};
use std::fmt;

/// Operating system families with published archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Apple macOS.
    MacOs,
    /// GNU/Linux.
    Linux,
}

impl OsFamily {
    fn classify(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "macos" | "darwin" => Some(Self::MacOs),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => f.write_str("macOS"),
            Self::Linux => f.write_str("Linux"),
        }
    }
}

/// Processor architecture families with published archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchFamily {
    /// Intel/AMD 64-bit.
    X86_64,
    /// ARM 64-bit.
    Aarch64,
}

impl ArchFamily {
    fn classify(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Some(Self::X86_64),
            "aarch64" | "arm64" => Some(Self::Aarch64),
            _ => None,
        }
    }
}

impl fmt::Display for ArchFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86_64 => f.write_str("x86_64"),
            Self::Aarch64 => f.write_str("aarch64"),
        }
    }
}

/// The (OS family, architecture family) pair selecting an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformKey {
    os: OsFamily,
    arch: ArchFamily,
}

impl PlatformKey {
    /// Create a platform key from its two axes.
    #[must_use]
    pub const fn new(os: OsFamily, arch: ArchFamily) -> Self {
        Self { os, arch }
    }

    /// Return the OS family.
    #[must_use]
    pub const fn os(&self) -> OsFamily {
        self.os
    }

    /// Return the architecture family.
    #[must_use]
    pub const fn arch(&self) -> ArchFamily {
        self.arch
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.os, self.arch)
    }
}

/// Raw facts about the host, as reported by the environment.
///
/// Kept separate from classification so tests can inject any pair.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::platform::{HostFacts, detect_platform};
///
/// let host = HostFacts::new("linux", "x86_64");
/// let key = detect_platform(&host).expect("supported host");
/// assert_eq!(key.to_string(), "Linux x86_64");
///
/// assert!(detect_platform(&HostFacts::new("linux", "riscv64")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFacts {
    os: String,
    arch: String,
}

impl HostFacts {
    /// Create host facts from raw OS and architecture strings.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Read the facts of the running process.
    #[must_use]
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Return the raw OS string.
    #[must_use]
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Return the raw architecture string.
    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }
}

/// Classify `host` into a [`PlatformKey`].
///
/// # Errors
///
/// Returns [`InstallerError::UnsupportedPlatform`] when either axis is not a
/// recognised family.
pub fn detect_platform(host: &HostFacts) -> Result<PlatformKey> {
    let os = OsFamily::classify(host.os()).ok_or_else(|| unsupported(host, "operating system"))?;
    let arch =
        ArchFamily::classify(host.arch()).ok_or_else(|| unsupported(host, "architecture"))?;
    let key = PlatformKey::new(os, arch);
    log::debug!("classified host {}/{} as {key}", host.os(), host.arch());
    Ok(key)
}

fn unsupported(host: &HostFacts, axis: &str) -> InstallerError {
    InstallerError::UnsupportedPlatform {
        platform: format!("{}/{}", host.os(), host.arch()),
        reason: format!(
            "unrecognised {axis}; prebuilt archives exist for macOS and Linux on x86_64 and aarch64"
        ),
    }
}
