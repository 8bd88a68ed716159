//! gh-flow installer library.
//!
//! This crate installs the `gh-flow` GitHub CLI extension from a prebuilt
//! release archive: it classifies the host, looks up the matching archive in a
//! release manifest, downloads and verifies it, places the executable, writes
//! shell completions, and runs a `--version` self-check. It is used by the
//! `gh-flow-installer` CLI binary and can be driven programmatically with
//! injected collaborators for testing.
//!
//! # Modules
//!
//! - [`artefact`] - Archive naming, release manifest, download, and verification
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - External command execution abstraction
//! - [`completions`] - Shell completion generation
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Semantic error types
//! - [`install`] - Atomic placement of the executable
//! - [`layout`] - Binary and completion directories
//! - [`output`] - Messages printed by the CLI
//! - [`pipeline`] - Stage-by-stage install orchestration
//! - [`platform`] - Host platform detection
//! - [`self_check`] - Post-install `--version` smoke test

pub mod artefact;
pub mod cli;
pub mod command;
pub mod completions;
pub mod dirs;
pub mod error;
pub mod install;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod self_check;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

/// Name of the installed executable and of its release archives.
pub const PROGRAM_NAME: &str = "gh-flow";
