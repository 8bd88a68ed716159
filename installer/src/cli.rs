//! CLI argument definitions for the gh-flow installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::artefact::download::DEFAULT_FETCH_TIMEOUT;
use crate::artefact::target::TargetTriple;
use crate::completions::Shell;
use crate::dirs::BaseDirs;
use crate::error::Result;
use crate::layout::InstallLayout;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use std::time::Duration;

/// Manifest file read when `--manifest` is not given.
pub const DEFAULT_MANIFEST: &str = "gh-flow-release.toml";

/// Install the gh-flow GitHub CLI extension from a prebuilt release archive.
#[derive(Parser, Debug)]
#[command(name = "gh-flow-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the gh-flow GitHub CLI extension from a prebuilt release archive.\n\n",
    "The installer picks the archive for this machine from a release manifest, ",
    "downloads it, checks its SHA-256 digest, and places the gh-flow executable ",
    "in the binary directory. It then writes bash, zsh and fish completions and ",
    "runs `gh-flow --version` to confirm the install.\n\n",
    "A digest mismatch always aborts the install. Completion problems are ",
    "reported as warnings and do not fail the run.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install into ~/.local/bin using ./gh-flow-release.toml:\n",
    "    $ gh-flow-installer\n\n",
    "  Install into a Homebrew-style prefix:\n",
    "    $ gh-flow-installer --prefix /opt/homebrew\n\n",
    "  Show what would be downloaded, without downloading:\n",
    "    $ gh-flow-installer --dry-run\n\n",
    "  Print the archive URL for another platform:\n",
    "    $ gh-flow-installer resolve --target aarch64-apple-darwin\n\n",
    "For more information, see: https://github.com/say828/gh-flow",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install gh-flow (default when no subcommand given).
    Install(InstallArgs),

    /// Print the archive URL and digest without downloading anything.
    Resolve(ResolveArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone)]
pub struct InstallArgs {
    /// Release manifest with the version and checksum table.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MANIFEST)]
    pub manifest: Utf8PathBuf,

    /// Install under a Homebrew-style prefix (DIR/bin, DIR/share/...).
    #[arg(long, value_name = "DIR", conflicts_with = "bin_dir")]
    pub prefix: Option<Utf8PathBuf>,

    /// Directory for the executable [default: ~/.local/bin].
    #[arg(long, value_name = "DIR")]
    pub bin_dir: Option<Utf8PathBuf>,

    /// Directory for the bash completion script.
    #[arg(long, value_name = "DIR")]
    pub bash_completions_dir: Option<Utf8PathBuf>,

    /// Directory for the zsh completion script.
    #[arg(long, value_name = "DIR")]
    pub zsh_completions_dir: Option<Utf8PathBuf>,

    /// Directory for the fish completion script.
    #[arg(long, value_name = "DIR")]
    pub fish_completions_dir: Option<Utf8PathBuf>,

    /// Download timeout in seconds.
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Detect the platform and resolve the archive, then exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors and warnings still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Arguments for the resolve command.
#[derive(Parser, Debug, Clone)]
pub struct ResolveArgs {
    /// Release manifest with the version and checksum table.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MANIFEST)]
    pub manifest: Utf8PathBuf,

    /// Resolve for this target triple instead of the host.
    #[arg(long, value_name = "TRIPLE")]
    pub target: Option<TargetTriple>,
}

impl InstallArgs {
    /// Return the download timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Work out the install locations from the flags and `dirs`.
    ///
    /// `--prefix` wins outright; otherwise the per-user layout is used with
    /// `--bin-dir` replacing its binary directory. Per-shell completion
    /// directories are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error when no prefix is given and the user directories
    /// cannot be determined.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use gh_flow_installer::cli::InstallArgs;
    /// use gh_flow_installer::completions::Shell;
    /// # use gh_flow_installer::dirs::BaseDirs;
    /// # use std::path::PathBuf;
    /// # struct NoDirs;
    /// # impl BaseDirs for NoDirs {
    /// #     fn bin_dir(&self) -> Option<PathBuf> { None }
    /// #     fn data_dir(&self) -> Option<PathBuf> { None }
    /// # }
    ///
    /// let args = InstallArgs {
    ///     prefix: Some(Utf8PathBuf::from("/opt/homebrew")),
    ///     ..InstallArgs::default()
    /// };
    /// let layout = args.layout(&NoDirs).expect("prefix needs no home");
    /// assert_eq!(layout.bin_dir, "/opt/homebrew/bin");
    /// assert!(layout.completions.get(Shell::Zsh).is_some());
    /// ```
    pub fn layout(&self, dirs: &dyn BaseDirs) -> Result<InstallLayout> {
        let mut layout = match (&self.prefix, &self.bin_dir) {
            (Some(prefix), _) => InstallLayout::with_prefix(prefix),
            (None, Some(bin_dir)) => InstallLayout {
                bin_dir: bin_dir.clone(),
                ..InstallLayout::for_user(dirs)?
            },
            (None, None) => InstallLayout::for_user(dirs)?,
        };

        let overrides = [
            (Shell::Bash, &self.bash_completions_dir),
            (Shell::Zsh, &self.zsh_completions_dir),
            (Shell::Fish, &self.fish_completions_dir),
        ];
        for (shell, dir) in overrides {
            if let Some(dir) = dir {
                layout.completions = layout.completions.with_dir(shell, dir.clone());
            }
        }
        Ok(layout)
    }
}

impl Default for InstallArgs {
    /// Creates an `InstallArgs` instance matching the CLI defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use gh_flow_installer::cli::InstallArgs;
    ///
    /// let args = InstallArgs::default();
    /// assert_eq!(args.manifest, "gh-flow-release.toml");
    /// assert!(!args.dry_run);
    /// ```
    fn default() -> Self {
        Self {
            manifest: Utf8PathBuf::from(DEFAULT_MANIFEST),
            prefix: None,
            bin_dir: None,
            bash_completions_dir: None,
            zsh_completions_dir: None,
            fish_completions_dir: None,
            timeout: DEFAULT_FETCH_TIMEOUT.as_secs(),
            dry_run: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl Default for ResolveArgs {
    fn default() -> Self {
        Self {
            manifest: Utf8PathBuf::from(DEFAULT_MANIFEST),
            target: None,
        }
    }
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened install arguments.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::Resolve(_)) | None => &self.install,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
