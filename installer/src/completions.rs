//! Shell completion generation.
//!
//! `gh-flow` prints its own completion scripts (`gh-flow completions
//! <shell>`). The installer captures that output into each shell's
//! conventional completion directory. Completions are a convenience, so this
//! stage has no error path: every failure becomes a [`CompletionWarning`].

use crate::command::{CommandExecutor, output_excerpt};
use crate::install::InstalledExecutable;
use crate::layout::CompletionDirs;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Shells completion scripts are generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shell {
    /// GNU Bash.
    Bash,
    /// Z shell.
    Zsh,
    /// Friendly interactive shell.
    Fish,
}

impl Shell {
    /// Every supported shell, in generation order.
    pub const ALL: [Self; 3] = [Self::Bash, Self::Zsh, Self::Fish];

    /// Return the argument `gh-flow completions` expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
        }
    }

    /// Return the file name the shell loads completions for `gh-flow` from.
    #[must_use]
    pub const fn script_name(self) -> &'static str {
        match self {
            Self::Bash => "gh-flow",
            Self::Zsh => "_gh-flow",
            Self::Fish => "gh-flow.fish",
        }
    }

    /// Return the completion directory relative to a `share` directory.
    #[must_use]
    pub const fn share_subdir(self) -> &'static str {
        match self {
            Self::Bash => "bash-completion/completions",
            Self::Zsh => "zsh/site-functions",
            Self::Fish => "fish/vendor_completions.d",
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shell whose completion script could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionWarning {
    /// The affected shell.
    pub shell: Shell,
    /// What went wrong.
    pub reason: String,
}

impl fmt::Display for CompletionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not generate {} completions: {}",
            self.shell, self.reason
        )
    }
}

/// Result of the completion stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Scripts that were written.
    pub written: Vec<Utf8PathBuf>,
    /// Shells that were skipped, and why.
    pub warnings: Vec<CompletionWarning>,
}

/// Generate completion scripts for every shell configured in `dirs`.
///
/// Shells without a directory are skipped silently.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use gh_flow_installer::command::SystemCommandExecutor;
/// use gh_flow_installer::completions::generate_completions;
/// use gh_flow_installer::install::InstalledExecutable;
/// use gh_flow_installer::layout::CompletionDirs;
///
/// let exe = InstalledExecutable::new(
///     "/usr/local/bin/gh-flow".into(),
///     "1.2.0".try_into().expect("valid version"),
/// );
/// let dirs = CompletionDirs::under_share(Utf8Path::new("/usr/local/share"));
/// let outcome = generate_completions(&SystemCommandExecutor, &exe, &dirs);
/// for warning in &outcome.warnings {
///     eprintln!("Warning: {warning}");
/// }
/// ```
pub fn generate_completions(
    executor: &dyn CommandExecutor,
    executable: &InstalledExecutable,
    dirs: &CompletionDirs,
) -> CompletionOutcome {
    let mut outcome = CompletionOutcome::default();
    for (shell, dir) in dirs.iter() {
        match generate_one(executor, executable.path(), shell, dir) {
            Ok(path) => {
                log::info!("wrote {shell} completions to {path}");
                outcome.written.push(path);
            }
            Err(reason) => {
                log::debug!("skipping {shell} completions: {reason}");
                outcome.warnings.push(CompletionWarning { shell, reason });
            }
        }
    }
    outcome
}

fn generate_one(
    executor: &dyn CommandExecutor,
    executable: &Utf8Path,
    shell: Shell,
    dir: &Utf8Path,
) -> Result<Utf8PathBuf, String> {
    let output = executor
        .run(executable.as_str(), &["completions", shell.as_str()])
        .map_err(|e| format!("could not run {executable}: {e}"))?;
    if !output.status.success() {
        return Err(format!(
            "{executable} completions {shell} exited with {}: {}",
            output.status,
            output_excerpt(&output)
        ));
    }
    if output.stdout.iter().all(u8::is_ascii_whitespace) {
        return Err(format!("{executable} completions {shell} printed nothing"));
    }

    std::fs::create_dir_all(dir).map_err(|e| format!("cannot create {dir}: {e}"))?;
    let path = dir.join(shell.script_name());
    std::fs::write(&path, &output.stdout).map_err(|e| format!("cannot write {path}: {e}"))?;
    Ok(path)
}
