//! Output formatting for the installer CLI.
//!
//! This module renders the messages the binary prints after a run: the
//! success summary, the PATH hint when the binary directory is not on
//! `PATH`, dry-run information, and the `resolve` listing.

use crate::PROGRAM_NAME;
use crate::artefact::descriptor::ArtifactDescriptor;
use crate::pipeline::{InstallPlan, InstallReport};
use camino::Utf8Path;
use std::ffi::OsStr;
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Shell configuration snippets that put a directory on `PATH`.
#[derive(Debug, Clone)]
pub struct ShellSnippet {
    /// Export line for bash/zsh.
    pub bash: String,
    /// Equivalent line for fish shell.
    pub fish: String,
}

impl ShellSnippet {
    /// Create shell snippets for the given binary directory.
    ///
    /// # Example
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use gh_flow_installer::output::ShellSnippet;
    ///
    /// let snippet = ShellSnippet::new(&Utf8PathBuf::from("/home/user/.local/bin"));
    /// assert_eq!(snippet.bash, "export PATH=\"/home/user/.local/bin:$PATH\"");
    /// ```
    #[must_use]
    pub fn new(bin_dir: &Utf8Path) -> Self {
        Self {
            bash: format!("export PATH=\"{bin_dir}:$PATH\""),
            fish: format!("fish_add_path \"{bin_dir}\""),
        }
    }

    /// Format the snippet for display to the user.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!(
            concat!(
                "Add the following to your shell configuration:\n\n",
                "  # bash/zsh (~/.bashrc, ~/.zshrc)\n",
                "  {}\n\n",
                "  # fish (~/.config/fish/config.fish)\n",
                "  {}"
            ),
            self.bash, self.fish
        )
    }
}

/// Return true if `dir` is one of the entries of the `PATH`-style value.
#[must_use]
pub fn path_contains(path_var: &OsStr, dir: &Utf8Path) -> bool {
    std::env::split_paths(path_var).any(|entry| entry == Path::new(dir.as_str()))
}

/// Format the summary printed after a successful install.
#[must_use]
pub fn success_message(report: &InstallReport) -> String {
    let written = report.completions.written.len();
    let plural = if written == 1 { "script" } else { "scripts" };
    let mut message = format!(
        "Successfully installed {PROGRAM_NAME} {} to {} ({written} completion {plural})",
        report.descriptor.version,
        report.installed.path()
    );
    let warnings = report.warnings().len();
    if warnings > 0 {
        message.push_str(&format!(", {warnings} warning(s)"));
    }
    message
}

/// Configuration information for dry-run output.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use gh_flow_installer::layout::InstallLayout;
/// use gh_flow_installer::output::DryRunInfo;
/// use gh_flow_installer::pipeline::{InstallRequest, plan_install};
/// use gh_flow_installer::platform::HostFacts;
///
/// let manifest = gh_flow_installer::artefact::manifest_parser::parse_manifest(
///     r#"
/// version = "1.2.0"
///
/// [checksums]
/// x86_64-unknown-linux-gnu = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// "#,
/// )
/// .expect("valid manifest");
/// let host = HostFacts::new("linux", "x86_64");
/// let layout = InstallLayout::with_prefix(Utf8Path::new("/usr/local"));
/// let request = InstallRequest { manifest: &manifest, host: &host, layout: &layout, quiet: false };
/// let plan = plan_install(&request).expect("plan");
///
/// let info = DryRunInfo { manifest_path: Utf8Path::new("gh-flow-release.toml"), plan: &plan };
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("/usr/local/bin/gh-flow"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Manifest the plan was read from.
    pub manifest_path: &'a Utf8Path,
    /// The resolved plan.
    pub plan: &'a InstallPlan,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let plan = self.plan;
        let mut lines = vec![
            "Dry run - nothing will be downloaded or written".to_owned(),
            String::new(),
            format!("Manifest: {}", self.manifest_path),
            format!("Platform: {}", plan.platform),
        ];
        lines.extend(descriptor_lines(&plan.descriptor));
        lines.push(format!(
            "Executable: {}",
            plan.layout.executable_path(PROGRAM_NAME)
        ));

        lines.push(String::new());
        lines.push("Completion scripts:".to_owned());
        for (shell, dir) in plan.layout.completions.iter() {
            lines.push(format!("  - {shell}: {}", dir.join(shell.script_name())));
        }

        lines.join("\n")
    }
}

/// Format a descriptor for the `resolve` subcommand.
#[must_use]
pub fn resolve_text(descriptor: &ArtifactDescriptor) -> String {
    let mut lines = vec![format!("Platform: {}", descriptor.platform)];
    lines.extend(descriptor_lines(descriptor));
    lines.join("\n")
}

fn descriptor_lines(descriptor: &ArtifactDescriptor) -> [String; 4] {
    [
        format!("Version: {}", descriptor.version),
        format!("Target: {}", descriptor.target),
        format!("URL: {}", descriptor.url),
        format!("SHA-256: {}", descriptor.expected_checksum),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::manifest::ReleaseManifest;
    use crate::artefact::sha256_digest::Sha256Digest;
    use crate::artefact::target::TargetTriple;
    use crate::completions::{CompletionOutcome, CompletionWarning, Shell};
    use crate::install::InstalledExecutable;
    use crate::layout::InstallLayout;
    use crate::pipeline::{InstallRequest, InstallStage, plan_install};
    use crate::platform::HostFacts;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::ffi::OsString;

    #[fixture]
    fn plan() -> InstallPlan {
        let manifest = ReleaseManifest::new("1.2.0", "https://example.test/gh-flow")
            .expect("valid manifest")
            .with_checksum(
                TargetTriple::Aarch64AppleDarwin,
                Sha256Digest::of_bytes(b"archive"),
            );
        let host = HostFacts::new("macos", "aarch64");
        let layout = InstallLayout::with_prefix(Utf8Path::new("/opt/homebrew"));
        plan_install(&InstallRequest {
            manifest: &manifest,
            host: &host,
            layout: &layout,
            quiet: false,
        })
        .expect("plan")
    }

    fn report(plan: InstallPlan, written: usize, warnings: usize) -> InstallReport {
        let completions = CompletionOutcome {
            written: (0..written)
                .map(|i| Utf8PathBuf::from(format!("/tmp/completion-{i}")))
                .collect(),
            warnings: (0..warnings)
                .map(|_| CompletionWarning {
                    shell: Shell::Fish,
                    reason: "boom".to_owned(),
                })
                .collect(),
        };
        InstallReport {
            stages: vec![InstallStage::Done],
            installed: InstalledExecutable::new(
                plan.layout.executable_path(PROGRAM_NAME),
                plan.descriptor.version.clone(),
            ),
            descriptor: plan.descriptor,
            completions,
            version_line: "gh-flow version 1.2.0".to_owned(),
        }
    }

    #[test]
    fn snippet_contains_path() {
        let snippet = ShellSnippet::new(Utf8Path::new("/home/user/.local/bin"));
        assert!(snippet.bash.starts_with("export PATH="));
        assert!(snippet.fish.starts_with("fish_add_path "));
        let display = snippet.display_text();
        assert!(display.contains("bash/zsh"));
        assert!(display.contains("/home/user/.local/bin"));
    }

    #[rstest]
    #[case::present("/usr/bin:/home/user/.local/bin", true)]
    #[case::absent("/usr/bin:/bin", false)]
    #[case::empty("", false)]
    fn path_contains_matches_whole_entries(#[case] path_var: &str, #[case] expected: bool) {
        let path_var = OsString::from(path_var);
        assert_eq!(
            path_contains(&path_var, Utf8Path::new("/home/user/.local/bin")),
            expected
        );
    }

    #[rstest]
    #[case::single(1, 0, "(1 completion script)")]
    #[case::plural(3, 0, "(3 completion scripts)")]
    #[case::warned(2, 1, "(2 completion scripts), 1 warning(s)")]
    fn success_message_summarises_completions(
        plan: InstallPlan,
        #[case] written: usize,
        #[case] warnings: usize,
        #[case] expected: &str,
    ) {
        let msg = success_message(&report(plan, written, warnings));
        assert!(
            msg.starts_with("Successfully installed gh-flow 1.2.0 to /opt/homebrew/bin/gh-flow"),
            "{msg}"
        );
        assert!(msg.ends_with(expected), "{msg}");
    }

    #[rstest]
    fn dry_run_lists_every_destination(plan: InstallPlan) {
        let info = DryRunInfo {
            manifest_path: Utf8Path::new("release.toml"),
            plan: &plan,
        };
        let text = info.display_text();
        assert!(text.contains("Manifest: release.toml"));
        assert!(text.contains("Platform: macOS aarch64"));
        assert!(text.contains("gh-flow-aarch64-apple-darwin.tar.gz"));
        assert!(text.contains("zsh: /opt/homebrew/share/zsh/site-functions/_gh-flow"));
    }

    #[rstest]
    fn resolve_text_shows_url_and_digest(plan: InstallPlan) {
        let text = resolve_text(&plan.descriptor);
        assert!(text.starts_with("Platform: macOS aarch64"));
        assert!(text.contains(&format!(
            "SHA-256: {}",
            Sha256Digest::of_bytes(b"archive")
        )));
    }
}
