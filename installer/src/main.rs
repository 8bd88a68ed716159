//! gh-flow installer CLI entrypoint.
//!
//! This binary downloads the prebuilt gh-flow archive for the host, verifies
//! its digest, installs the executable, and writes shell completions. After
//! installation, it prints a PATH hint if the binary directory is not on
//! `PATH`.

use camino::Utf8Path;
use clap::Parser;
use gh_flow_installer::artefact::download::HttpFetcher;
use gh_flow_installer::artefact::manifest_parser::load_manifest;
use gh_flow_installer::cli::{Cli, Command, InstallArgs, ResolveArgs};
use gh_flow_installer::command::SystemCommandExecutor;
use gh_flow_installer::dirs::SystemBaseDirs;
use gh_flow_installer::error::InstallerError;
use gh_flow_installer::output::{
    DryRunInfo, ShellSnippet, path_contains, resolve_text, success_message, write_stderr_line,
};
use gh_flow_installer::pipeline::{
    InstallFailure, InstallReport, InstallRequest, plan_install, run_install,
};
use gh_flow_installer::platform::{HostFacts, detect_platform};
use std::ffi::OsStr;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter, e.g. `debug` or
/// `gh_flow_installer=trace`.
const LOG_ENV: &str = "GH_FLOW_INSTALLER_LOG";

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Setup(#[from] InstallerError),
    #[error(transparent)]
    Install(#[from] InstallFailure),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.install_args());
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Routes library `log` records to stderr, filtered by `GH_FLOW_INSTALLER_LOG`
/// or, when unset, by the `-v`/`-q` flags.
fn init_logging(args: &InstallArgs) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(args.verbosity, args.quiet)));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
    {
        log::debug!("keeping the existing log subscriber: {err}");
    }
}

fn default_log_level(verbosity: u8, quiet: bool) -> &'static str {
    match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<(), RunError> {
    match &cli.command {
        Some(Command::Resolve(args)) => run_resolve(args, stdout),
        Some(Command::Install(args)) => run_install_command(args, stderr),
        None => run_install_command(&cli.install, stderr),
    }
}

/// Runs the full install, or only its offline stages with `--dry-run`.
fn run_install_command(args: &InstallArgs, stderr: &mut dyn Write) -> Result<(), RunError> {
    let manifest = load_manifest(&args.manifest)?;
    let dirs = SystemBaseDirs::new().ok_or_else(|| InstallerError::LayoutUnavailable {
        reason: "no home directory found".to_owned(),
    });
    // A prefix needs no home directory, so only fail when it is consulted.
    let layout = match dirs {
        Ok(dirs) => args.layout(&dirs)?,
        Err(err) if args.prefix.is_none() => return Err(err.into()),
        Err(_) => args.layout(&NoBaseDirs)?,
    };
    let host = HostFacts::current();
    let request = InstallRequest {
        manifest: &manifest,
        host: &host,
        layout: &layout,
        quiet: args.quiet,
    };

    if args.dry_run {
        let plan = plan_install(&request)?;
        let info = DryRunInfo {
            manifest_path: &args.manifest,
            plan: &plan,
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    let fetcher = HttpFetcher::with_timeout(args.timeout());
    let report = run_install(&request, &fetcher, &SystemCommandExecutor, stderr)?;

    let path_var = std::env::var_os("PATH");
    report_success(&report, &layout.bin_dir, args.quiet, path_var.as_deref(), stderr);
    Ok(())
}

/// Prints the summary and, when `bin_dir` is not on `PATH`, the shell
/// snippets that add it. `--quiet` suppresses both.
fn report_success(
    report: &InstallReport,
    bin_dir: &Utf8Path,
    quiet: bool,
    path_var: Option<&OsStr>,
    stderr: &mut dyn Write,
) {
    if quiet {
        return;
    }
    write_stderr_line(stderr, "");
    write_stderr_line(stderr, success_message(report));

    if path_var.is_some_and(|path| path_contains(path, bin_dir)) {
        return;
    }
    write_stderr_line(stderr, "");
    write_stderr_line(stderr, format!("{bin_dir} is not on your PATH."));
    write_stderr_line(stderr, ShellSnippet::new(bin_dir).display_text());
}

/// Prints the archive URL and digest for the host or `--target`.
fn run_resolve(args: &ResolveArgs, stdout: &mut dyn Write) -> Result<(), RunError> {
    let manifest = load_manifest(&args.manifest)?;
    let platform = match args.target {
        Some(target) => target.platform(),
        None => detect_platform(&HostFacts::current())?,
    };
    let descriptor = manifest.locate(platform)?;
    writeln!(stdout, "{}", resolve_text(&descriptor))
        .map_err(|e| InstallerError::WriteFailed { source: e })?;
    Ok(())
}

/// Stands in for the user directories when only `--prefix` is used.
struct NoBaseDirs;

impl gh_flow_installer::dirs::BaseDirs for NoBaseDirs {
    fn bin_dir(&self) -> Option<std::path::PathBuf> {
        None
    }

    fn data_dir(&self) -> Option<std::path::PathBuf> {
        None
    }
}

fn exit_code_for_run_result(result: Result<(), RunError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use gh_flow_installer::PROGRAM_NAME;
    use gh_flow_installer::artefact::manifest::ReleaseManifest;
    use gh_flow_installer::artefact::sha256_digest::Sha256Digest;
    use gh_flow_installer::artefact::target::TargetTriple;
    use gh_flow_installer::completions::CompletionOutcome;
    use gh_flow_installer::install::InstalledExecutable;
    use gh_flow_installer::layout::InstallLayout;
    use gh_flow_installer::pipeline::InstallStage;
    use rstest::{fixture, rstest};
    use std::ffi::OsString;

    #[fixture]
    fn report() -> InstallReport {
        let manifest = ReleaseManifest::new("1.2.0", "https://example.test/gh-flow")
            .expect("valid manifest")
            .with_checksum(
                TargetTriple::X86_64UnknownLinuxGnu,
                Sha256Digest::of_bytes(b"archive"),
            );
        let host = HostFacts::new("linux", "x86_64");
        let layout = InstallLayout::with_prefix(Utf8Path::new("/opt/gh"));
        let plan = plan_install(&InstallRequest {
            manifest: &manifest,
            host: &host,
            layout: &layout,
            quiet: false,
        })
        .expect("plan");
        InstallReport {
            stages: vec![InstallStage::Done],
            installed: InstalledExecutable::new(
                layout.executable_path(PROGRAM_NAME),
                plan.descriptor.version.clone(),
            ),
            descriptor: plan.descriptor,
            completions: CompletionOutcome::default(),
            version_line: "gh-flow version 1.2.0".to_owned(),
        }
    }

    fn success_text(report: &InstallReport, quiet: bool, path_var: &str) -> String {
        let path_var = OsString::from(path_var);
        let mut stderr = Vec::new();
        report_success(
            report,
            Utf8Path::new("/opt/gh/bin"),
            quiet,
            Some(path_var.as_os_str()),
            &mut stderr,
        );
        String::from_utf8(stderr).expect("stderr UTF-8")
    }

    #[rstest]
    fn report_success_prints_path_hint_when_bin_dir_is_missing(report: InstallReport) {
        let text = success_text(&report, false, "/usr/bin:/bin");
        assert!(text.contains("Successfully installed gh-flow 1.2.0"), "{text}");
        assert!(text.contains("/opt/gh/bin is not on your PATH."), "{text}");
        assert!(text.contains("export PATH=\"/opt/gh/bin:$PATH\""), "{text}");
    }

    #[rstest]
    fn report_success_omits_hint_when_bin_dir_is_on_path(report: InstallReport) {
        let text = success_text(&report, false, "/usr/bin:/opt/gh/bin");
        assert!(text.contains("Successfully installed"), "{text}");
        assert!(!text.contains("not on your PATH"), "{text}");
    }

    #[rstest]
    fn report_success_is_silent_when_quiet(report: InstallReport) {
        let text = success_text(&report, true, "/usr/bin:/bin");
        assert!(text.is_empty(), "{text}");
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = InstallerError::LayoutUnavailable {
            reason: "no home directory found".to_owned(),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err.into()), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("error: could not determine install locations"));
    }

    #[rstest]
    #[case::quiet(0, true, "error")]
    #[case::default(0, false, "warn")]
    #[case::verbose(1, false, "info")]
    #[case::very_verbose(2, false, "debug")]
    #[case::trace(5, false, "trace")]
    fn default_log_level_follows_flags(
        #[case] verbosity: u8,
        #[case] quiet: bool,
        #[case] expected: &str,
    ) {
        assert_eq!(default_log_level(verbosity, quiet), expected);
    }

    #[test]
    fn missing_manifest_fails_before_anything_else() {
        let temp = tempfile::tempdir().expect("temp dir");
        let manifest = Utf8PathBuf::try_from(temp.path().join("absent.toml")).expect("UTF-8 path");
        let cli = Cli::parse_from([
            "gh-flow-installer",
            "--manifest",
            manifest.as_str(),
            "--prefix",
            temp.path().to_str().expect("UTF-8 path"),
        ]);

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let err = run(&cli, &mut stdout, &mut stderr).expect_err("expected failure");

        assert!(matches!(
            err,
            RunError::Setup(InstallerError::InvalidManifest { .. })
        ));
        assert!(!temp.path().join("bin").exists());
    }

    #[test]
    fn resolve_prints_descriptor_for_requested_target() {
        let temp = tempfile::tempdir().expect("temp dir");
        let manifest = temp.path().join("gh-flow-release.toml");
        std::fs::write(
            &manifest,
            concat!(
                "version = \"1.2.0\"\n\n",
                "[checksums]\n",
                "aarch64-apple-darwin = ",
                "\"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\"\n",
            ),
        )
        .expect("write manifest");
        let cli = Cli::parse_from([
            "gh-flow-installer",
            "resolve",
            "--manifest",
            manifest.to_str().expect("UTF-8 path"),
            "--target",
            "aarch64-apple-darwin",
        ]);

        let mut stdout = Vec::new();
        run(&cli, &mut stdout, &mut Vec::new()).expect("resolve succeeds");

        let text = String::from_utf8(stdout).expect("stdout UTF-8");
        assert!(text.contains(
            "URL: https://github.com/say828/gh-flow/releases/download/v1.2.0/gh-flow-aarch64-apple-darwin.tar.gz"
        ));
    }

    #[test]
    fn resolve_fails_for_unlisted_target() {
        let temp = tempfile::tempdir().expect("temp dir");
        let manifest = temp.path().join("gh-flow-release.toml");
        std::fs::write(&manifest, "version = \"1.2.0\"\n").expect("write manifest");
        let cli = Cli::parse_from([
            "gh-flow-installer",
            "resolve",
            "--manifest",
            manifest.to_str().expect("UTF-8 path"),
            "--target",
            "x86_64-unknown-linux-gnu",
        ]);

        let err = run(&cli, &mut Vec::new(), &mut Vec::new()).expect_err("expected failure");

        assert!(err.to_string().contains("lists no checksum"), "{err}");
    }
}
