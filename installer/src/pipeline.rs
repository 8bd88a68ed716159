//! Install pipeline orchestration.
//!
//! Runs the stages strictly in order:
//!
//! ```text
//! Detecting → Resolving → Fetching → Verifying → Installing
//!     → GeneratingCompletions → SelfChecking → Done
//! ```
//!
//! Each stage starts only after its predecessor succeeded. The first error
//! stops the run and is returned as an [`InstallFailure`] naming the stage.
//! Completion problems are the one exception: they are reported as warnings
//! and the run continues to the self-check.

use std::fmt;
use std::io::Write;

use crate::PROGRAM_NAME;
use crate::artefact::descriptor::ArtifactDescriptor;
use crate::artefact::download::ArchiveFetcher;
use crate::artefact::extraction::extract_executable;
use crate::artefact::manifest::ReleaseManifest;
use crate::artefact::verification::verify_archive;
use crate::command::CommandExecutor;
use crate::completions::{CompletionOutcome, CompletionWarning, generate_completions};
use crate::error::{InstallerError, Result};
use crate::install::{BinaryInstaller, InstalledExecutable};
use crate::layout::InstallLayout;
use crate::output::write_stderr_line;
use crate::platform::{HostFacts, PlatformKey, detect_platform};
use crate::self_check::self_check;

/// The stages of one install run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallStage {
    /// Classifying the host platform.
    Detecting,
    /// Looking up the archive for the platform.
    Resolving,
    /// Downloading the archive.
    Fetching,
    /// Checking the archive digest.
    Verifying,
    /// Extracting and placing the executable.
    Installing,
    /// Writing shell completion scripts.
    GeneratingCompletions,
    /// Running the installed executable's version command.
    SelfChecking,
    /// Every stage succeeded.
    Done,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Detecting => "platform detection",
            Self::Resolving => "artifact lookup",
            Self::Fetching => "download",
            Self::Verifying => "verification",
            Self::Installing => "installation",
            Self::GeneratingCompletions => "completion generation",
            Self::SelfChecking => "self-check",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A fatal error together with the stage it stopped the run in.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct InstallFailure {
    /// The stage that failed.
    pub stage: InstallStage,
    /// What went wrong.
    #[source]
    pub error: InstallerError,
    /// Every stage entered, ending with the failed one.
    pub stages: Vec<InstallStage>,
}

/// What a run installs, and where.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    /// Release version and checksum table.
    pub manifest: &'a ReleaseManifest,
    /// Raw host facts to classify.
    pub host: &'a HostFacts,
    /// Destination directories.
    pub layout: &'a InstallLayout,
    /// When true, suppress progress output. Warnings are still printed.
    pub quiet: bool,
}

/// The outcome of the two offline stages: what would be installed, and
/// where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// The host's platform key.
    pub platform: PlatformKey,
    /// The archive to fetch.
    pub descriptor: ArtifactDescriptor,
    /// Where the executable will be placed.
    pub layout: InstallLayout,
}

/// The record of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Every stage entered, in order, ending with [`InstallStage::Done`].
    pub stages: Vec<InstallStage>,
    /// The archive that was installed.
    pub descriptor: ArtifactDescriptor,
    /// The executable on disk.
    pub installed: InstalledExecutable,
    /// Completion scripts written and shells skipped.
    pub completions: CompletionOutcome,
    /// The version line printed by the installed executable.
    pub version_line: String,
}

impl InstallReport {
    /// Return the completion warnings raised during the run.
    #[must_use]
    pub fn warnings(&self) -> &[CompletionWarning] {
        &self.completions.warnings
    }
}

#[derive(Debug, Default)]
struct StageTracker {
    entered: Vec<InstallStage>,
}

impl StageTracker {
    fn enter(&mut self, stage: InstallStage) {
        log::debug!("entering stage: {stage}");
        self.entered.push(stage);
    }

    fn run<T>(
        &mut self,
        stage: InstallStage,
        step: impl FnOnce() -> Result<T>,
    ) -> std::result::Result<T, InstallFailure> {
        self.enter(stage);
        step().map_err(|error| {
            log::debug!("{stage} failed: {error}");
            InstallFailure {
                stage,
                error,
                stages: self.entered.clone(),
            }
        })
    }
}

/// Run the offline stages only: classify the host and look up its archive.
///
/// No network access and no filesystem writes happen here.
///
/// # Errors
///
/// Returns an [`InstallFailure`] at [`InstallStage::Detecting`] or
/// [`InstallStage::Resolving`] when the host is not covered.
pub fn plan_install(request: &InstallRequest<'_>) -> std::result::Result<InstallPlan, InstallFailure> {
    let mut tracker = StageTracker::default();
    resolve(&mut tracker, request)
}

/// Run every stage against the given collaborators.
///
/// Progress lines go to `stderr` unless `request.quiet` is set; completion
/// warnings are always written there as `Warning: ...` lines.
///
/// # Errors
///
/// Returns an [`InstallFailure`] naming the first stage that failed. No
/// stage after it runs.
pub fn run_install(
    request: &InstallRequest<'_>,
    fetcher: &dyn ArchiveFetcher,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> std::result::Result<InstallReport, InstallFailure> {
    let mut tracker = StageTracker::default();
    let plan = resolve(&mut tracker, request)?;
    let descriptor = plan.descriptor;
    progress(
        stderr,
        request.quiet,
        format!(
            "Installing {PROGRAM_NAME} {} for {}",
            descriptor.version, plan.platform
        ),
    );

    progress(stderr, request.quiet, format!("Downloading {}...", descriptor.url));
    let bytes = tracker.run(InstallStage::Fetching, || Ok(fetcher.fetch(&descriptor.url)?))?;

    let verified = tracker.run(InstallStage::Verifying, || {
        Ok(verify_archive(&descriptor, bytes)?)
    })?;
    progress(
        stderr,
        request.quiet,
        format!("Verified sha256 {}", verified.digest()),
    );

    let installed = tracker.run(InstallStage::Installing, || {
        let executable = extract_executable(&verified, PROGRAM_NAME)?;
        BinaryInstaller::new(request.layout.bin_dir.clone()).install(&executable, &descriptor.version)
    })?;
    progress(
        stderr,
        request.quiet,
        format!("Installed {}", installed.path()),
    );

    tracker.enter(InstallStage::GeneratingCompletions);
    let completions = generate_completions(executor, &installed, &request.layout.completions);
    for warning in &completions.warnings {
        write_stderr_line(stderr, format!("Warning: {warning}"));
    }

    let version_line = tracker.run(InstallStage::SelfChecking, || {
        self_check(executor, &installed)
    })?;
    progress(stderr, request.quiet, format!("Self-check passed: {version_line}"));

    tracker.enter(InstallStage::Done);
    Ok(InstallReport {
        stages: tracker.entered,
        descriptor,
        installed,
        completions,
        version_line,
    })
}

fn resolve(
    tracker: &mut StageTracker,
    request: &InstallRequest<'_>,
) -> std::result::Result<InstallPlan, InstallFailure> {
    let platform = tracker.run(InstallStage::Detecting, || detect_platform(request.host))?;
    let descriptor = tracker.run(InstallStage::Resolving, || request.manifest.locate(platform))?;
    log::info!("resolved {descriptor}");
    Ok(InstallPlan {
        platform,
        descriptor,
        layout: request.layout.clone(),
    })
}

fn progress(stderr: &mut dyn Write, quiet: bool, message: impl fmt::Display) {
    if !quiet {
        write_stderr_line(stderr, message);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
