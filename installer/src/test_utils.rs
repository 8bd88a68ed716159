//! Shared test utilities for the installer crate.
//!
//! Exposed to integration tests through the `test-support` feature.

use crate::artefact::extraction::ExtractedExecutable;
use crate::command::CommandExecutor;
use crate::error::{InstallerError, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with the given stdout.
pub fn stdout_output(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., the installed `gh-flow` path).
    pub cmd: String,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// Expect `cmd args...` and answer with `result`.
    pub fn new(cmd: impl Into<String>, args: &[&str], result: Result<Output>) -> Self {
        Self {
            cmd: cmd.into(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
            result,
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Returns predefined results in order. An unexpected or mismatched call is
/// answered with [`InstallerError::StubMismatch`] and remembered, so that
/// [`StubExecutor::assert_finished`] fails even when the caller swallowed
/// the error.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    mismatches: RefCell<Vec<String>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            mismatches: RefCell::new(Vec::new()),
        }
    }

    /// Asserts that every expected call happened and nothing else did.
    ///
    /// # Panics
    ///
    /// Panics if expected calls remain or any call did not match.
    pub fn assert_finished(&self) {
        let mismatches = self.mismatches.borrow();
        assert!(mismatches.is_empty(), "unexpected invocations: {mismatches:?}");
        let remaining = self.expected.borrow();
        assert!(
            remaining.is_empty(),
            "expected further command invocations: {remaining:?}"
        );
    }

    fn mismatch(&self, message: String) -> Result<Output> {
        self.mismatches.borrow_mut().push(message.clone());
        Err(InstallerError::StubMismatch { message })
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let invocation = format!("{cmd} {}", args.join(" "));
        let Some(call) = self.expected.borrow_mut().pop_front() else {
            return self.mismatch(format!("no call expected, got `{invocation}`"));
        };
        if call.cmd != cmd || call.args != args {
            return self.mismatch(format!(
                "expected `{} {}`, got `{invocation}`",
                call.cmd,
                call.args.join(" ")
            ));
        }
        call.result
    }
}

/// Build a `.tar.gz` holding regular files with mode `0o755`.
///
/// Entry names are written into the header verbatim, so traversal paths
/// such as `../x` can be produced for negative tests.
///
/// # Panics
///
/// Panics if the in-memory archive cannot be written.
pub fn tar_gz_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, contents) in entries {
        let mut header = raw_header(path, tar::EntryType::Regular);
        header.set_size(contents.len() as u64);
        header.set_cksum();
        builder.append(&header, *contents).expect("append tar entry");
    }
    finish(builder)
}

/// Build a `.tar.gz` whose only entry is a symlink at `path`.
///
/// # Panics
///
/// Panics if the in-memory archive cannot be written.
pub fn tar_gz_link_archive(path: &str, target: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let mut header = raw_header(path, tar::EntryType::Symlink);
    header.set_size(0);
    header.set_link_name(target).expect("link name");
    header.set_cksum();
    builder.append(&header, std::io::empty()).expect("append tar entry");
    finish(builder)
}

/// Wrap `bytes` as an extracted `gh-flow` executable.
pub fn extracted_executable(bytes: &[u8]) -> ExtractedExecutable {
    ExtractedExecutable::new(crate::PROGRAM_NAME, bytes.to_vec())
}

/// A shell script that behaves like `gh-flow` for `--version` and
/// `completions <shell>`.
pub fn fake_gh_flow_script(version: &str) -> String {
    format!(
        concat!(
            "#!/bin/sh\n",
            "case \"$1\" in\n",
            "  --version) echo \"gh-flow version {version}\" ;;\n",
            "  completions) echo \"# gh-flow $2 completions\" ;;\n",
            "  *) echo \"unknown command $1\" >&2; exit 2 ;;\n",
            "esac\n",
        ),
        version = version
    )
}

fn raw_header(path: &str, kind: tar::EntryType) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    let name = &mut header.as_old_mut().name;
    let len = path.len().min(name.len());
    name[..len].copy_from_slice(&path.as_bytes()[..len]);
    header.set_entry_type(kind);
    header.set_mode(0o755);
    header.set_mtime(0);
    header
}

fn finish(builder: tar::Builder<GzEncoder<Vec<u8>>>) -> Vec<u8> {
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}
