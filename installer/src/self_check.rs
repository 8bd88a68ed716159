//! Post-install smoke test.
//!
//! Runs `gh-flow --version` from the path it was just installed to. The
//! binary must start, exit cleanly, and identify itself as `gh-flow`.

use crate::PROGRAM_NAME;
use crate::command::{CommandExecutor, output_excerpt};
use crate::error::{InstallerError, Result};
use crate::install::InstalledExecutable;

/// Run the installed executable's version command.
///
/// Returns the first output line that mentions `gh-flow`, which is normally
/// the version banner.
///
/// # Errors
///
/// Returns [`InstallerError::Verification`] if the executable cannot be run,
/// exits unsuccessfully, or prints nothing that mentions `gh-flow` on either
/// stream.
pub fn self_check(
    executor: &dyn CommandExecutor,
    executable: &InstalledExecutable,
) -> Result<String> {
    let path = executable.path();
    let failed = |reason: String| InstallerError::Verification {
        path: path.to_owned(),
        reason,
    };

    let output = executor
        .run(path.as_str(), &["--version"])
        .map_err(|e| failed(format!("could not run --version: {e}")))?;
    if !output.status.success() {
        return Err(failed(format!(
            "--version exited with {}: {}",
            output.status,
            output_excerpt(&output)
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let banner = [stdout.as_ref(), stderr.as_ref()]
        .into_iter()
        .flat_map(str::lines)
        .map(str::trim)
        .find(|line| line.contains(PROGRAM_NAME))
        .map(str::to_owned);

    match banner {
        Some(line) => {
            if !line.contains(executable.version().as_str()) {
                log::warn!(
                    "{path} reports \"{line}\", expected version {}",
                    executable.version()
                );
            }
            log::debug!("self-check passed: {line}");
            Ok(line)
        }
        None => Err(failed(format!(
            "--version output does not mention {PROGRAM_NAME}: {:?}",
            output_excerpt(&output)
        ))),
    }
}
