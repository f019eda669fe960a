//! Submission of the composite launch command to the shell.

use std::process::Command;

use log::info;

/// Run the joined command string under `sh -c` and return the shell's exit
/// code.
///
/// All launches run as background jobs of one shell, so this is
/// fire-and-forget: the code returned reflects the shell's handling of the
/// composite command, not the success of the individual MPI jobs.
pub fn submit(joined: &str) -> Result<i32, failure::Error> {
    info!("submitting: {}", joined);

    let status = Command::new("sh").arg("-c").arg(joined).status()?;

    // A shell killed by a signal has no exit code.
    Ok(status.code().unwrap_or(1))
}
