//! Child process execution for external collaborators.
//!
//! Children inherit stdin/stdout/stderr so the operator sees the tool's own
//! diagnostics. Only the exit status is interpreted.

use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use leapp_deploy_shared::errors::{DeployError, DeployResult};
use tokio::process::Command;

use crate::deploy::options::CommandSpec;

/// Exit code reported for a child killed by a signal (shell convention).
const SIGNAL_EXIT_BASE: i32 = 128;

/// Run `spec` in `cwd` and wait for it. No timeout is applied.
pub async fn run(spec: &CommandSpec, cwd: &Path) -> DeployResult<i32> {
    tracing::info!(command = %spec.display(), cwd = %cwd.display(), "Running");

    let status = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| DeployError::Spawn {
            program: spec.program.clone(),
            reason: e.to_string(),
        })?;

    let code = exit_code(status);
    tracing::debug!(command = %spec.display(), exit_code = code, "Finished");
    Ok(code)
}

/// Map an exit status to a single integer.
pub fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => SIGNAL_EXIT_BASE + signal,
        (None, None) => 1,
    }
}
