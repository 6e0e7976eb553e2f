//! Host command helpers shared by the peripheral implementations

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::PeripheralError;

/// Commands the host peripherals rely on
pub const PERIPHERAL_COMMANDS: &[&str] = &["systemd-inhibit", "paplay"];

/// Run a command to completion and return its trimmed stdout.
///
/// The child is killed if the returned future is dropped first.
pub async fn run_command(program: &'static str, args: &[&str]) -> Result<String, PeripheralError> {
    debug!("Running {} {:?}", program, args);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| PeripheralError::Spawn { program, source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PeripheralError::Failed {
            program,
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check if a command can be spawned on this host
pub async fn check_command_available(program: &str) -> Result<(), String> {
    Command::new(program)
        .arg("--version")
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|_| format!("{} is not available on this host", program))?;

    debug!("{} is available", program);
    Ok(())
}

/// Warn about missing peripheral commands. Returns how many are available.
///
/// A missing command only disables its peripheral; countdowns still run.
pub async fn check_peripheral_commands() -> usize {
    let mut available = 0;
    for program in PERIPHERAL_COMMANDS {
        match check_command_available(program).await {
            Ok(()) => available += 1,
            Err(e) => warn!("{}; the related alert will be skipped", e),
        }
    }
    info!("{}/{} peripheral commands available", available, PERIPHERAL_COMMANDS.len());
    available
}
