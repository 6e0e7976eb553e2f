//! Wake lock backed by a `systemd-inhibit` child process
//!
//! The inhibitor lives as long as the child. The child runs `sleep <timeout>`,
//! so a lock that is never released still expires on its own.

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use super::{PeripheralError, PeripheralResult, WakeLock};

const PROGRAM: &str = "systemd-inhibit";

#[derive(Debug, Default)]
pub struct InhibitWakeLock {
    child: Option<Child>,
}

impl InhibitWakeLock {
    pub fn new() -> Self {
        Self { child: None }
    }
}

#[async_trait]
impl WakeLock for InhibitWakeLock {
    async fn acquire(&mut self, timeout: Duration) -> PeripheralResult {
        if self.is_held() {
            debug!("Wake lock already held");
            return Ok(());
        }

        let child = Command::new(PROGRAM)
            .args([
                "--what=sleep:idle",
                "--who=countdown-timer",
                "--why=Countdown in progress",
                "--mode=block",
                "sleep",
            ])
            .arg(timeout.as_secs().max(1).to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PeripheralError::Spawn { program: PROGRAM, source })?;

        info!("Wake lock acquired for up to {}s", timeout.as_secs());
        self.child = Some(child);
        Ok(())
    }

    async fn release(&mut self) -> PeripheralResult {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if let Ok(Some(status)) = child.try_wait() {
            debug!("Wake lock had already expired ({})", status);
            return Ok(());
        }

        child
            .kill()
            .await
            .map_err(|source| PeripheralError::Spawn { program: PROGRAM, source })?;
        info!("Wake lock released");
        Ok(())
    }

    fn is_held(&mut self) -> bool {
        match self.child.as_mut().map(|child| child.try_wait()) {
            Some(Ok(None)) => true,
            Some(_) => {
                // Expired or unpollable; either way it no longer inhibits anything
                self.child = None;
                false
            }
            None => false,
        }
    }
}
