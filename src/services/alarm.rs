//! Looping alarm sound played through `paplay`

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{system::run_command, AlarmPlayer, PeripheralError, PeripheralResult};

/// Preferred alarm sound, then a plainer fallback
pub const DEFAULT_ALARM_SOUNDS: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo/alarm-clock-elapsed.oga",
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
];

#[derive(Debug)]
pub struct LoopingAlarm {
    sound: Option<PathBuf>,
    player: Option<JoinHandle<()>>,
}

impl LoopingAlarm {
    pub fn new(sound: PathBuf) -> Self {
        Self {
            sound: Some(sound),
            player: None,
        }
    }

    /// Use the first default sound present on this host
    pub fn with_default_sound() -> Self {
        let sound = DEFAULT_ALARM_SOUNDS
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf);
        if sound.is_none() {
            warn!("No default alarm sound found; alarm will be skipped");
        }
        Self { sound, player: None }
    }

    pub fn is_playing(&self) -> bool {
        self.player.as_ref().is_some_and(|player| !player.is_finished())
    }
}

#[async_trait]
impl AlarmPlayer for LoopingAlarm {
    async fn play(&mut self) -> PeripheralResult {
        if self.is_playing() {
            debug!("Alarm already playing");
            return Ok(());
        }

        let sound = self
            .sound
            .clone()
            .ok_or_else(|| PeripheralError::Unavailable("alarm sound".to_string()))?;
        if tokio::fs::metadata(&sound).await.is_err() {
            return Err(PeripheralError::Unavailable(sound.display().to_string()));
        }

        info!("Playing alarm sound {}", sound.display());
        let path = sound.to_string_lossy().into_owned();
        self.player = Some(tokio::spawn(async move {
            loop {
                if let Err(e) = run_command("paplay", &[path.as_str()]).await {
                    warn!("{}, stopping alarm loop", e);
                    break;
                }
            }
        }));
        Ok(())
    }

    async fn stop(&mut self) -> PeripheralResult {
        if let Some(player) = self.player.take() {
            // Dropping the in-flight `paplay` run kills the child
            player.abort();
            info!("Alarm sound stopped");
        }
        Ok(())
    }
}
