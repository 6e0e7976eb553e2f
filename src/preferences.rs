//! Persisted user preferences (first-launch flag, selected theme)

use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Countdown display themes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Default,
    LiquidGlass,
    SoftNeumorphism,
    MinimalistZen,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Default,
        Theme::LiquidGlass,
        Theme::SoftNeumorphism,
        Theme::MinimalistZen,
        Theme::Dark,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Default => "Dynamic",
            Theme::LiquidGlass => "Liquid Glass",
            Theme::SoftNeumorphism => "Soft Neumorphism",
            Theme::MinimalistZen => "Minimalist Zen",
            Theme::Dark => "Dark",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub first_launch: bool,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            first_launch: true,
            theme: Theme::Default,
        }
    }
}

/// Partial preferences change; `None` keeps the stored value
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub first_launch: Option<bool>,
    #[serde(default)]
    pub theme: Option<Theme>,
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to write preferences to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// JSON-file backed preferences with an in-memory copy
#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    current: Mutex<Preferences>,
}

impl PreferencesStore {
    /// Load preferences from `path`, falling back to defaults if the file is
    /// missing or unreadable
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(preferences) => {
                    debug!("Loaded preferences from {}", path.display());
                    preferences
                }
                Err(e) => {
                    warn!("Ignoring corrupt preferences at {}: {}", path.display(), e);
                    Preferences::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No preferences at {}, using defaults", path.display());
                Preferences::default()
            }
            Err(e) => {
                warn!("Failed to read preferences at {}: {}", path.display(), e);
                Preferences::default()
            }
        };

        Self {
            path,
            current: Mutex::new(current),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> Preferences {
        self.current.lock().await.clone()
    }

    /// Apply `update`, persist it, and return the stored preferences
    pub async fn update(&self, update: PreferencesUpdate) -> Result<Preferences, PreferencesError> {
        let mut current = self.current.lock().await;
        let mut next = current.clone();
        if let Some(first_launch) = update.first_launch {
            next.first_launch = first_launch;
        }
        if let Some(theme) = update.theme {
            next.theme = theme;
        }

        self.persist(&next).await?;
        info!("Preferences saved: theme={:?}, first_launch={}", next.theme, next.first_launch);
        *current = next.clone();
        Ok(next)
    }

    /// Write through a temporary file so a crash never leaves half a file behind
    async fn persist(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        let json = serde_json::to_vec_pretty(preferences)?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}
