use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::exposure::ExposureDuration;

pub const DEFAULT_TICK_MS: u64 = 25;
pub const MIN_TICK_MS: u64 = 5;
pub const MAX_TICK_MS: u64 = 250;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Player preferences. Scores are never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub exposure_secs: f64,
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exposure_secs: ExposureDuration::default().as_secs_f64(),
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl Config {
    pub fn new(exposure: ExposureDuration, tick_ms: u64) -> Self {
        Self {
            exposure_secs: exposure.as_secs_f64(),
            tick_ms: tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS),
        }
    }

    /// Stored exposure, pinned to the allowed range
    pub fn exposure(&self) -> ExposureDuration {
        ExposureDuration::clamped_from_secs(self.exposure_secs)
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable config: {err}");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
