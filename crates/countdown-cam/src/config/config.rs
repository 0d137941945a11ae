//! Configuration management for countdown-cam.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        CameraConfig, CountdownConfig, DEFAULT_GRANT_PERMISSION, DEFAULT_TICK_INTERVAL_MS,
        LoggingConfig, StorageBackend, StorageConfig, default_album, default_countdown_seconds,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use countdown_cam_core::{CameraFacing, ControllerSettings, RecencyStrategy};
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Countdown timing.
    pub countdown: CountdownConfig,
    /// Simulated camera settings.
    pub camera: CameraConfig,
    /// Media store settings.
    pub storage: StorageConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    ///
    /// Runs before logging is initialised, so it reports through its
    /// return value only.
    #[track_caller]
    pub fn load() -> AppResult<(Self, PathBuf)> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self::defaults_in(Self::project_dirs()?.data_dir());
            config.save_to(&config_path)?;
            config
        };

        Ok((config, config_path))
    }

    /// Parse configuration from a TOML file.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Default configuration with all data paths under `data_dir`.
    pub fn defaults_in(data_dir: &Path) -> Self {
        Config {
            countdown: CountdownConfig {
                seconds: default_countdown_seconds(),
                tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            },
            camera: CameraConfig {
                initial_facing: CameraFacing::default(),
                grant_permission: DEFAULT_GRANT_PERMISSION,
                scratch_dir: data_dir.join("captures"),
            },
            storage: StorageConfig {
                backend: StorageBackend::default(),
                root_dir: data_dir.join("media"),
                album: default_album(),
                recency: RecencyStrategy::default(),
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Check value ranges that serde cannot express.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let reason = if self.countdown.seconds == 0 {
            Some("countdown.seconds must be at least 1".to_string())
        } else if self.countdown.tick_interval_ms == 0 {
            Some("countdown.tick_interval_ms must be at least 1".to_string())
        } else if self.storage.album.trim().is_empty() {
            Some("storage.album must not be empty".to_string())
        } else if self.storage.album.contains(['/', '\\']) {
            Some(format!(
                "storage.album must not contain path separators: {:?}",
                self.storage.album
            ))
        } else if self.storage.backend == StorageBackend::Directory
            && self
                .camera
                .scratch_dir
                .starts_with(self.storage.root_dir.join(&self.storage.album))
        {
            Some(format!(
                "camera.scratch_dir must not be inside the album directory: {:?}",
                self.camera.scratch_dir
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AppError::ConfigError {
                reason,
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(()),
        }
    }

    /// Settings for the session controller.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            countdown_seconds: self.countdown.seconds,
            tick_interval: Duration::from_millis(self.countdown.tick_interval_ms),
            album: self.storage.album.clone(),
            initial_facing: self.camera.initial_facing,
        }
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(())
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "countdown-cam", "Countdown-Cam").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }
}
