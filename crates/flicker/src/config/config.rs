//! Configuration management for flicker.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{CaptureConfig, HistoryConfig, UploadConfig, project_dirs},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use flicker_core::{CaptureSettings, DesiredHotkeys, HotkeyBindings};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Upload credentials and options.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Global hotkey bindings per action.
    #[serde(default)]
    pub hotkeys: HotkeyBindings,
    /// Screen capture options.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Upload history options.
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating and saving defaults if the
    /// file does not exist.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, enabled = config.is_enabled(), "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
                debug!(config_dir = ?parent, "Created config directory");
            }
        }

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

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Whether an upload token is configured. Hotkeys stay unbound otherwise.
    pub fn is_enabled(&self) -> bool {
        !self.upload.token.trim().is_empty()
    }

    /// Snapshot handed to the capture pipeline.
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            upload_token: self.upload.token.trim().to_string(),
            endpoint: self.upload.endpoint.clone(),
            visibility: self.upload.visibility,
            password: self
                .upload
                .password
                .clone()
                .filter(|p| !p.is_empty()),
            monitor_index: self.capture.monitor_index,
        }
    }

    /// Hotkey state the lifecycle manager should reconcile to.
    pub fn desired_hotkeys(&self) -> DesiredHotkeys {
        DesiredHotkeys::new(self.hotkeys.clone(), self.is_enabled())
    }

    /// Path of the platform config file.
    #[track_caller]
    pub fn config_path() -> AppResult<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}
