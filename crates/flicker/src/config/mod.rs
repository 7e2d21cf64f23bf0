mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod history_config;
mod upload_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, history_config::HistoryConfig,
    upload_config::UploadConfig,
};

use crate::{AppError, AppResult};

use std::panic::Location;

use directories::ProjectDirs;
use error_location::ErrorLocation;
use flicker_core::DEFAULT_ENDPOINT;

pub(crate) const DEFAULT_MAX_HISTORY: usize = 50;

pub(crate) fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

pub(crate) fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

/// Platform directories for config, data and logs.
#[track_caller]
pub(crate) fn project_dirs() -> AppResult<ProjectDirs> {
    ProjectDirs::from("ca", "embrly", "Flicker").ok_or_else(|| AppError::ConfigError {
        reason: "Failed to get project directories".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}
