//! Recent uploads, newest first, persisted as JSON next to the logs.

use crate::{AppError, AppResult, config::project_dirs};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use flicker_core::UploadResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// One finished upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Public link.
    pub url: String,
    /// Stored file name.
    pub name: String,
    /// When the upload finished.
    pub timestamp: DateTime<Utc>,
    /// MIME type reported by the server.
    #[serde(default)]
    pub file_type: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

impl HistoryEntry {
    /// Entry for an upload that just finished.
    pub fn from_result(result: &UploadResult) -> Self {
        Self {
            url: result.url.clone(),
            name: result.name.clone(),
            timestamp: Utc::now(),
            file_type: result.file_type.clone(),
            size: result.size,
        }
    }
}

/// Bounded list of recent uploads backed by a JSON file.
#[derive(Debug)]
pub struct UploadHistory {
    path: PathBuf,
    max_entries: usize,
    entries: Vec<HistoryEntry>,
}

impl UploadHistory {
    /// Path of the platform history file.
    #[track_caller]
    pub fn default_path() -> AppResult<PathBuf> {
        Ok(project_dirs()?.data_dir().join("history.json"))
    }

    /// Load from `path`. A missing or unreadable file yields an empty history.
    #[instrument]
    pub fn load(path: &Path, max_entries: usize) -> Self {
        let mut entries = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Vec<HistoryEntry>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(history_path = ?path, error = ?e, "Corrupt upload history, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(history_path = ?path, error = ?e, "Failed to read upload history");
                Vec::new()
            }
        };
        entries.truncate(max_entries);

        debug!(entries = entries.len(), "Upload history loaded");

        Self {
            path: path.to_path_buf(),
            max_entries,
            entries,
        }
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Most recent upload.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// Add `entry` at the front, dropping the oldest beyond the cap.
    ///
    /// An older entry with the same URL is replaced.
    pub fn prepend(&mut self, entry: HistoryEntry) {
        self.remove(&entry.url);
        self.entries.insert(0, entry);
        self.entries.truncate(self.max_entries);
    }

    /// Remove every entry with `url`. Returns whether anything was removed.
    pub fn remove(&mut self, url: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.url != url);
        self.entries.len() != before
    }

    /// Change the cap, trimming immediately.
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
        self.entries.truncate(max_entries);
    }

    /// Persist with the same temp-file-then-rename pattern as the config.
    #[track_caller]
    #[instrument(skip(self), fields(entries = self.entries.len()))]
    pub fn save(&self) -> AppResult<()> {
        let contents =
            serde_json::to_string_pretty(&self.entries).map_err(|e| AppError::HistoryError {
                reason: format!("Failed to serialize history: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("json.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::HistoryError {
            reason: format!("Failed to create temp history file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .and_then(|()| temp_file.sync_all())
            .map_err(|e| AppError::HistoryError {
                reason: format!("Failed to write temp history file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        fs::rename(&temp_path, &self.path).map_err(|e| AppError::HistoryError {
            reason: format!("Failed to rename temp history to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(history_path = ?self.path, "Upload history saved");

        Ok(())
    }
}
