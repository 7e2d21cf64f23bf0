//! System clipboard output.

use crate::{AppError, AppResult};

use std::{
    panic::Location,
    sync::{Mutex, PoisonError},
};

use arboard::Clipboard;
use error_location::ErrorLocation;
use flicker_core::{ClipboardWriter, CoreError, CoreResult};
use tracing::{debug, info, instrument};

/// Clipboard writer backed by `arboard`.
///
/// The `Clipboard` is kept alive for the whole process so X11/Wayland
/// selections are still served after a write.
pub struct ClipboardOutput {
    clipboard: Mutex<Clipboard>,
}

impl ClipboardOutput {
    /// Open the system clipboard.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
            reason: format!("Failed to initialize clipboard: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("Clipboard initialized");

        Ok(Self {
            clipboard: Mutex::new(clipboard),
        })
    }
}

impl ClipboardWriter for ClipboardOutput {
    async fn write_text(&self, text: &str) -> CoreResult<()> {
        let mut clipboard = self.clipboard.lock().unwrap_or_else(PoisonError::into_inner);

        clipboard
            .set_text(text)
            .map_err(|e| CoreError::ClipboardFailed {
                reason: format!("Failed to set clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(text_len = text.len(), "Text copied to clipboard");

        Ok(())
    }
}
