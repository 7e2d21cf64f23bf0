use crate::{CaptureSettings, CoreResult, Visibility};

use std::{fmt, future::Future, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

/// Which screen area a session captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureMode {
    /// The configured monitor, or the primary one.
    Fullscreen,
    /// Every monitor composited into one image.
    AllMonitors,
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CaptureMode::Fullscreen => "fullscreen",
            CaptureMode::AllMonitors => "all monitors",
        })
    }
}

/// Arguments for one capture-and-upload call.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Upload credential, passed through untouched.
    pub credentials: String,
    /// Base URL of the upload service.
    pub endpoint: String,
    /// Visibility of the new upload.
    pub visibility: Visibility,
    /// Optional password for the new upload.
    pub password: Option<String>,
    /// Composite all monitors instead of one.
    pub capture_all_monitors: bool,
    /// Monitor for single-monitor captures.
    pub monitor_index: Option<usize>,
}

impl UploadRequest {
    /// Build a request from the settings snapshot taken at trigger time.
    pub fn from_settings(settings: &CaptureSettings, mode: CaptureMode) -> Self {
        Self {
            credentials: settings.upload_token.clone(),
            endpoint: settings.endpoint.clone(),
            visibility: settings.visibility,
            password: settings.password.clone(),
            capture_all_monitors: mode == CaptureMode::AllMonitors,
            monitor_index: match mode {
                CaptureMode::Fullscreen => settings.monitor_index,
                CaptureMode::AllMonitors => None,
            },
        }
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("endpoint", &self.endpoint)
            .field("visibility", &self.visibility)
            .field("capture_all_monitors", &self.capture_all_monitors)
            .field("monitor_index", &self.monitor_index)
            .finish_non_exhaustive()
    }
}

/// A finished upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Public URL of the uploaded file. Empty means the upload did not
    /// produce a link.
    pub url: String,
    /// Stored file name.
    pub name: String,
    /// Size in bytes (0 when unknown).
    pub size: u64,
    /// MIME type reported by the server.
    pub file_type: String,
    /// Local copy of the screenshot, when one was kept.
    pub screenshot_path: Option<PathBuf>,
}

/// Opaque capture-and-upload operation supplied by the host.
///
/// The call is awaited in full. Any timeout policy belongs to the
/// implementation.
pub trait CaptureUploader: Send + Sync + 'static {
    /// Take a screenshot and upload it.
    ///
    /// # Errors
    ///
    /// Returns an error whose [`crate::CoreError::user_message`] is safe to
    /// show to the user.
    fn capture_and_upload(
        &self,
        request: &UploadRequest,
    ) -> impl Future<Output = CoreResult<UploadResult>> + Send;
}

impl<T: CaptureUploader> CaptureUploader for Arc<T> {
    fn capture_and_upload(
        &self,
        request: &UploadRequest,
    ) -> impl Future<Output = CoreResult<UploadResult>> + Send {
        (**self).capture_and_upload(request)
    }
}
