use crate::{
    AppResult,
    native::{screen::take_screenshot, upload::UploadClient},
};

use std::panic::Location;

use error_location::ErrorLocation;
use flicker_core::{CaptureUploader, CoreError, CoreResult, UploadRequest, UploadResult};
use tracing::{info, instrument};

/// Screen capture with `xcap`, then multipart upload with `reqwest`.
pub struct NativeCaptureUploader {
    client: UploadClient,
}

impl NativeCaptureUploader {
    /// Build the HTTP client.
    #[track_caller]
    pub fn new() -> AppResult<Self> {
        let client = UploadClient::new()?;
        Ok(Self { client })
    }
}

impl CaptureUploader for NativeCaptureUploader {
    #[instrument(skip(self))]
    async fn capture_and_upload(&self, request: &UploadRequest) -> CoreResult<UploadResult> {
        let all_monitors = request.capture_all_monitors;
        let monitor_index = request.monitor_index;

        let screenshot =
            tokio::task::spawn_blocking(move || take_screenshot(all_monitors, monitor_index))
                .await
                .map_err(|e| CoreError::CaptureFailed {
                    reason: format!("Capture task panicked: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })??;

        let response = self.client.upload(request, &screenshot).await?;

        info!(url = %response.url, size = response.size, "Upload accepted");

        Ok(UploadResult {
            url: response.url,
            name: response.name,
            size: response.size,
            file_type: response.file_type,
            screenshot_path: Some(screenshot.path),
        })
    }
}
