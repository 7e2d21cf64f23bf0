//! Multipart upload to the file API.

use crate::native::screen::SavedScreenshot;

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use flicker_core::{CoreError, CoreResult, UploadRequest};
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use tracing::{debug, instrument};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// `data` payload of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type", default)]
    pub file_type: String,
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<UploadResponse>,
}

/// Thin `reqwest` client for the upload endpoint.
pub struct UploadClient {
    client: Client,
}

impl UploadClient {
    /// Build a client with the upload timeout applied.
    #[track_caller]
    pub fn new() -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| upload_failed(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// POST the screenshot as `multipart/form-data`.
    #[instrument(skip(self, screenshot), fields(file_name = %screenshot.file_name))]
    pub async fn upload(
        &self,
        request: &UploadRequest,
        screenshot: &SavedScreenshot,
    ) -> CoreResult<UploadResponse> {
        let part = Part::bytes(screenshot.png.clone())
            .file_name(screenshot.file_name.clone())
            .mime_str("image/png")
            .map_err(|e| upload_failed(e.to_string()))?;

        let mut form = Form::new()
            .part("file", part)
            .text("visibility", request.visibility.as_str());

        if let Some(password) = &request.password {
            form = form.text("password", password.clone());
        }

        let url = upload_url(&request.endpoint);
        debug!(url = %url, "Uploading screenshot");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&request.credentials)
            .multipart(form)
            .send()
            .await
            .map_err(|e| upload_failed(format!("Upload request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(upload_failed(format!(
                "Upload failed with status {}: {}",
                status, body
            )));
        }

        parse_upload_response(&body)
    }
}

/// `{endpoint}/api/files`, tolerating a trailing slash.
pub fn upload_url(endpoint: &str) -> String {
    format!("{}/api/files", endpoint.trim_end_matches('/'))
}

/// Extract the `data` object from a success body.
#[track_caller]
pub fn parse_upload_response(body: &str) -> CoreResult<UploadResponse> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| upload_failed(format!("Failed to parse response: {}", e)))?;

    envelope
        .data
        .ok_or_else(|| upload_failed("Missing 'data' in response".to_string()))
}

#[track_caller]
fn upload_failed(reason: String) -> CoreError {
    CoreError::UploadFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}
