mod format;
mod orchestrator;
mod settings;
mod uploader;

pub use {
    format::format_bytes,
    orchestrator::{
        CaptureOrchestrator, NOT_CONFIGURED_MESSAGE, SessionGuard, UNKNOWN_UPLOAD_ERROR,
        UploadOutcome, success_body,
    },
    settings::{CaptureSettings, DEFAULT_ENDPOINT, SettingsHandle, SettingsReader, Visibility},
    uploader::{CaptureMode, CaptureUploader, UploadRequest, UploadResult},
};
