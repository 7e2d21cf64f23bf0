mod clipboard;
mod notifier;
mod screen;
mod shortcuts;
mod upload;
mod uploader;

pub(crate) use {
    clipboard::ClipboardOutput,
    notifier::DesktopNotifier,
    shortcuts::{HandlerTable, NativeShortcutRegistry},
    uploader::NativeCaptureUploader,
};

#[cfg(test)]
pub(crate) use {
    screen::{MonitorBounds, composite, screenshot_file_name, take_screenshot, virtual_bounds},
    shortcuts::hotkey_for,
    upload::{UploadResponse, parse_upload_response, upload_url},
};
