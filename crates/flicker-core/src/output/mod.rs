mod callbacks;
mod clipboard;
mod notifier;

pub use {
    callbacks::CaptureCallbacks,
    clipboard::ClipboardWriter,
    notifier::{
        NotificationMessage, Notifier, PermissionState, REGISTRATION_FAILED_TITLE,
        UPLOAD_FAILED_TITLE, UPLOAD_SUCCESS_TITLE, notify_best_effort,
    },
};
