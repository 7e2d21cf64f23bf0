//! Flicker core library
//!
//! Global hotkey lifecycle and screenshot capture-and-upload orchestration,
//! independent of any particular OS backend. Every external capability
//! (shortcut registration, capture/upload, clipboard, notifications) is a
//! trait the host implements.
//!
//! # Example
//!
//! ```no_run
//! use flicker_core::{
//!     CaptureCallbacks, CaptureMode, CaptureOrchestrator, CaptureSettings, CaptureUploader,
//!     ClipboardWriter, Notifier, SettingsHandle,
//! };
//!
//! async fn take_one<U, C, N>(uploader: U, clipboard: C, notifier: N)
//! where
//!     U: CaptureUploader,
//!     C: ClipboardWriter,
//!     N: Notifier,
//! {
//!     let settings = SettingsHandle::new(CaptureSettings {
//!         upload_token: "token".to_string(),
//!         ..CaptureSettings::default()
//!     });
//!
//!     let orchestrator = CaptureOrchestrator::new(
//!         uploader,
//!         clipboard,
//!         notifier,
//!         settings.reader(),
//!         CaptureCallbacks::new().on_error(|message| eprintln!("{}", message)),
//!     );
//!
//!     orchestrator.capture(CaptureMode::Fullscreen).await;
//! }
//! ```

mod capture;
mod error;
mod hotkey;
mod output;

pub use {
    capture::{
        CaptureMode, CaptureOrchestrator, CaptureSettings, CaptureUploader, DEFAULT_ENDPOINT,
        NOT_CONFIGURED_MESSAGE, SessionGuard, SettingsHandle, SettingsReader,
        UNKNOWN_UPLOAD_ERROR, UploadOutcome, UploadRequest, UploadResult, Visibility,
        format_bytes, success_body,
    },
    error::{CoreError, Result as CoreResult},
    hotkey::{
        ActionDispatch, BindingState, Combination, DEFAULT_ALL_MONITORS_HOTKEY,
        DEFAULT_FULLSCREEN_HOTKEY, DesiredHotkeys, HotkeyAction, HotkeyBindings,
        HotkeyLifecycleManager, Modifier, ReconcileReport, RegistrationFailure, ShortcutHandler,
        ShortcutRegistry, ShortcutState,
    },
    output::{
        CaptureCallbacks, ClipboardWriter, NotificationMessage, Notifier, PermissionState,
        REGISTRATION_FAILED_TITLE, UPLOAD_FAILED_TITLE, UPLOAD_SUCCESS_TITLE, notify_best_effort,
    },
};
