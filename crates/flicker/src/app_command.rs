use flicker_core::{HotkeyAction, RegistrationFailure, UploadResult};

/// Commands delivered to the application loop on the async runtime.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// A registered global hotkey was pressed.
    Hotkey(HotkeyAction),
    /// A capture session began capturing.
    CaptureStarted,
    /// A capture session uploaded its screenshot.
    UploadCompleted(UploadResult),
    /// A capture session failed with a displayable message.
    CaptureFailed(String),
    /// Hotkeys that could not be bound during the last reconciliation.
    RegistrationFailed(Vec<RegistrationFailure>),
}
