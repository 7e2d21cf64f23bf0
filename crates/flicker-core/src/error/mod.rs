use error_location::ErrorLocation;
use thiserror::Error;

/// Capture-pipeline and hotkey errors with source location tracking.
///
/// The `Display` output includes the source location and is meant for logs.
/// Use [`CoreError::user_message`] for anything shown to the user.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A combination string could not be parsed.
    #[error("Invalid key combination '{input}': {reason} {location}")]
    InvalidCombination {
        /// The text that failed to parse.
        input: String,
        /// Why the text was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The OS (or another application) refused a shortcut registration.
    #[error("Failed to register '{combination}': {reason} {location}")]
    RegistrationFailed {
        /// Canonical combination string.
        combination: String,
        /// Description from the shortcut backend.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Releasing a shortcut registration failed.
    #[error("Failed to unregister '{combination}': {reason} {location}")]
    UnregistrationFailed {
        /// Canonical combination string.
        combination: String,
        /// Description from the shortcut backend.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Taking the screenshot failed.
    #[error("Capture failed: {reason} {location}")]
    CaptureFailed {
        /// Human-readable description, safe to display.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Uploading the screenshot failed.
    #[error("Upload failed: {reason} {location}")]
    UploadFailed {
        /// Human-readable description, safe to display.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing to the clipboard failed.
    #[error("Clipboard write failed: {reason} {location}")]
    ClipboardFailed {
        /// Description of the clipboard error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Querying permission for or sending a desktop notification failed.
    #[error("Notification failed: {reason} {location}")]
    NotificationFailed {
        /// Description of the notification error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Message suitable for notifications and UI callbacks (no source location).
    pub fn user_message(&self) -> String {
        match self {
            CoreError::InvalidCombination { input, reason, .. } => {
                format!("Invalid key combination '{}': {}", input, reason)
            }
            CoreError::RegistrationFailed {
                combination,
                reason,
                ..
            } => format!("Failed to register '{}': {}", combination, reason),
            CoreError::UnregistrationFailed {
                combination,
                reason,
                ..
            } => format!("Failed to unregister '{}': {}", combination, reason),
            CoreError::CaptureFailed { reason, .. }
            | CoreError::UploadFailed { reason, .. }
            | CoreError::ClipboardFailed { reason, .. }
            | CoreError::NotificationFailed { reason, .. } => reason.clone(),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
