use crate::CoreResult;

use std::{future::Future, sync::Arc};

use tracing::{debug, warn};

/// Title of the notification sent after a successful upload.
pub const UPLOAD_SUCCESS_TITLE: &str = "Upload Successful!";
/// Title of the notification sent after a failed session.
pub const UPLOAD_FAILED_TITLE: &str = "Upload Failed";
/// Title of the notification sent when a hotkey cannot be bound.
pub const REGISTRATION_FAILED_TITLE: &str = "Hotkey Registration Failed";

/// Answer to a notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// Notifications may be shown.
    Granted,
    /// The user refused.
    Denied,
}

/// A desktop notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Summary line.
    pub title: String,
    /// Body text.
    pub body: String,
}

impl NotificationMessage {
    /// Build a notification.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Delivers desktop notifications.
pub trait Notifier: Send + Sync + 'static {
    /// Whether notifications may be shown without asking.
    ///
    /// # Errors
    ///
    /// Fails when the permission cannot be queried.
    fn is_permission_granted(&self) -> impl Future<Output = CoreResult<bool>> + Send;

    /// Ask the user for permission.
    ///
    /// # Errors
    ///
    /// Fails when the request cannot be made.
    fn request_permission(&self) -> impl Future<Output = CoreResult<PermissionState>> + Send;

    /// Show `message`.
    ///
    /// # Errors
    ///
    /// Fails when the notification service rejects it.
    fn send(&self, message: NotificationMessage) -> impl Future<Output = CoreResult<()>> + Send;
}

impl<T: Notifier> Notifier for Arc<T> {
    fn is_permission_granted(&self) -> impl Future<Output = CoreResult<bool>> + Send {
        (**self).is_permission_granted()
    }

    fn request_permission(&self) -> impl Future<Output = CoreResult<PermissionState>> + Send {
        (**self).request_permission()
    }

    fn send(&self, message: NotificationMessage) -> impl Future<Output = CoreResult<()>> + Send {
        (**self).send(message)
    }
}

/// Show `message`, asking for permission first if needed.
///
/// Never fails: a missing permission silently drops the notification and
/// any error is logged. Returns whether the notification was handed off.
pub async fn notify_best_effort<N: Notifier>(notifier: &N, message: NotificationMessage) -> bool {
    let granted = match notifier.is_permission_granted().await {
        Ok(true) => true,
        Ok(false) => match notifier.request_permission().await {
            Ok(state) => state == PermissionState::Granted,
            Err(e) => {
                warn!(error = ?e, "Failed to request notification permission");
                false
            }
        },
        Err(e) => {
            warn!(error = ?e, "Failed to query notification permission");
            false
        }
    };

    if !granted {
        debug!(title = %message.title, "Notification permission not granted, skipping");
        return false;
    }

    match notifier.send(message).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = ?e, "Failed to send notification");
            false
        }
    }
}
