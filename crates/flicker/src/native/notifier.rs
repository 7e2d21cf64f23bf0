//! Desktop notifications through `notify-rust`.

use std::panic::Location;

use error_location::ErrorLocation;
use flicker_core::{CoreError, CoreResult, NotificationMessage, Notifier, PermissionState};
use notify_rust::Notification;
use tracing::debug;

const APP_NAME: &str = "Flicker";

/// Notifier for desktop platforms.
///
/// Desktop notification services have no permission prompt, so permission
/// is always reported as granted.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    async fn is_permission_granted(&self) -> CoreResult<bool> {
        Ok(true)
    }

    async fn request_permission(&self) -> CoreResult<PermissionState> {
        Ok(PermissionState::Granted)
    }

    async fn send(&self, message: NotificationMessage) -> CoreResult<()> {
        let title = message.title.clone();

        // `show()` talks to the notification daemon synchronously.
        let shown = tokio::task::spawn_blocking(move || {
            Notification::new()
                .appname(APP_NAME)
                .summary(&message.title)
                .body(&message.body)
                .show()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| CoreError::NotificationFailed {
            reason: format!("Notification task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        shown.map_err(|reason| CoreError::NotificationFailed {
            reason,
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(title = %title, "Notification shown");

        Ok(())
    }
}
