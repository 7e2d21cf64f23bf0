//! Single-flight capture → upload → clipboard → notify pipeline.
//!
//! At most one session runs per orchestrator. The in-flight flag is taken
//! synchronously before anything is awaited and released by a drop guard, so
//! it is cleared on success, on failure, and when any step panics.

use crate::{
    CaptureMode, CaptureUploader, ClipboardWriter, NotificationMessage, Notifier,
    SettingsReader, UPLOAD_FAILED_TITLE, UPLOAD_SUCCESS_TITLE, UploadRequest, UploadResult,
    capture::format_bytes,
    output::{CaptureCallbacks, notify_best_effort},
};

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

/// Message used when a session starts without an upload token.
pub const NOT_CONFIGURED_MESSAGE: &str = "Please sign in or configure your API settings";
/// Message used when the upload returns no link.
pub const UNKNOWN_UPLOAD_ERROR: &str = "Unknown upload error occurred";

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The file was uploaded.
    Success(UploadResult),
    /// The session failed. The message is safe to display.
    Failure(String),
}

/// RAII guard that releases the in-flight flag when dropped.
///
/// Held for exactly one session; dropping it, including during a panic
/// unwind, lets the next trigger through.
#[derive(Debug)]
pub struct SessionGuard {
    in_flight: Arc<AtomicBool>,
    session_id: Uuid,
}

impl SessionGuard {
    fn try_acquire(in_flight: &Arc<AtomicBool>) -> Option<Self> {
        in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                in_flight: Arc::clone(in_flight),
                session_id: Uuid::new_v4(),
            })
    }

    /// Correlation id for this session's log lines.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
        debug!(session_id = %self.session_id, "Capture session released");
    }
}

struct Inner<U, C, N> {
    uploader: U,
    clipboard: C,
    notifier: N,
    settings: SettingsReader,
    callbacks: CaptureCallbacks,
    in_flight: Arc<AtomicBool>,
}

/// Runs capture sessions for hotkeys and manual triggers alike.
///
/// Cloning is cheap and every clone shares the same in-flight flag.
pub struct CaptureOrchestrator<U, C, N> {
    inner: Arc<Inner<U, C, N>>,
}

impl<U, C, N> Clone for CaptureOrchestrator<U, C, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<U, C, N> CaptureOrchestrator<U, C, N>
where
    U: CaptureUploader,
    C: ClipboardWriter,
    N: Notifier,
{
    /// Wire the pipeline to its collaborators.
    ///
    /// `settings` is read at the start of every session, never cached.
    pub fn new(
        uploader: U,
        clipboard: C,
        notifier: N,
        settings: SettingsReader,
        callbacks: CaptureCallbacks,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                uploader,
                clipboard,
                notifier,
                settings,
                callbacks,
                in_flight: Arc::new(AtomicBool::new(false)),
            }),
        }
    }

    /// Whether a session is running right now.
    pub fn is_capturing(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Fire-and-forget entry point for hotkey handlers and buttons.
    ///
    /// Returns `false` when a session is already in flight and this trigger
    /// was dropped. Must be called from within a Tokio runtime.
    pub fn trigger(&self, mode: CaptureMode) -> bool {
        let Some(guard) = SessionGuard::try_acquire(&self.inner.in_flight) else {
            info!(mode = %mode, "Screenshot already in progress, skipping");
            return false;
        };

        let this = self.clone();
        tokio::spawn(async move {
            this.run_session(guard, mode).await;
        });

        true
    }

    /// Run a session to completion and return its outcome.
    ///
    /// Returns `None` without doing anything when another session is in
    /// flight. Failures are reported through callbacks and notifications,
    /// never as an error.
    pub async fn capture(&self, mode: CaptureMode) -> Option<UploadOutcome> {
        let Some(guard) = SessionGuard::try_acquire(&self.inner.in_flight) else {
            info!(mode = %mode, "Screenshot already in progress, skipping");
            return None;
        };

        Some(self.run_session(guard, mode).await)
    }

    async fn run_session(&self, guard: SessionGuard, mode: CaptureMode) -> UploadOutcome {
        let span = info_span!("capture_session", session_id = %guard.session_id(), mode = %mode);

        async move {
            // Held until the very end of the session.
            let _guard = guard;

            let settings = self.inner.settings.snapshot();
            if !settings.is_configured() {
                error!("API token or API URL not configured");
                return self.fail(NOT_CONFIGURED_MESSAGE.to_string()).await;
            }

            self.inner.callbacks.screenshot_started();
            info!("Taking screenshot");

            let request = UploadRequest::from_settings(&settings, mode);
            match self.inner.uploader.capture_and_upload(&request).await {
                Ok(result) if !result.url.is_empty() => self.succeed(result).await,
                Ok(result) => {
                    error!(name = %result.name, "Upload returned no URL");
                    self.fail(UNKNOWN_UPLOAD_ERROR.to_string()).await
                }
                Err(e) => {
                    error!(error = ?e, "Screenshot upload failed");
                    self.fail(e.user_message()).await
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn succeed(&self, result: UploadResult) -> UploadOutcome {
        info!(url = %result.url, size = result.size, "Screenshot uploaded");

        match self.inner.clipboard.write_text(&result.url).await {
            Ok(()) => debug!(url = %result.url, "URL copied to clipboard"),
            Err(e) => warn!(error = ?e, "Failed to copy URL to clipboard"),
        }

        self.inner.callbacks.upload_completed(&result);

        notify_best_effort(
            &self.inner.notifier,
            NotificationMessage::new(UPLOAD_SUCCESS_TITLE, success_body(&result)),
        )
        .await;

        UploadOutcome::Success(result)
    }

    async fn fail(&self, message: String) -> UploadOutcome {
        self.inner.callbacks.failed(&message);

        notify_best_effort(
            &self.inner.notifier,
            NotificationMessage::new(UPLOAD_FAILED_TITLE, message.clone()),
        )
        .await;

        UploadOutcome::Failure(message)
    }
}

/// Body of the success notification: size (when known) and the link.
pub fn success_body(result: &UploadResult) -> String {
    let size_info = if result.size > 0 {
        format!(" ({})", format_bytes(result.size))
    } else {
        String::new()
    };
    format!("URL copied to clipboard{}\n{}", size_info, result.url)
}
