use crate::{
    CaptureMode, CaptureSettings, NOT_CONFIGURED_MESSAGE, UNKNOWN_UPLOAD_ERROR,
    UPLOAD_FAILED_TITLE, UPLOAD_SUCCESS_TITLE, UploadOutcome, Visibility,
    tests::support::{
        Behaviour, FakeClipboard, FakeNotifier, FakeUploader, Gate, Harness, sample_result,
    },
};

use std::{sync::Arc, time::Duration};

use tokio::time::timeout;

#[allow(clippy::panic)]
async fn wait_until_idle(harness: &Harness) {
    timeout(Duration::from_secs(5), async {
        while harness.orchestrator.is_capturing() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("session never finished"));
}

/// WHAT: A successful session copies the URL, reports it, and notifies
/// WHY: This is the main path every hotkey press takes
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_configured_settings_when_capturing_then_url_copied_and_notified() {
    // Given
    let harness = Harness::new(FakeUploader::succeeding());

    // When
    let outcome = harness
        .orchestrator
        .capture(CaptureMode::Fullscreen)
        .await
        .unwrap();

    // Then: Every side effect happened, in order
    assert_eq!(outcome, UploadOutcome::Success(sample_result()));
    assert_eq!(harness.start_count(), 1);
    assert_eq!(harness.completed(), vec![sample_result()]);
    assert!(harness.errors().is_empty());
    assert_eq!(
        harness.clipboard.last().as_deref(),
        Some("https://embrly.ca/u/abc123")
    );
    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, UPLOAD_SUCCESS_TITLE);
    assert!(sent[0].body.contains("https://embrly.ca/u/abc123"));
    assert_eq!(
        harness.journal(),
        vec!["start", "upload", "clipboard", "complete", "notify"]
    );
    assert!(!harness.orchestrator.is_capturing());
}

/// WHAT: A second trigger while a session runs is dropped
/// WHY: Mashing the hotkey must not upload several screenshots
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_session_in_flight_when_triggered_again_then_second_dropped() {
    // Given: An upload held open by a gate
    let gate = Arc::new(Gate::default());
    let harness = Harness::new(FakeUploader::succeeding().gated(Arc::clone(&gate)));

    // When: Two triggers arrive back to back
    let first = harness.orchestrator.trigger(CaptureMode::Fullscreen);
    let second = harness.orchestrator.trigger(CaptureMode::AllMonitors);
    gate.started.notified().await;
    let manual = harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then: Only the first runs
    assert!(first);
    assert!(!second);
    assert!(manual.is_none());
    assert!(harness.orchestrator.is_capturing());

    gate.release.notify_one();
    wait_until_idle(&harness).await;

    assert_eq!(harness.uploader.calls(), 1);
    assert_eq!(harness.start_count(), 1);
    let requests = harness.uploader.requests.lock().unwrap();
    assert!(!requests[0].capture_all_monitors);
}

/// WHAT: The in-flight flag clears after success and failure alike
/// WHY: A failed upload must not lock out the next capture
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failed_session_when_capturing_again_then_second_session_runs() {
    // Given
    let harness = Harness::new(FakeUploader::new(Behaviour::Fail("server said no")));

    // When
    let first = harness.orchestrator.capture(CaptureMode::Fullscreen).await;
    let second = harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then
    assert_eq!(first, Some(UploadOutcome::Failure("server said no".to_string())));
    assert!(second.is_some());
    assert_eq!(harness.uploader.calls(), 2);
    assert!(!harness.orchestrator.is_capturing());
}

/// WHAT: Upload errors reach onError and a failure notification
/// WHY: The user must learn why nothing was copied
#[tokio::test]
async fn given_upload_error_when_capturing_then_error_reported_and_clipboard_untouched() {
    // Given
    let harness = Harness::new(FakeUploader::new(Behaviour::Fail("quota exceeded")));

    // When
    harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then
    assert_eq!(harness.errors(), vec!["quota exceeded".to_string()]);
    assert!(harness.completed().is_empty());
    assert!(harness.clipboard.last().is_none());
    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, UPLOAD_FAILED_TITLE);
    assert_eq!(sent[0].body, "quota exceeded");
    assert_eq!(harness.journal(), vec!["start", "upload", "error", "notify"]);
}

/// WHAT: An upload that returns no URL is a failure
/// WHY: An empty link copied to the clipboard would look like success
#[tokio::test]
async fn given_upload_without_url_when_capturing_then_unknown_error() {
    // Given
    let harness = Harness::new(FakeUploader::new(Behaviour::NoUrl));

    // When
    let outcome = harness.orchestrator.capture(CaptureMode::AllMonitors).await;

    // Then
    assert_eq!(
        outcome,
        Some(UploadOutcome::Failure(UNKNOWN_UPLOAD_ERROR.to_string()))
    );
    assert_eq!(harness.errors(), vec![UNKNOWN_UPLOAD_ERROR.to_string()]);
    assert!(harness.clipboard.last().is_none());
}

/// WHAT: Without a token the session fails before capturing
/// WHY: No screenshot should be taken that cannot be uploaded
#[tokio::test]
async fn given_missing_token_when_capturing_then_not_configured_without_capture() {
    // Given
    let harness = Harness::builder(FakeUploader::succeeding())
        .settings(CaptureSettings::default())
        .build();

    // When
    let outcome = harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then
    assert_eq!(
        outcome,
        Some(UploadOutcome::Failure(NOT_CONFIGURED_MESSAGE.to_string()))
    );
    assert_eq!(harness.uploader.calls(), 0);
    assert_eq!(harness.start_count(), 0);
    assert_eq!(harness.errors(), vec![NOT_CONFIGURED_MESSAGE.to_string()]);
    assert_eq!(harness.notifier.sent()[0].title, UPLOAD_FAILED_TITLE);
}

/// WHAT: Settings are read when the session starts, not when wired
/// WHY: Signing in must take effect without restarting
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_settings_edited_after_wiring_when_capturing_then_new_values_used() {
    // Given: Wired while signed out
    let harness = Harness::builder(FakeUploader::succeeding())
        .settings(CaptureSettings::default())
        .build();

    // When: Signing in, then capturing
    harness.settings.replace(CaptureSettings {
        upload_token: "fresh".to_string(),
        visibility: Visibility::Private,
        ..CaptureSettings::default()
    });
    let outcome = harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then
    assert!(matches!(outcome, Some(UploadOutcome::Success(_))));
    let requests = harness.uploader.requests.lock().unwrap();
    assert_eq!(requests[0].credentials, "fresh");
    assert_eq!(requests[0].visibility, Visibility::Private);
}

/// WHAT: A clipboard failure does not fail the session
/// WHY: The upload already happened and the link is still shown
#[tokio::test]
async fn given_clipboard_failure_when_capturing_then_still_success() {
    // Given
    let harness = Harness::builder(FakeUploader::succeeding())
        .clipboard(FakeClipboard::failing())
        .build();

    // When
    let outcome = harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then
    assert!(matches!(outcome, Some(UploadOutcome::Success(_))));
    assert_eq!(harness.completed().len(), 1);
    assert_eq!(harness.notifier.sent()[0].title, UPLOAD_SUCCESS_TITLE);
}

/// WHAT: Notification permission is requested once when not yet granted
/// WHY: First-run users should still get feedback
#[tokio::test]
async fn given_permission_not_granted_when_capturing_then_requested_and_sent() {
    // Given
    let harness = Harness::builder(FakeUploader::succeeding())
        .notifier(FakeNotifier::asking(true))
        .build();

    // When
    harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then
    assert_eq!(
        harness
            .notifier
            .permission_requests
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
    assert_eq!(harness.notifier.sent().len(), 1);
}

/// WHAT: A denied permission silently skips the notification
/// WHY: Refusing notifications must not break uploads
#[tokio::test]
async fn given_permission_denied_when_capturing_then_no_notification_and_success() {
    // Given
    let harness = Harness::builder(FakeUploader::succeeding())
        .notifier(FakeNotifier::asking(false))
        .build();

    // When
    let outcome = harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then
    assert!(matches!(outcome, Some(UploadOutcome::Success(_))));
    assert!(harness.notifier.sent().is_empty());
    assert!(harness.clipboard.last().is_some());
}

/// WHAT: A failing notifier does not change the outcome
/// WHY: Notifications are best-effort
#[tokio::test]
async fn given_notifier_failure_when_capturing_then_outcome_unaffected() {
    // Given
    let harness = Harness::builder(FakeUploader::succeeding())
        .notifier(FakeNotifier::failing())
        .build();

    // When
    let outcome = harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then
    assert!(matches!(outcome, Some(UploadOutcome::Success(_))));
    assert!(!harness.orchestrator.is_capturing());
}

/// WHAT: Panicking callbacks neither abort the session nor leak the guard
/// WHY: Host UI bugs must not disable capturing
#[tokio::test]
async fn given_panicking_callbacks_when_capturing_then_session_completes() {
    // Given
    let harness = Harness::builder(FakeUploader::succeeding())
        .panicking_callbacks()
        .build();

    // When
    let first = harness.orchestrator.capture(CaptureMode::Fullscreen).await;
    let second = harness.orchestrator.capture(CaptureMode::Fullscreen).await;

    // Then: Both sessions ran all the way through
    assert!(matches!(first, Some(UploadOutcome::Success(_))));
    assert!(matches!(second, Some(UploadOutcome::Success(_))));
    assert_eq!(harness.notifier.sent().len(), 2);
}

/// WHAT: A panic inside the uploader still releases the guard
/// WHY: One crash in the native layer must not block every later capture
#[tokio::test]
async fn given_panicking_uploader_when_triggered_then_guard_released() {
    // Given
    let harness = Harness::new(FakeUploader::new(Behaviour::Panic));

    // When: The spawned session panics
    let orchestrator = harness.orchestrator.clone();
    let joined = tokio::spawn(async move { orchestrator.capture(CaptureMode::Fullscreen).await })
        .await;

    // Then: The task failed but the next trigger is accepted
    assert!(joined.is_err());
    assert!(!harness.orchestrator.is_capturing());
    assert!(harness.orchestrator.trigger(CaptureMode::Fullscreen));
    wait_until_idle(&harness).await;
}
