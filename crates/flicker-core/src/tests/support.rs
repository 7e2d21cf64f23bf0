//! In-memory fakes for every capability the core consumes.

#![allow(clippy::unwrap_used, clippy::panic)]

use crate::{
    CaptureCallbacks, CaptureOrchestrator, CaptureSettings, ClipboardWriter, Combination,
    CoreError, CoreResult, NotificationMessage, Notifier, PermissionState, SettingsHandle,
    ShortcutHandler, ShortcutRegistry, ShortcutState, UploadRequest, UploadResult,
    capture::CaptureUploader,
};

use std::{
    collections::{BTreeMap, BTreeSet},
    panic::Location,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use error_location::ErrorLocation;
use tokio::sync::Notify;

/// Ordered record of side effects across fakes and callbacks.
pub(crate) type Journal = Arc<Mutex<Vec<&'static str>>>;

fn record(journal: &Journal, entry: &'static str) {
    journal.lock().unwrap().push(entry);
}

pub(crate) fn combo(text: &str) -> Combination {
    Combination::parse(text).unwrap()
}

// ---------------------------------------------------------------------------
// Shortcut registry
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct RegistryState {
    pub(crate) bound: BTreeMap<Combination, ShortcutHandler>,
    pub(crate) register_calls: Vec<Combination>,
    pub(crate) unregister_calls: Vec<Combination>,
    pub(crate) rejected: BTreeSet<Combination>,
    pub(crate) stuck: BTreeSet<Combination>,
    pub(crate) external: BTreeSet<Combination>,
}

/// Shortcut registry that records calls and can reject chosen chords.
#[derive(Clone, Default)]
pub(crate) struct FakeRegistry {
    pub(crate) state: Arc<Mutex<RegistryState>>,
}

impl FakeRegistry {
    pub(crate) fn rejecting(text: &str) -> Self {
        let registry = Self::default();
        registry.state.lock().unwrap().rejected.insert(combo(text));
        registry
    }

    /// Chord held by some other application.
    pub(crate) fn with_external(text: &str) -> Self {
        let registry = Self::default();
        registry.state.lock().unwrap().external.insert(combo(text));
        registry
    }

    /// Unregistering this chord fails and leaves it bound.
    pub(crate) fn stick(&self, text: &str) {
        self.state.lock().unwrap().stuck.insert(combo(text));
    }

    /// Deliver an OS event. Returns whether a handler was bound.
    pub(crate) fn fire(&self, text: &str, state: ShortcutState) -> bool {
        let handler = self.state.lock().unwrap().bound.get(&combo(text)).cloned();
        match handler {
            Some(handler) => {
                handler(state);
                true
            }
            None => false,
        }
    }

    pub(crate) fn press(&self, text: &str) -> bool {
        self.fire(text, ShortcutState::Pressed)
    }

    pub(crate) fn is_bound(&self, text: &str) -> bool {
        self.state.lock().unwrap().bound.contains_key(&combo(text))
    }

    pub(crate) fn bound_count(&self) -> usize {
        self.state.lock().unwrap().bound.len()
    }

    pub(crate) fn register_calls(&self) -> usize {
        self.state.lock().unwrap().register_calls.len()
    }

    pub(crate) fn unregister_calls(&self) -> usize {
        self.state.lock().unwrap().unregister_calls.len()
    }
}

impl ShortcutRegistry for FakeRegistry {
    fn register(&mut self, combination: &Combination, handler: ShortcutHandler) -> CoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.register_calls.push(combination.clone());

        if state.rejected.contains(combination) {
            return Err(CoreError::RegistrationFailed {
                combination: combination.to_string(),
                reason: "reserved by the system".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        state.bound.insert(combination.clone(), handler);
        Ok(())
    }

    fn unregister(&mut self, combination: &Combination) -> CoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.unregister_calls.push(combination.clone());

        if state.stuck.contains(combination) {
            return Err(CoreError::UnregistrationFailed {
                combination: combination.to_string(),
                reason: "backend refused".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        state.bound.remove(combination);
        Ok(())
    }

    fn is_registered(&self, combination: &Combination) -> bool {
        let state = self.state.lock().unwrap();
        state.bound.contains_key(combination) || state.external.contains(combination)
    }
}

// ---------------------------------------------------------------------------
// Capture uploader
// ---------------------------------------------------------------------------

pub(crate) enum Behaviour {
    Succeed(UploadResult),
    NoUrl,
    Fail(&'static str),
    Panic,
}

/// Lets a test hold the upload call open.
#[derive(Default)]
pub(crate) struct Gate {
    pub(crate) started: Notify,
    pub(crate) release: Notify,
}

pub(crate) struct FakeUploader {
    behaviour: Behaviour,
    gate: Option<Arc<Gate>>,
    journal: Journal,
    calls: AtomicUsize,
    pub(crate) requests: Mutex<Vec<UploadRequest>>,
}

impl FakeUploader {
    pub(crate) fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            gate: None,
            journal: Journal::default(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn succeeding() -> Self {
        Self::new(Behaviour::Succeed(sample_result()))
    }

    pub(crate) fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn journal(mut self, journal: &Journal) -> Self {
        self.journal = Arc::clone(journal);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CaptureUploader for FakeUploader {
    async fn capture_and_upload(&self, request: &UploadRequest) -> CoreResult<UploadResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        record(&self.journal, "upload");

        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        match &self.behaviour {
            Behaviour::Succeed(result) => Ok(result.clone()),
            Behaviour::NoUrl => Ok(UploadResult {
                url: String::new(),
                ..sample_result()
            }),
            Behaviour::Fail(reason) => Err(CoreError::UploadFailed {
                reason: (*reason).to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Behaviour::Panic => panic!("native layer blew up"),
        }
    }
}

pub(crate) fn sample_result() -> UploadResult {
    UploadResult {
        url: "https://embrly.ca/u/abc123".to_string(),
        name: "screenshot_20260101_120000_deadbeef.png".to_string(),
        size: 1536,
        file_type: "image/png".to_string(),
        screenshot_path: Some(PathBuf::from("/tmp/screenshot.png")),
    }
}

// ---------------------------------------------------------------------------
// Clipboard
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct FakeClipboard {
    fail: bool,
    journal: Journal,
    pub(crate) texts: Mutex<Vec<String>>,
}

impl FakeClipboard {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn journal(mut self, journal: &Journal) -> Self {
        self.journal = Arc::clone(journal);
        self
    }

    pub(crate) fn last(&self) -> Option<String> {
        self.texts.lock().unwrap().last().cloned()
    }
}

impl ClipboardWriter for FakeClipboard {
    async fn write_text(&self, text: &str) -> CoreResult<()> {
        record(&self.journal, "clipboard");
        if self.fail {
            return Err(CoreError::ClipboardFailed {
                reason: "clipboard unavailable".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

pub(crate) struct FakeNotifier {
    granted: bool,
    grant_on_request: bool,
    fail_send: bool,
    journal: Journal,
    pub(crate) permission_requests: AtomicUsize,
    pub(crate) sent: Mutex<Vec<NotificationMessage>>,
}

impl Default for FakeNotifier {
    fn default() -> Self {
        Self {
            granted: true,
            grant_on_request: true,
            fail_send: false,
            journal: Journal::default(),
            permission_requests: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl FakeNotifier {
    /// Permission not yet granted; the request answers `grant`.
    pub(crate) fn asking(grant: bool) -> Self {
        Self {
            granted: false,
            grant_on_request: grant,
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_send: true,
            ..Self::default()
        }
    }

    pub(crate) fn journal(mut self, journal: &Journal) -> Self {
        self.journal = Arc::clone(journal);
        self
    }

    pub(crate) fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for FakeNotifier {
    async fn is_permission_granted(&self) -> CoreResult<bool> {
        Ok(self.granted)
    }

    async fn request_permission(&self) -> CoreResult<PermissionState> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(if self.grant_on_request {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        })
    }

    async fn send(&self, message: NotificationMessage) -> CoreResult<()> {
        record(&self.journal, "notify");
        if self.fail_send {
            return Err(CoreError::NotificationFailed {
                reason: "notification daemon missing".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Orchestrator harness
// ---------------------------------------------------------------------------

pub(crate) type TestOrchestrator =
    CaptureOrchestrator<Arc<FakeUploader>, Arc<FakeClipboard>, Arc<FakeNotifier>>;

pub(crate) fn configured_settings() -> CaptureSettings {
    CaptureSettings {
        upload_token: "test-token".to_string(),
        ..CaptureSettings::default()
    }
}

/// Orchestrator wired to fakes, with every callback recorded.
pub(crate) struct Harness {
    pub(crate) orchestrator: TestOrchestrator,
    pub(crate) uploader: Arc<FakeUploader>,
    pub(crate) clipboard: Arc<FakeClipboard>,
    pub(crate) notifier: Arc<FakeNotifier>,
    pub(crate) settings: SettingsHandle,
    pub(crate) journal: Journal,
    pub(crate) starts: Arc<AtomicUsize>,
    pub(crate) completed: Arc<Mutex<Vec<UploadResult>>>,
    pub(crate) errors: Arc<Mutex<Vec<String>>>,
}

pub(crate) struct HarnessBuilder {
    uploader: FakeUploader,
    clipboard: FakeClipboard,
    notifier: FakeNotifier,
    settings: CaptureSettings,
    panicking_callbacks: bool,
}

impl Harness {
    pub(crate) fn builder(uploader: FakeUploader) -> HarnessBuilder {
        HarnessBuilder {
            uploader,
            clipboard: FakeClipboard::default(),
            notifier: FakeNotifier::default(),
            settings: configured_settings(),
            panicking_callbacks: false,
        }
    }

    pub(crate) fn new(uploader: FakeUploader) -> Self {
        Self::builder(uploader).build()
    }

    pub(crate) fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub(crate) fn completed(&self) -> Vec<UploadResult> {
        self.completed.lock().unwrap().clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub(crate) fn journal(&self) -> Vec<&'static str> {
        self.journal.lock().unwrap().clone()
    }
}

impl HarnessBuilder {
    pub(crate) fn clipboard(mut self, clipboard: FakeClipboard) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub(crate) fn notifier(mut self, notifier: FakeNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub(crate) fn settings(mut self, settings: CaptureSettings) -> Self {
        self.settings = settings;
        self
    }

    pub(crate) fn panicking_callbacks(mut self) -> Self {
        self.panicking_callbacks = true;
        self
    }

    pub(crate) fn build(self) -> Harness {
        let journal = Journal::default();
        let uploader = Arc::new(self.uploader.journal(&journal));
        let clipboard = Arc::new(self.clipboard.journal(&journal));
        let notifier = Arc::new(self.notifier.journal(&journal));
        let settings = SettingsHandle::new(self.settings);

        let starts = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let panicking = self.panicking_callbacks;

        let callbacks = CaptureCallbacks::new()
            .on_screenshot_start({
                let starts = Arc::clone(&starts);
                let journal = Arc::clone(&journal);
                move || {
                    starts.fetch_add(1, Ordering::SeqCst);
                    record(&journal, "start");
                    if panicking {
                        panic!("start callback failed");
                    }
                }
            })
            .on_upload_complete({
                let completed = Arc::clone(&completed);
                let journal = Arc::clone(&journal);
                move |result: &UploadResult| {
                    completed.lock().unwrap().push(result.clone());
                    record(&journal, "complete");
                    if panicking {
                        panic!("complete callback failed");
                    }
                }
            })
            .on_error({
                let errors = Arc::clone(&errors);
                let journal = Arc::clone(&journal);
                move |message: &str| {
                    errors.lock().unwrap().push(message.to_string());
                    record(&journal, "error");
                    if panicking {
                        panic!("error callback failed");
                    }
                }
            });

        let orchestrator = CaptureOrchestrator::new(
            Arc::clone(&uploader),
            Arc::clone(&clipboard),
            Arc::clone(&notifier),
            settings.reader(),
            callbacks,
        );

        Harness {
            orchestrator,
            uploader,
            clipboard,
            notifier,
            settings,
            journal,
            starts,
            completed,
            errors,
        }
    }
}
