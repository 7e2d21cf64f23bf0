use crate::UploadResult;

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::error;

type StartCallback = Box<dyn Fn() + Send + Sync>;
type CompleteCallback = Box<dyn Fn(&UploadResult) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Optional hooks the pipeline calls as a session progresses.
///
/// Each hook runs synchronously inside the pipeline step that fires it, at
/// most once per session. A panicking hook is caught and logged. It never
/// aborts the session or leaves the in-flight guard set.
#[derive(Default)]
pub struct CaptureCallbacks {
    on_screenshot_start: Option<StartCallback>,
    on_upload_complete: Option<CompleteCallback>,
    on_error: Option<ErrorCallback>,
}

impl CaptureCallbacks {
    /// No hooks installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called right before the capture-and-upload call.
    pub fn on_screenshot_start(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_screenshot_start = Some(Box::new(f));
        self
    }

    /// Called with the result after a successful upload.
    pub fn on_upload_complete(
        mut self,
        f: impl Fn(&UploadResult) + Send + Sync + 'static,
    ) -> Self {
        self.on_upload_complete = Some(Box::new(f));
        self
    }

    /// Called with a displayable message when a session fails.
    pub fn on_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub(crate) fn screenshot_started(&self) {
        if let Some(f) = &self.on_screenshot_start {
            guarded("on_screenshot_start", || f());
        }
    }

    pub(crate) fn upload_completed(&self, result: &UploadResult) {
        if let Some(f) = &self.on_upload_complete {
            guarded("on_upload_complete", || f(result));
        }
    }

    pub(crate) fn failed(&self, message: &str) {
        if let Some(f) = &self.on_error {
            guarded("on_error", || f(message));
        }
    }
}

impl std::fmt::Debug for CaptureCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureCallbacks")
            .field("on_screenshot_start", &self.on_screenshot_start.is_some())
            .field("on_upload_complete", &self.on_upload_complete.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

fn guarded(name: &'static str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        error!(callback = name, "Capture callback panicked");
    }
}
