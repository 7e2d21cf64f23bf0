use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Default upload endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://embrly.ca";

/// Who can see an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    /// Anyone with the link.
    #[default]
    Public,
    /// Only the owner.
    Private,
}

impl Visibility {
    /// Wire value expected by the upload API.
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }
}

/// Inputs the capture pipeline reads at the moment a session starts.
#[derive(Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Upload credential. Empty means not signed in.
    pub upload_token: String,
    /// Base URL of the upload service.
    pub endpoint: String,
    /// Visibility applied to new uploads.
    pub visibility: Visibility,
    /// Optional password protecting new uploads.
    pub password: Option<String>,
    /// Monitor for fullscreen captures. `None` is the primary monitor.
    pub monitor_index: Option<usize>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            upload_token: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            visibility: Visibility::Public,
            password: None,
            monitor_index: None,
        }
    }
}

impl CaptureSettings {
    /// Presence check only. Token contents are never inspected.
    pub fn is_configured(&self) -> bool {
        !self.upload_token.trim().is_empty() && !self.endpoint.trim().is_empty()
    }
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for CaptureSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSettings")
            .field("upload_token", &if self.upload_token.is_empty() { "" } else { "***" })
            .field("endpoint", &self.endpoint)
            .field("visibility", &self.visibility)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("monitor_index", &self.monitor_index)
            .finish()
    }
}

/// Writer side of the current-settings holder.
///
/// Updates are synchronous and visible to every [`SettingsReader`] at once,
/// so a trigger that fires after an edit always sees the edit.
#[derive(Debug)]
pub struct SettingsHandle {
    tx: watch::Sender<CaptureSettings>,
}

impl SettingsHandle {
    /// Start with `initial` as the current snapshot.
    pub fn new(initial: CaptureSettings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the current snapshot.
    pub fn replace(&self, settings: CaptureSettings) {
        self.tx.send_replace(settings);
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> CaptureSettings {
        self.tx.borrow().clone()
    }

    /// A reader that always observes the latest snapshot.
    pub fn reader(&self) -> SettingsReader {
        SettingsReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the current-settings holder.
#[derive(Debug, Clone)]
pub struct SettingsReader {
    rx: watch::Receiver<CaptureSettings>,
}

impl SettingsReader {
    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> CaptureSettings {
        self.rx.borrow().clone()
    }
}
