use crate::CaptureMode;

use serde::{Deserialize, Serialize};

/// Default chord for a fullscreen capture.
pub const DEFAULT_FULLSCREEN_HOTKEY: &str = "Control+Shift+S";
/// Default chord for an all-monitors capture.
pub const DEFAULT_ALL_MONITORS_HOTKEY: &str = "Control+Shift+A";

/// Named actions a user can bind a global shortcut to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HotkeyAction {
    /// Capture the primary (or configured) monitor and upload it.
    ScreenshotFullscreen,
    /// Capture a user-selected region.
    ScreenshotRegion,
    /// Capture every monitor as one image and upload it.
    ScreenshotAllMonitors,
    /// Upload whatever is on the clipboard.
    UploadClipboard,
    /// Bring the application to the front.
    OpenApp,
}

impl HotkeyAction {
    /// Every action, in registration order.
    pub const ALL: [HotkeyAction; 5] = [
        HotkeyAction::ScreenshotFullscreen,
        HotkeyAction::ScreenshotRegion,
        HotkeyAction::ScreenshotAllMonitors,
        HotkeyAction::UploadClipboard,
        HotkeyAction::OpenApp,
    ];

    /// The capture this action starts, if it is bound to the capture pipeline.
    ///
    /// Actions without a capture mode are persisted but never registered.
    pub fn capture_mode(self) -> Option<CaptureMode> {
        match self {
            HotkeyAction::ScreenshotFullscreen => Some(CaptureMode::Fullscreen),
            HotkeyAction::ScreenshotAllMonitors => Some(CaptureMode::AllMonitors),
            HotkeyAction::ScreenshotRegion
            | HotkeyAction::UploadClipboard
            | HotkeyAction::OpenApp => None,
        }
    }

    /// Human-readable label for logs and messages.
    pub fn label(self) -> &'static str {
        match self {
            HotkeyAction::ScreenshotFullscreen => "fullscreen screenshot",
            HotkeyAction::ScreenshotRegion => "region screenshot",
            HotkeyAction::ScreenshotAllMonitors => "all monitors screenshot",
            HotkeyAction::UploadClipboard => "clipboard upload",
            HotkeyAction::OpenApp => "open app",
        }
    }
}

/// Mapping from actions to combination strings, as persisted in settings.
///
/// An empty string means "no binding" for that action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyBindings {
    /// Fullscreen capture chord.
    #[serde(default = "default_fullscreen")]
    pub screenshot_fullscreen: String,
    /// Region capture chord.
    #[serde(default)]
    pub screenshot_region: String,
    /// All-monitors capture chord.
    #[serde(default = "default_all_monitors")]
    pub screenshot_all_monitors: String,
    /// Clipboard upload chord.
    #[serde(default)]
    pub upload_clipboard: String,
    /// Open-app chord.
    #[serde(default)]
    pub open_app: String,
}

impl Default for HotkeyBindings {
    fn default() -> Self {
        Self {
            screenshot_fullscreen: default_fullscreen(),
            screenshot_region: String::new(),
            screenshot_all_monitors: default_all_monitors(),
            upload_clipboard: String::new(),
            open_app: String::new(),
        }
    }
}

impl HotkeyBindings {
    /// The raw chord string stored for `action`.
    pub fn get(&self, action: HotkeyAction) -> &str {
        match action {
            HotkeyAction::ScreenshotFullscreen => &self.screenshot_fullscreen,
            HotkeyAction::ScreenshotRegion => &self.screenshot_region,
            HotkeyAction::ScreenshotAllMonitors => &self.screenshot_all_monitors,
            HotkeyAction::UploadClipboard => &self.upload_clipboard,
            HotkeyAction::OpenApp => &self.open_app,
        }
    }

    /// Replace the chord stored for `action`.
    pub fn set(&mut self, action: HotkeyAction, combination: impl Into<String>) {
        let slot = match action {
            HotkeyAction::ScreenshotFullscreen => &mut self.screenshot_fullscreen,
            HotkeyAction::ScreenshotRegion => &mut self.screenshot_region,
            HotkeyAction::ScreenshotAllMonitors => &mut self.screenshot_all_monitors,
            HotkeyAction::UploadClipboard => &mut self.upload_clipboard,
            HotkeyAction::OpenApp => &mut self.open_app,
        };
        *slot = combination.into();
    }

    /// Bindable actions with a non-empty chord, in registration order.
    pub fn active(&self) -> impl Iterator<Item = (HotkeyAction, &str)> + '_ {
        HotkeyAction::ALL
            .into_iter()
            .filter(|action| action.capture_mode().is_some())
            .map(|action| (action, self.get(action).trim()))
            .filter(|(_, combination)| !combination.is_empty())
    }
}

fn default_fullscreen() -> String {
    DEFAULT_FULLSCREEN_HOTKEY.to_string()
}

fn default_all_monitors() -> String {
    DEFAULT_ALL_MONITORS_HOTKEY.to_string()
}
