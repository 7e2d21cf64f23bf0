use crate::TrayIconState;

use flicker_core::DesiredHotkeys;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`) and the
/// hotkey lifecycle manager (because hotkeys must be registered on the thread
/// pumping OS messages), so all tray, hotkey and process lifecycle changes
/// flow through this enum.
#[derive(Debug, Clone)]
pub enum TrayCommand {
    /// Update the tray icon to a new state.
    SetState(TrayIconState),
    /// Reconcile global hotkeys with freshly loaded settings.
    ApplyHotkeys(DesiredHotkeys),
    /// Release every hotkey and exit the event loop.
    Shutdown,
}
