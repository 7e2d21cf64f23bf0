use crate::{
    AppCommand, AppResult, TrayCommand, TrayIconState,
    config::Config,
    history::{HistoryEntry, UploadHistory},
    native::{ClipboardOutput, DesktopNotifier, NativeCaptureUploader},
    tray_manager::MenuIds,
};

use std::{sync::Arc, time::Duration};

use flicker_core::{
    CaptureMode, CaptureOrchestrator, ClipboardWriter, NotificationMessage,
    REGISTRATION_FAILED_TITLE, RegistrationFailure, SettingsHandle, UploadResult,
    notify_best_effort,
};
use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::MenuEvent;

/// Capture pipeline wired to the native collaborators.
pub type Orchestrator =
    CaptureOrchestrator<NativeCaptureUploader, Arc<ClipboardOutput>, Arc<DesktopNotifier>>;

/// Main application state.
///
/// Runs on the async runtime thread. Tray and hotkey changes go back to the
/// main thread through `tray_proxy` because `TrayIcon` and the hotkey manager
/// must remain on the UI thread.
pub struct App {
    pub(crate) orchestrator: Orchestrator,
    pub(crate) clipboard: Arc<ClipboardOutput>,
    pub(crate) notifier: Arc<DesktopNotifier>,
    pub(crate) history: UploadHistory,
    pub(crate) settings: SettingsHandle,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) menu_ids: MenuIds,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Flicker starting");

        // MenuEvent::receiver() is a crossbeam receiver with a blocking recv(),
        // so one blocking task forwards tray events. It exits on the first send
        // after tray_event_rx is dropped.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    if !self.handle_tray_event(event).await {
                        break;
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        let _ = self.shutdown_tx.send(true);

        // Last: the main thread releases hotkeys and exits the process.
        self.send_tray(TrayCommand::Shutdown);
        info!("Flicker shut down successfully");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn handle_command(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::Hotkey(action) => match action.capture_mode() {
                Some(mode) => self.start_capture(mode),
                None => debug!(action = ?action, "Hotkey action has no capture handler"),
            },
            AppCommand::CaptureStarted => {
                self.send_tray(TrayCommand::SetState(TrayIconState::Capturing));
            }
            AppCommand::UploadCompleted(result) => {
                self.record_upload(&result);
                self.send_tray(TrayCommand::SetState(TrayIconState::Idle));
            }
            AppCommand::CaptureFailed(message) => {
                error!(message = %message, "Screenshot failed");
                self.send_tray(TrayCommand::SetState(TrayIconState::Idle));
            }
            AppCommand::RegistrationFailed(failures) => {
                self.report_registration_failures(&failures).await;
            }
        }
    }

    /// Returns false when the loop should stop.
    #[instrument(skip(self))]
    async fn handle_tray_event(&mut self, event: MenuEvent) -> bool {
        let id = &event.id;

        if *id == self.menu_ids.take_screenshot {
            self.start_capture(CaptureMode::Fullscreen);
        } else if *id == self.menu_ids.capture_all {
            self.start_capture(CaptureMode::AllMonitors);
        } else if *id == self.menu_ids.copy_last_link {
            self.copy_last_link().await;
        } else if *id == self.menu_ids.open_settings {
            if let Err(e) = open_settings() {
                error!(error = ?e, "Failed to open settings");
            }
        } else if *id == self.menu_ids.reload_settings {
            if let Err(e) = self.reload_settings() {
                error!(error = ?e, "Failed to reload settings");
            }
        } else if *id == self.menu_ids.exit {
            info!("Exit requested from tray menu");
            return false;
        }

        true
    }

    fn start_capture(&self, mode: CaptureMode) {
        if !self.orchestrator.trigger(mode) {
            debug!(mode = %mode, "Capture trigger dropped");
        }
    }

    fn record_upload(&mut self, result: &UploadResult) {
        self.history.prepend(HistoryEntry::from_result(result));
        if let Err(e) = self.history.save() {
            warn!(error = ?e, "Failed to save upload history");
        }
    }

    async fn copy_last_link(&self) {
        let Some(entry) = self.history.latest() else {
            info!("No uploads yet, nothing to copy");
            return;
        };

        match self.clipboard.write_text(&entry.url).await {
            Ok(()) => info!(url = %entry.url, "Last link copied to clipboard"),
            Err(e) => warn!(error = ?e, "Failed to copy last link"),
        }
    }

    /// Re-read the config file, then hand the new bindings to the main thread.
    #[instrument(skip(self))]
    fn reload_settings(&mut self) -> AppResult<()> {
        let config = Config::load()?;

        self.settings.replace(config.capture_settings());
        self.history.set_max_entries(config.history.max_entries);
        self.send_tray(TrayCommand::ApplyHotkeys(config.desired_hotkeys()));

        info!(enabled = config.is_enabled(), "Settings reloaded");

        Ok(())
    }

    async fn report_registration_failures(&self, failures: &[RegistrationFailure]) {
        for failure in failures {
            warn!(
                action = ?failure.action,
                combination = %failure.combination,
                "Hotkey registration failed"
            );
            notify_best_effort(
                &self.notifier,
                NotificationMessage::new(REGISTRATION_FAILED_TITLE, failure.message()),
            )
            .await;
        }
    }

    fn send_tray(&self, command: TrayCommand) {
        if let Err(e) = self.tray_proxy.send_event(command) {
            warn!(error = ?e, "Failed to reach main thread");
        }
    }
}

#[track_caller]
fn open_settings() -> AppResult<()> {
    let path = Config::config_path()?;
    open::that(&path)?;
    info!(config_path = ?path, "Opened settings file");
    Ok(())
}
