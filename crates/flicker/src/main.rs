//! Flicker: tray screenshot uploader with global hotkeys.

mod app;
mod app_command;
mod config;
mod error;
mod history;
mod hotkey_handler;
mod logging;
mod native;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
};

use crate::{
    config::Config,
    history::UploadHistory,
    native::{ClipboardOutput, DesktopNotifier, NativeCaptureUploader, NativeShortcutRegistry},
};

use std::sync::Arc;

use flicker_core::{
    ActionDispatch, CaptureCallbacks, CaptureOrchestrator, DesiredHotkeys,
    HotkeyLifecycleManager, SettingsHandle,
};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Application entry point.
fn main() {
    let _logging = logging::init();

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Registrations live as long as this manager. Built once the config is loaded.
    let mut hotkeys: Option<HotkeyLifecycleManager<NativeShortcutRegistry>> = None;
    let mut command_tx: Option<mpsc::Sender<AppCommand>> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => match cmd {
                TrayCommand::SetState(state) => {
                    if let Err(e) = tray_manager.update_state(state) {
                        error!(error = ?e, "Failed to update tray icon");
                    }
                }
                TrayCommand::ApplyHotkeys(desired) => {
                    if let (Some(manager), Some(tx)) = (hotkeys.as_mut(), command_tx.as_ref()) {
                        apply_hotkeys(manager, &desired, tx);
                    }
                }
                TrayCommand::Shutdown => {
                    if let Some(manager) = hotkeys.as_mut() {
                        manager.teardown();
                    }
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let (tx, command_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);
                let settings = SettingsHandle::new(config.capture_settings());

                // Register on the main thread - tao's event loop pumps the
                // Windows messages needed for WM_HOTKEY delivery.
                let registry = match NativeShortcutRegistry::new() {
                    Ok(r) => r,
                    Err(e) => {
                        error!("Failed to create hotkey manager: {:?}", e);
                        std::process::exit(1);
                    }
                };
                let handlers = registry.handlers();

                let dispatch_tx = tx.clone();
                let dispatch: ActionDispatch = Arc::new(move |action| {
                    if let Err(e) = dispatch_tx.try_send(AppCommand::Hotkey(action)) {
                        warn!(action = ?action, error = %e, "Dropped hotkey action");
                    }
                });

                let mut manager = HotkeyLifecycleManager::new(registry, dispatch);
                apply_hotkeys(&mut manager, &config.desired_hotkeys(), &tx);
                hotkeys = Some(manager);
                command_tx = Some(tx.clone());

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let clipboard = match ClipboardOutput::new() {
                    Ok(c) => Arc::new(c),
                    Err(e) => {
                        error!("Failed to create ClipboardOutput: {:?}", e);
                        std::process::exit(1);
                    }
                };
                let uploader = match NativeCaptureUploader::new() {
                    Ok(u) => u,
                    Err(e) => {
                        error!("Failed to create uploader: {:?}", e);
                        std::process::exit(1);
                    }
                };
                let notifier = Arc::new(DesktopNotifier);

                let history = match UploadHistory::default_path() {
                    Ok(path) => UploadHistory::load(&path, config.history.max_entries),
                    Err(e) => {
                        error!("Failed to locate history file: {:?}", e);
                        std::process::exit(1);
                    }
                };
                info!(entries = history.entries().len(), "Upload history ready");

                let orchestrator = CaptureOrchestrator::new(
                    uploader,
                    Arc::clone(&clipboard),
                    Arc::clone(&notifier),
                    settings.reader(),
                    capture_callbacks(&tx),
                );

                let tray_proxy = tray_proxy.clone();
                let menu_ids = tray_manager.menu_ids().clone();

                info!(enabled = config.is_enabled(), "Configuration loaded");

                // Spawn tokio runtime on separate thread.
                // TrayManager and the hotkey manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let hotkey_handler = HotkeyHandler::new(handlers);

                        let app = App {
                            orchestrator,
                            clipboard,
                            notifier,
                            history,
                            settings,
                            tray_proxy,
                            command_rx,
                            shutdown_tx,
                            menu_ids,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }
    });
}

/// Reconcile and forward any failures to the app loop for notification.
fn apply_hotkeys(
    manager: &mut HotkeyLifecycleManager<NativeShortcutRegistry>,
    desired: &DesiredHotkeys,
    command_tx: &mpsc::Sender<AppCommand>,
) {
    let report = manager.reconcile(desired);

    if report.failures.is_empty() {
        return;
    }

    if let Err(e) = command_tx.try_send(AppCommand::RegistrationFailed(report.failures)) {
        warn!(error = %e, "Failed to report hotkey registration failures");
    }
}

/// Session hooks that drive the tray state and history through the app loop.
fn capture_callbacks(command_tx: &mpsc::Sender<AppCommand>) -> CaptureCallbacks {
    let started_tx = command_tx.clone();
    let completed_tx = command_tx.clone();
    let failed_tx = command_tx.clone();

    CaptureCallbacks::new()
        .on_screenshot_start(move || {
            let _ = started_tx.try_send(AppCommand::CaptureStarted);
        })
        .on_upload_complete(move |result| {
            let _ = completed_tx.try_send(AppCommand::UploadCompleted(result.clone()));
        })
        .on_error(move |message| {
            let _ = failed_tx.try_send(AppCommand::CaptureFailed(message.to_string()));
        })
}
