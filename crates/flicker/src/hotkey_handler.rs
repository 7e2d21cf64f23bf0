//! Forwards global hotkey events to the registered handlers.
//!
//! The native registry on the main thread owns the registrations. This side
//! only listens on the global [`GlobalHotKeyEvent`] channel and looks each
//! event up in the shared [`HandlerTable`].

use crate::{AppResult, native::HandlerTable};

use std::time::Duration;

use flicker_core::ShortcutState;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Hotkey event forwarder.
pub struct HotkeyHandler {
    handlers: HandlerTable,
}

impl HotkeyHandler {
    /// Create a forwarder over the registry's handler table.
    ///
    /// This struct is `Send` and can live on any thread.
    pub fn new(handlers: HandlerTable) -> Self {
        Self { handlers }
    }

    /// Run the event loop until a shutdown signal is received.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // GlobalHotKeyEvent::receiver() is a crossbeam receiver with a blocking
        // recv(), so one blocking task forwards events without polling. It exits
        // on the first send after event_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    self.dispatch(event);
                }
            }
        }

        drop(event_rx);

        // The blocking task may sit in recv() until the next hotkey event.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    fn dispatch(&self, event: GlobalHotKeyEvent) {
        let Some(handler) = self.handlers.get(event.id) else {
            debug!(hotkey_id = event.id, "Event for unknown hotkey, ignoring");
            return;
        };

        handler(shortcut_state(event.state));
    }
}

pub(crate) fn shortcut_state(state: HotKeyState) -> ShortcutState {
    match state {
        HotKeyState::Pressed => ShortcutState::Pressed,
        HotKeyState::Released => ShortcutState::Released,
    }
}
