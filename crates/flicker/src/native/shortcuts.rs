//! `ShortcutRegistry` over `global-hotkey`.
//!
//! Must live on the main thread: `tao`'s event loop pumps the OS messages
//! (`WM_HOTKEY` on Windows) that global hotkeys depend on. Presses are
//! delivered on `GlobalHotKeyEvent::receiver()` and routed through the
//! shared [`HandlerTable`] by [`crate::HotkeyHandler`].

use crate::{AppError, AppResult};

use std::{
    collections::HashMap,
    panic::Location,
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use error_location::ErrorLocation;
use flicker_core::{
    Combination, CoreError, CoreResult, Modifier, ShortcutHandler, ShortcutRegistry,
};
use global_hotkey::{GlobalHotKeyManager, hotkey::HotKey};
use tracing::{debug, instrument};

/// Handlers keyed by `global-hotkey` id, shared with the event forwarder.
#[derive(Clone, Default)]
pub struct HandlerTable {
    inner: Arc<Mutex<HashMap<u32, ShortcutHandler>>>,
}

impl HandlerTable {
    /// Handler bound to `id`, if any.
    pub fn get(&self, id: u32) -> Option<ShortcutHandler> {
        self.lock().get(&id).cloned()
    }

    pub(crate) fn insert(&self, id: u32, handler: ShortcutHandler) {
        self.lock().insert(id, handler);
    }

    pub(crate) fn remove(&self, id: u32) {
        self.lock().remove(&id);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u32, ShortcutHandler>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// OS-level global shortcut registrations.
pub struct NativeShortcutRegistry {
    manager: GlobalHotKeyManager,
    handlers: HandlerTable,
    registered: HashMap<Combination, HotKey>,
}

impl NativeShortcutRegistry {
    /// Create the platform hotkey manager.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            manager,
            handlers: HandlerTable::default(),
            registered: HashMap::new(),
        })
    }

    /// Table the event forwarder resolves presses against.
    pub fn handlers(&self) -> HandlerTable {
        self.handlers.clone()
    }
}

impl ShortcutRegistry for NativeShortcutRegistry {
    fn register(&mut self, combination: &Combination, handler: ShortcutHandler) -> CoreResult<()> {
        let hotkey = hotkey_for(combination)?;

        self.manager
            .register(hotkey)
            .map_err(|e| CoreError::RegistrationFailed {
                combination: combination.to_string(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.handlers.insert(hotkey.id(), handler);
        self.registered.insert(combination.clone(), hotkey);
        debug!(combination = %combination, hotkey_id = hotkey.id(), "Native hotkey bound");

        Ok(())
    }

    fn unregister(&mut self, combination: &Combination) -> CoreResult<()> {
        let Some(hotkey) = self.registered.get(combination).copied() else {
            return Ok(());
        };

        self.manager
            .unregister(hotkey)
            .map_err(|e| CoreError::UnregistrationFailed {
                combination: combination.to_string(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.handlers.remove(hotkey.id());
        self.registered.remove(combination);
        debug!(combination = %combination, hotkey_id = hotkey.id(), "Native hotkey released");

        Ok(())
    }

    fn is_registered(&self, combination: &Combination) -> bool {
        self.registered.contains_key(combination)
    }
}

/// Translate a canonical combination into a `global-hotkey` chord.
///
/// # Errors
///
/// Returns [`CoreError::RegistrationFailed`] when the backend has no code for
/// the key.
#[track_caller]
pub(crate) fn hotkey_for(combination: &Combination) -> CoreResult<HotKey> {
    let mut parts: Vec<String> = combination
        .modifiers()
        .iter()
        .map(|m| {
            match m {
                Modifier::Control => "control",
                Modifier::Shift => "shift",
                Modifier::Alt => "alt",
                Modifier::Super => "super",
            }
            .to_string()
        })
        .collect();
    parts.push(code_name(combination.key()));

    HotKey::from_str(&parts.join("+")).map_err(|e| CoreError::RegistrationFailed {
        combination: combination.to_string(),
        reason: format!("Unsupported key: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// W3C `code` name for a canonical key.
fn code_name(key: &str) -> String {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return format!("Key{}", c);
        }
        if c.is_ascii_digit() {
            return format!("Digit{}", c);
        }
    }

    if let Some(n) = key.strip_prefix("Num") {
        return format!("Numpad{}", n);
    }

    match key {
        "Return" => "Enter",
        "Up" => "ArrowUp",
        "Down" => "ArrowDown",
        "Left" => "ArrowLeft",
        "Right" => "ArrowRight",
        other => other,
    }
    .to_string()
}
