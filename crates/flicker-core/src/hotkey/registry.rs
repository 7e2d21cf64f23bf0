use crate::{CoreResult, hotkey::Combination};

use std::sync::Arc;

/// Key transition delivered with a shortcut event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutState {
    /// The chord went down.
    Pressed,
    /// The chord was released.
    Released,
}

/// Callback bound to a registered chord. Invoked from the event-delivery
/// thread, so it must not block.
pub type ShortcutHandler = Arc<dyn Fn(ShortcutState) + Send + Sync>;

/// OS-level global shortcut registration.
///
/// Implementations may be tied to the thread that pumps OS messages, so the
/// trait does not require `Send`. The handlers they store do.
pub trait ShortcutRegistry {
    /// Bind `handler` to `combination` system-wide.
    ///
    /// # Errors
    ///
    /// Fails when the chord is reserved by the OS or another application,
    /// or cannot be expressed by the backend.
    fn register(&mut self, combination: &Combination, handler: ShortcutHandler)
    -> CoreResult<()>;

    /// Release a binding made by [`ShortcutRegistry::register`].
    ///
    /// # Errors
    ///
    /// Fails when the backend refuses; callers treat this as non-fatal.
    fn unregister(&mut self, combination: &Combination) -> CoreResult<()>;

    /// Whether `combination` is currently bound through this registry.
    fn is_registered(&self, combination: &Combination) -> bool;
}
