mod action;
mod combination;
mod lifecycle;
mod registry;

pub use {
    action::{
        DEFAULT_ALL_MONITORS_HOTKEY, DEFAULT_FULLSCREEN_HOTKEY, HotkeyAction, HotkeyBindings,
    },
    combination::{Combination, Modifier},
    lifecycle::{
        ActionDispatch, BindingState, DesiredHotkeys, HotkeyLifecycleManager, ReconcileReport,
        RegistrationFailure,
    },
    registry::{ShortcutHandler, ShortcutRegistry, ShortcutState},
};
