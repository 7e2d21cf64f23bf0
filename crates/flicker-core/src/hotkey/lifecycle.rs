//! Keeps OS-level shortcut registrations in step with the configured hotkeys.
//!
//! Every reconciliation releases everything this manager registered, then
//! registers the enabled bindings again. Reconciliations are serialised by
//! `&mut self`, and a reconciliation whose effective bindings equal the last
//! applied ones is a no-op, so an unchanged configuration never drops a
//! working binding.

use crate::{
    CoreError,
    hotkey::{
        Combination, HotkeyAction, HotkeyBindings, ShortcutHandler, ShortcutRegistry,
        ShortcutState,
    },
};

use std::{collections::BTreeMap, fmt, sync::Arc};

use tracing::{debug, error, info, instrument, warn};

/// Invoked with the bound action whenever a registered chord is pressed.
pub type ActionDispatch = Arc<dyn Fn(HotkeyAction) + Send + Sync>;

/// Registration state of a single chord.
///
/// `Unregistered → Registering → Registered → Unregistering → Unregistered`.
/// A failed registration goes straight back to `Unregistered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Not bound by this manager.
    Unregistered,
    /// Registration request in progress.
    Registering,
    /// Bound and delivering presses.
    Registered,
    /// Release request in progress.
    Unregistering,
}

/// What the lifecycle manager should make true.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DesiredHotkeys {
    /// Configured chords per action.
    pub bindings: HotkeyBindings,
    /// False while no upload credential is configured. Nothing is bound then.
    pub enabled: bool,
}

impl DesiredHotkeys {
    /// Bundle bindings with the enabled flag.
    pub fn new(bindings: HotkeyBindings, enabled: bool) -> Self {
        Self { bindings, enabled }
    }

    /// Effective bindings, compared semantically between reconciliations.
    fn plan(&self) -> Vec<(HotkeyAction, String)> {
        if !self.enabled {
            return Vec::new();
        }
        self.bindings
            .active()
            .map(|(action, raw)| {
                let key = Combination::parse(raw)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|_| raw.to_string());
                (action, key)
            })
            .collect()
    }
}

/// A chord that could not be bound. Other actions are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationFailure {
    /// The action whose chord failed.
    pub action: HotkeyAction,
    /// The chord, canonical when it parsed, otherwise as configured.
    pub combination: String,
    /// A nearby chord worth trying instead, when one can be derived.
    pub suggestion: Option<String>,
    /// Backend or parser explanation.
    pub reason: String,
}

impl RegistrationFailure {
    fn rejected(action: HotkeyAction, combination: &Combination, error: &CoreError) -> Self {
        Self {
            action,
            combination: combination.to_string(),
            suggestion: Some(combination.suggest_alternative().to_string()),
            reason: error.user_message(),
        }
    }

    fn invalid(action: HotkeyAction, raw: &str, error: &CoreError) -> Self {
        Self {
            action,
            combination: raw.to_string(),
            suggestion: None,
            reason: error.user_message(),
        }
    }

    /// User-facing description naming the failed chord.
    pub fn message(&self) -> String {
        match &self.suggestion {
            Some(suggestion) => format!(
                "Could not register {} for {}. It may be reserved by the system or another \
                 application. Try a different combination, such as {}.",
                self.combination,
                self.action.label(),
                suggestion
            ),
            None => format!(
                "{} is not a usable combination for {} ({}). Choose a different one in Settings.",
                self.combination,
                self.action.label(),
                self.reason
            ),
        }
    }
}

impl fmt::Display for RegistrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Result of one reconciliation.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// True when the desired state matched the last applied one and nothing ran.
    pub unchanged: bool,
    /// Chords newly bound by this reconciliation.
    pub registered: Vec<Combination>,
    /// Chords left alone because something already held them.
    pub skipped: Vec<Combination>,
    /// Chords that failed to bind.
    pub failures: Vec<RegistrationFailure>,
}

#[derive(Debug, Clone, Copy)]
struct TrackedBinding {
    action: HotkeyAction,
    state: BindingState,
}

/// Owner of every global shortcut this process registers.
pub struct HotkeyLifecycleManager<R: ShortcutRegistry> {
    registry: R,
    dispatch: ActionDispatch,
    bindings: BTreeMap<Combination, TrackedBinding>,
    applied: Option<Vec<(HotkeyAction, String)>>,
}

impl<R: ShortcutRegistry> HotkeyLifecycleManager<R> {
    /// Create a manager with nothing registered yet.
    pub fn new(registry: R, dispatch: ActionDispatch) -> Self {
        Self {
            registry,
            dispatch,
            bindings: BTreeMap::new(),
            applied: None,
        }
    }

    /// Bring registrations in line with `desired`.
    ///
    /// Individual unregister and register failures are contained: they are
    /// logged or reported in the returned [`ReconcileReport`], and the
    /// remaining actions are still processed.
    #[instrument(skip(self, desired), fields(enabled = desired.enabled))]
    pub fn reconcile(&mut self, desired: &DesiredHotkeys) -> ReconcileReport {
        let plan = desired.plan();

        if self.applied.as_ref() == Some(&plan) {
            debug!("Hotkey configuration unchanged, keeping registrations");
            return ReconcileReport {
                unchanged: true,
                ..ReconcileReport::default()
            };
        }

        self.release_all();
        self.applied = Some(plan);

        let mut report = ReconcileReport::default();

        if !desired.enabled {
            info!("Hotkeys disabled until an upload token is configured");
            return report;
        }

        for (action, raw) in desired.bindings.active() {
            let combination = match Combination::parse(raw) {
                Ok(combination) => combination,
                Err(e) => {
                    error!(action = ?action, combination = raw, error = ?e, "Invalid hotkey");
                    report
                        .failures
                        .push(RegistrationFailure::invalid(action, raw, &e));
                    continue;
                }
            };

            if self.registry.is_registered(&combination) {
                warn!(
                    action = ?action,
                    combination = %combination,
                    "Hotkey already registered elsewhere, skipping"
                );
                report.skipped.push(combination);
                continue;
            }

            self.set_state(&combination, action, BindingState::Registering);

            let handler = self.handler_for(action);
            match self.registry.register(&combination, handler) {
                Ok(()) => {
                    self.set_state(&combination, action, BindingState::Registered);
                    info!(action = ?action, combination = %combination, "Registered hotkey");
                    report.registered.push(combination);
                }
                Err(e) => {
                    self.bindings.remove(&combination);
                    error!(
                        action = ?action,
                        combination = %combination,
                        error = ?e,
                        "Failed to register hotkey"
                    );
                    report
                        .failures
                        .push(RegistrationFailure::rejected(action, &combination, &e));
                }
            }
        }

        report
    }

    /// Release every registration. Errors are logged and swallowed.
    #[instrument(skip(self))]
    pub fn teardown(&mut self) {
        self.release_all();
        self.applied = None;
        debug!("Hotkey lifecycle torn down");
    }

    /// Chords currently bound by this manager.
    pub fn registered(&self) -> Vec<Combination> {
        self.bindings
            .iter()
            .filter(|(_, b)| b.state == BindingState::Registered)
            .map(|(c, _)| c.clone())
            .collect()
    }

    /// The action bound to `combination`, if registered.
    pub fn action_for(&self, combination: &Combination) -> Option<HotkeyAction> {
        self.bindings
            .get(combination)
            .filter(|b| b.state == BindingState::Registered)
            .map(|b| b.action)
    }

    /// Current state of `combination` as tracked by this manager.
    pub fn binding_state(&self, combination: &Combination) -> BindingState {
        self.bindings
            .get(combination)
            .map_or(BindingState::Unregistered, |b| b.state)
    }

    /// The underlying registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn handler_for(&self, action: HotkeyAction) -> ShortcutHandler {
        let dispatch = Arc::clone(&self.dispatch);
        Arc::new(move |state| {
            if state == ShortcutState::Pressed {
                debug!(action = ?action, "Hotkey pressed");
                dispatch(action);
            }
        })
    }

    fn set_state(&mut self, combination: &Combination, action: HotkeyAction, state: BindingState) {
        let previous = self.binding_state(combination);
        debug!(combination = %combination, from = ?previous, to = ?state, "Hotkey state");
        self.bindings
            .insert(combination.clone(), TrackedBinding { action, state });
    }

    fn release_all(&mut self) {
        let tracked: Vec<(Combination, HotkeyAction)> = self
            .bindings
            .iter()
            .map(|(c, b)| (c.clone(), b.action))
            .collect();

        for (combination, action) in tracked {
            self.set_state(&combination, action, BindingState::Unregistering);

            if self.registry.is_registered(&combination) {
                match self.registry.unregister(&combination) {
                    Ok(()) => info!(combination = %combination, "Unregistered hotkey"),
                    Err(e) => error!(
                        combination = %combination,
                        error = ?e,
                        "Failed to unregister hotkey"
                    ),
                }
            }

            self.bindings.remove(&combination);
        }
    }
}

impl<R: ShortcutRegistry> Drop for HotkeyLifecycleManager<R> {
    fn drop(&mut self) {
        if !self.bindings.is_empty() {
            self.release_all();
        }
    }
}
