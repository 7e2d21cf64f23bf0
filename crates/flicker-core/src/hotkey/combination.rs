//! Canonical key-chord strings such as `Control+Shift+S`.

use crate::{CoreError, CoreResult};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// A chord modifier. Declaration order is the canonical rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    /// Ctrl.
    Control,
    /// Shift.
    Shift,
    /// Alt / Option.
    Alt,
    /// Windows / Command key.
    Super,
}

impl Modifier {
    /// All modifiers in canonical order.
    pub const ALL: [Modifier; 4] = [
        Modifier::Control,
        Modifier::Shift,
        Modifier::Alt,
        Modifier::Super,
    ];

    /// Canonical name used in combination strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Control => "Control",
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
            Modifier::Super => "Super",
        }
    }

    fn from_alias(part: &str) -> Option<Self> {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Control),
            "shift" => Some(Modifier::Shift),
            "alt" | "option" => Some(Modifier::Alt),
            "super" | "meta" | "cmd" | "command" | "win" => Some(Modifier::Super),
            _ => None,
        }
    }
}

/// Named keys accepted as the final part of a combination, with their aliases.
const NAMED_KEYS: &[(&str, &[&str])] = &[
    ("PrintScreen", &["printscreen", "prtsc", "print"]),
    ("Escape", &["escape", "esc"]),
    ("Return", &["return", "enter"]),
    ("Backspace", &["backspace"]),
    ("Tab", &["tab"]),
    ("Space", &["space", "spacebar"]),
    ("Up", &["up", "arrowup"]),
    ("Down", &["down", "arrowdown"]),
    ("Left", &["left", "arrowleft"]),
    ("Right", &["right", "arrowright"]),
    ("Delete", &["delete", "del"]),
    ("Insert", &["insert", "ins"]),
    ("Home", &["home"]),
    ("End", &["end"]),
    ("PageUp", &["pageup", "pgup"]),
    ("PageDown", &["pagedown", "pgdn"]),
    ("Semicolon", &["semicolon", ";"]),
    ("Equal", &["equal", "="]),
    ("Comma", &["comma", ","]),
    ("Minus", &["minus", "-"]),
    ("Period", &["period", "."]),
    ("Slash", &["slash", "/"]),
    ("Backquote", &["backquote", "`"]),
    ("BracketLeft", &["bracketleft", "["]),
    ("Backslash", &["backslash", "\\"]),
    ("BracketRight", &["bracketright", "]"]),
    ("Quote", &["quote", "'"]),
];

/// A validated key chord.
///
/// Equality and ordering are on the canonical form, so `ctrl+shift+s` and
/// `Shift+Control+S` are the same combination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Combination {
    /// Sorted, deduplicated.
    modifiers: Vec<Modifier>,
    key: String,
}

impl Combination {
    /// Parse a combination string into canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCombination`] for empty input, unknown
    /// keys, more than one non-modifier key, or a chord without modifiers
    /// (function keys and `PrintScreen` may stand alone).
    #[track_caller]
    pub fn parse(input: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidCombination {
            input: input.to_string(),
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        };

        if input.trim().is_empty() {
            return Err(invalid("combination is empty"));
        }

        let mut modifiers = Vec::new();
        let mut key: Option<String> = None;

        for raw in input.split('+') {
            let part = raw.trim();
            if part.is_empty() {
                return Err(invalid("empty key between '+' separators"));
            }

            if let Some(modifier) = Modifier::from_alias(part) {
                if !modifiers.contains(&modifier) {
                    modifiers.push(modifier);
                }
                continue;
            }

            if key.is_some() {
                return Err(invalid("only one non-modifier key is allowed"));
            }
            key = Some(normalize_key(part).ok_or_else(|| invalid("unknown key"))?);
        }

        let key = key.ok_or_else(|| invalid("missing a non-modifier key"))?;

        if modifiers.is_empty() && !may_stand_alone(&key) {
            return Err(invalid("at least one modifier is required"));
        }

        modifiers.sort();

        Ok(Self { modifiers, key })
    }

    /// Modifiers in canonical order.
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// The canonical non-modifier key name (e.g. `S`, `F5`, `PrintScreen`).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether `modifier` is part of the chord.
    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// The same chord with one extra modifier, offered when registration fails.
    ///
    /// Adds the first missing modifier out of Alt, Shift, Control. A chord
    /// that already holds all three gets its key swapped for `F12` instead.
    pub fn suggest_alternative(&self) -> Combination {
        for extra in [Modifier::Alt, Modifier::Shift, Modifier::Control] {
            if !self.has(extra) {
                let mut modifiers = self.modifiers.clone();
                modifiers.push(extra);
                modifiers.sort();
                return Combination {
                    modifiers,
                    key: self.key.clone(),
                };
            }
        }

        Combination {
            modifiers: self.modifiers.clone(),
            key: if self.key == "F12" { "F11" } else { "F12" }.to_string(),
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for Combination {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        Combination::parse(s)
    }
}

fn normalize_key(part: &str) -> Option<String> {
    let lower = part.to_ascii_lowercase();

    // `S`, `7`, `KeyS`, `Digit7`
    let single = match lower.as_str() {
        l if l.len() == 1 => Some(l),
        l if l.len() == 4 && l.starts_with("key") => Some(&l[3..]),
        l if l.len() == 6 && l.starts_with("digit") => Some(&l[5..]),
        _ => None,
    };
    if let Some(ch) = single.and_then(|s| s.chars().next()) {
        if ch.is_ascii_alphanumeric() {
            return Some(ch.to_ascii_uppercase().to_string());
        }
    }

    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=24).contains(&n) {
            return Some(format!("F{}", n));
        }
    }

    if let Some(n) = lower
        .strip_prefix("numpad")
        .or_else(|| lower.strip_prefix("num"))
        .and_then(|n| n.parse::<u8>().ok())
    {
        if n <= 9 {
            return Some(format!("Num{}", n));
        }
    }

    NAMED_KEYS
        .iter()
        .find(|(_, aliases)| aliases.contains(&lower.as_str()))
        .map(|(name, _)| (*name).to_string())
}

fn may_stand_alone(key: &str) -> bool {
    key == "PrintScreen" || (key.starts_with('F') && key[1..].parse::<u8>().is_ok())
}
