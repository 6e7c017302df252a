//! Keyboard shortcut bindings.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Invalid key combination: {0:?}")]
    InvalidCombo(String),
    #[error("{combo} is already bound to {action}")]
    Conflict { combo: String, action: ShortcutAction },
}

/// Actions that can be bound to a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    Screenshot,
    Text,
    Code,
    Save,
    Open,
    Copy,
}

impl ShortcutAction {
    pub fn all() -> &'static [ShortcutAction] {
        &[
            ShortcutAction::Screenshot,
            ShortcutAction::Text,
            ShortcutAction::Code,
            ShortcutAction::Save,
            ShortcutAction::Open,
            ShortcutAction::Copy,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShortcutAction::Screenshot => "screenshot",
            ShortcutAction::Text => "text",
            ShortcutAction::Code => "code",
            ShortcutAction::Save => "save",
            ShortcutAction::Open => "open",
            ShortcutAction::Copy => "copy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShortcutAction::Screenshot => "Take screenshot",
            ShortcutAction::Text => "Add text box",
            ShortcutAction::Code => "Add code box",
            ShortcutAction::Save => "Save project",
            ShortcutAction::Open => "Open project",
            ShortcutAction::Copy => "Copy to clipboard",
        }
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShortcutAction {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShortcutError::UnknownAction(s.to_string()))
    }
}

/// A key with modifiers, written like `Ctrl+Shift+S`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyCombo {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
    /// Upper-case for single letters, as written otherwise.
    pub key: String,
}

impl KeyCombo {
    /// Parse a combination such as `Alt+S` or `ctrl+shift+k`.
    pub fn parse(s: &str) -> Result<Self, ShortcutError> {
        let invalid = || ShortcutError::InvalidCombo(s.to_string());
        let mut combo = KeyCombo {
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
            key: String::new(),
        };

        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, modifiers) = parts.split_last().ok_or_else(invalid)?;
        for modifier in modifiers {
            let flag = match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => &mut combo.ctrl,
                "shift" => &mut combo.shift,
                "alt" | "option" => &mut combo.alt,
                "meta" | "cmd" | "super" => &mut combo.meta,
                _ => return Err(invalid()),
            };
            if *flag {
                return Err(invalid());
            }
            *flag = true;
        }

        if key.is_empty() {
            return Err(invalid());
        }
        combo.key = if key.chars().count() == 1 {
            key.to_uppercase()
        } else {
            key.to_string()
        };
        Ok(combo)
    }

    /// Format the combination for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.meta {
            parts.push("Meta");
        }
        parts.push(self.key.as_str());
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl TryFrom<String> for KeyCombo {
    type Error = ShortcutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<KeyCombo> for String {
    fn from(combo: KeyCombo) -> Self {
        combo.format()
    }
}

/// Action to key-combination bindings.
///
/// Deserializing overlays the given bindings on the defaults, so a config
/// file only needs to name the actions it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShortcutMap {
    bindings: BTreeMap<ShortcutAction, KeyCombo>,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        let defaults = [
            (ShortcutAction::Screenshot, "Alt+S"),
            (ShortcutAction::Text, "Alt+T"),
            (ShortcutAction::Code, "Alt+K"),
            (ShortcutAction::Save, "Ctrl+S"),
            (ShortcutAction::Open, "Ctrl+O"),
            (ShortcutAction::Copy, "Ctrl+C"),
        ];
        let bindings = defaults
            .into_iter()
            .filter_map(|(action, combo)| KeyCombo::parse(combo).ok().map(|c| (action, c)))
            .collect();
        Self { bindings }
    }
}

impl<'de> Deserialize<'de> for ShortcutMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let overrides = BTreeMap::<ShortcutAction, KeyCombo>::deserialize(deserializer)?;
        let mut map = Self::default();
        map.bindings.extend(overrides);
        Ok(map)
    }
}

impl ShortcutMap {
    pub fn get(&self, action: ShortcutAction) -> Option<&KeyCombo> {
        self.bindings.get(&action)
    }

    /// The action a key press triggers, if any.
    pub fn action_for(&self, combo: &KeyCombo) -> Option<ShortcutAction> {
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == combo)
            .map(|(&action, _)| action)
    }

    /// Bind `action` to `combo`, replacing its previous binding.
    pub fn rebind(&mut self, action: ShortcutAction, combo: &str) -> Result<(), ShortcutError> {
        let combo = KeyCombo::parse(combo)?;
        if let Some(other) = self.action_for(&combo).filter(|&other| other != action) {
            return Err(ShortcutError::Conflict {
                combo: combo.format(),
                action: other,
            });
        }
        log::info!("Bound {} to {}", action, combo);
        self.bindings.insert(action, combo);
        Ok(())
    }

    /// Bindings in action order.
    pub fn iter(&self) -> impl Iterator<Item = (ShortcutAction, &KeyCombo)> {
        self.bindings.iter().map(|(&action, combo)| (action, combo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let map = ShortcutMap::default();
        assert_eq!(map.get(ShortcutAction::Screenshot).unwrap().format(), "Alt+S");
        assert_eq!(map.get(ShortcutAction::Code).unwrap().format(), "Alt+K");
        assert_eq!(map.get(ShortcutAction::Copy).unwrap().format(), "Ctrl+C");
        assert_eq!(map.iter().count(), ShortcutAction::all().len());
    }

    #[test]
    fn test_parse_normalizes() {
        let combo = KeyCombo::parse("shift + ctrl + s").unwrap();
        assert!(combo.ctrl && combo.shift && !combo.alt);
        assert_eq!(combo.format(), "Ctrl+Shift+S");
        assert_eq!(KeyCombo::parse("F5").unwrap().format(), "F5");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(KeyCombo::parse("").is_err());
        assert!(KeyCombo::parse("Ctrl+").is_err());
        assert!(KeyCombo::parse("Hyper+S").is_err());
        assert!(KeyCombo::parse("Ctrl+Ctrl+S").is_err());
    }

    #[test]
    fn test_action_for() {
        let map = ShortcutMap::default();
        let combo = KeyCombo::parse("alt+t").unwrap();
        assert_eq!(map.action_for(&combo), Some(ShortcutAction::Text));
        assert_eq!(map.action_for(&KeyCombo::parse("Ctrl+Q").unwrap()), None);
    }

    #[test]
    fn test_rebind() {
        let mut map = ShortcutMap::default();
        map.rebind(ShortcutAction::Screenshot, "Ctrl+Shift+S").unwrap();
        let combo = KeyCombo::parse("Ctrl+Shift+S").unwrap();
        assert_eq!(map.action_for(&combo), Some(ShortcutAction::Screenshot));
        assert_eq!(map.action_for(&KeyCombo::parse("Alt+S").unwrap()), None);
    }

    #[test]
    fn test_rebind_conflict() {
        let mut map = ShortcutMap::default();
        let err = map.rebind(ShortcutAction::Text, "Ctrl+S").unwrap_err();
        assert_eq!(
            err,
            ShortcutError::Conflict {
                combo: "Ctrl+S".to_string(),
                action: ShortcutAction::Save
            }
        );
        // Rebinding an action to its own combo is fine.
        map.rebind(ShortcutAction::Save, "ctrl+s").unwrap();
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("Copy".parse::<ShortcutAction>(), Ok(ShortcutAction::Copy));
        assert!("paste".parse::<ShortcutAction>().is_err());
    }

    #[test]
    fn test_json_shape() {
        let map = ShortcutMap::default();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["screenshot"], "Alt+S");
        let back: ShortcutMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let map: ShortcutMap = serde_json::from_str(r#"{ "copy": "Ctrl+Shift+C" }"#).unwrap();
        assert_eq!(map.get(ShortcutAction::Copy).unwrap().format(), "Ctrl+Shift+C");
        assert_eq!(map.get(ShortcutAction::Save).unwrap().format(), "Ctrl+S");
    }
}
