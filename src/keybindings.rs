//! Customizable keybindings.
//!
//! Keys are identified by DOM-style physical key code names (`Numpad1`,
//! `NumpadAdd`, `Escape`, ...), which is also how they are written to the
//! configuration file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::Mode;

/// Physical keys the editor can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadAdd,
    NumpadSubtract,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Plus,
    Minus,
    Escape,
    Enter,
    Space,
    Delete,
    /// Letter keys, stored upper case
    Letter(char),
}

impl KeyCode {
    /// Parse a key code name. Accepts DOM code names (`KeyF`, `Numpad1`),
    /// bare letters and the `+`/`-` characters.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "Numpad0" => KeyCode::Numpad0,
            "Numpad1" => KeyCode::Numpad1,
            "Numpad2" => KeyCode::Numpad2,
            "Numpad3" => KeyCode::Numpad3,
            "Numpad4" => KeyCode::Numpad4,
            "Numpad5" => KeyCode::Numpad5,
            "Numpad6" => KeyCode::Numpad6,
            "Numpad7" => KeyCode::Numpad7,
            "Numpad8" => KeyCode::Numpad8,
            "Numpad9" => KeyCode::Numpad9,
            "NumpadAdd" => KeyCode::NumpadAdd,
            "NumpadSubtract" => KeyCode::NumpadSubtract,
            "Digit0" | "0" => KeyCode::Digit0,
            "Digit1" | "1" => KeyCode::Digit1,
            "Digit2" | "2" => KeyCode::Digit2,
            "Digit3" | "3" => KeyCode::Digit3,
            "Plus" | "+" => KeyCode::Plus,
            "Minus" | "-" => KeyCode::Minus,
            "Escape" | "Esc" => KeyCode::Escape,
            "Enter" => KeyCode::Enter,
            "Space" => KeyCode::Space,
            "Delete" => KeyCode::Delete,
            _ => {
                let letter = name.strip_prefix("Key").unwrap_or(name);
                let mut chars = letter.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => {
                        KeyCode::Letter(c.to_ascii_uppercase())
                    }
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Display and serialization name.
    pub fn name(&self) -> String {
        match self {
            KeyCode::Letter(c) => format!("Key{}", c),
            other => format!("{:?}", other),
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for KeyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyCode::from_name(s).ok_or_else(|| format!("unknown key code '{}'", s))
    }
}

impl Serialize for KeyCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for KeyCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Request a mode (re-pressing toggles its view granularity)
    Mode(Mode),
    ZoomIn,
    ZoomOut,
    ClearSelection,
    FitToView,
}

/// Keybinding configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Hotkey for CAB mode
    pub mode_cab: KeyCode,
    /// Hotkey for RU mode
    pub mode_ru: KeyCode,
    /// Hotkey for INTEGRATE mode
    pub mode_integrate: KeyCode,
    /// Zoom in hotkeys
    pub zoom_in: Vec<KeyCode>,
    /// Zoom out hotkeys
    pub zoom_out: Vec<KeyCode>,
    /// Hotkey for clearing the selection
    pub clear_selection: KeyCode,
    /// Hotkey for re-fitting the scene to the container
    pub fit_to_view: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            mode_cab: KeyCode::Numpad1,
            mode_ru: KeyCode::Numpad2,
            mode_integrate: KeyCode::Numpad3,
            zoom_in: vec![KeyCode::NumpadAdd, KeyCode::Plus],
            zoom_out: vec![KeyCode::NumpadSubtract, KeyCode::Minus],
            clear_selection: KeyCode::Escape,
            fit_to_view: KeyCode::Numpad0,
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action that corresponds to a key press, if any.
    pub fn action_for_key(&self, key: KeyCode) -> Option<Action> {
        if key == self.mode_cab {
            Some(Action::Mode(Mode::Cab))
        } else if key == self.mode_ru {
            Some(Action::Mode(Mode::Ru))
        } else if key == self.mode_integrate {
            Some(Action::Mode(Mode::Integrate))
        } else if self.zoom_in.contains(&key) {
            Some(Action::ZoomIn)
        } else if self.zoom_out.contains(&key) {
            Some(Action::ZoomOut)
        } else if key == self.clear_selection {
            Some(Action::ClearSelection)
        } else if key == self.fit_to_view {
            Some(Action::FitToView)
        } else {
            None
        }
    }

    /// Get the hotkey for a mode.
    pub fn key_for_mode(&self, mode: Mode) -> KeyCode {
        match mode {
            Mode::Cab => self.mode_cab,
            Mode::Ru => self.mode_ru,
            Mode::Integrate => self.mode_integrate,
        }
    }

    /// Set the hotkey for a mode.
    pub fn set_mode_key(&mut self, mode: Mode, key: KeyCode) {
        match mode {
            Mode::Cab => self.mode_cab = key,
            Mode::Ru => self.mode_ru = key,
            Mode::Integrate => self.mode_integrate = key,
        }
    }

    /// Check if a key is already used by any binding.
    /// Returns a description of what it's used for, if anything.
    pub fn key_conflict(&self, key: KeyCode, exclude_mode: Option<Mode>) -> Option<String> {
        for mode in [Mode::Cab, Mode::Ru, Mode::Integrate] {
            if exclude_mode != Some(mode) && key == self.key_for_mode(mode) {
                return Some(format!("{} mode", mode.name()));
            }
        }
        match self.action_for_key(key) {
            Some(Action::ZoomIn) => Some("Zoom in".to_string()),
            Some(Action::ZoomOut) => Some("Zoom out".to_string()),
            Some(Action::ClearSelection) => Some("Clear selection".to_string()),
            Some(Action::FitToView) => Some("Fit to view".to_string()),
            Some(Action::Mode(_)) | None => None,
        }
    }
}
