//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the existing RON watcher utilities (see `ron::setup_ron_watcher`).
use bevy::log::info;
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::control::ControlMode;

/// Behaviour switches for the placement resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSettings {
    #[serde(default)]
    pub control_mode: ControlMode, // Which keys/mouse drive the placement side.
    #[serde(default = "PlacementSettings::default_auto_repeat")]
    pub auto_repeat: bool, // After placing, continue in a line from the new block.
    #[serde(default)]
    pub auto_off: bool, // Turn placement off when the selection changes or after a single placement.
    #[serde(default)]
    pub auto_end: bool, // Turn placement off instead of resetting when nothing else fits.
    #[serde(default = "PlacementSettings::default_reset_sound")]
    pub reset_sound: bool, // Raise a reset cue when placement resets.
    #[serde(default = "PlacementSettings::default_smart_start")]
    pub smart_start: bool, // Pick a likely starting side instead of the side looked at.
    #[serde(default = "PlacementSettings::default_detect_devices")]
    pub detect_devices: bool, // Don't target blocks that react to right click (doors, buttons).
    #[serde(default = "PlacementSettings::default_draw_facing_text")]
    pub draw_facing_text: bool, // Show the relative direction label next to the crosshair.
    #[serde(default = "PlacementSettings::default_mouse_wobble")]
    pub mouse_wobble: i32, // Mouse movement per axis still treated as zero.
    #[serde(default = "PlacementSettings::default_mouse_threshold")]
    pub mouse_threshold: i32, // Minimum |dx|+|dy| before the mouse changes side.
    #[serde(default = "PlacementSettings::default_pitch_angle")]
    pub pitch_angle: f32, // Degrees of pitch beyond which the player counts as looking up/down.
}

impl PlacementSettings {
    pub const MOUSE_WOBBLE_RANGE: (i32, i32) = (0, 10);
    pub const MOUSE_THRESHOLD_RANGE: (i32, i32) = (0, 15);

    fn default_auto_repeat() -> bool { true }
    fn default_reset_sound() -> bool { true }
    fn default_smart_start() -> bool { true }
    fn default_detect_devices() -> bool { true }
    fn default_draw_facing_text() -> bool { true }
    fn default_mouse_wobble() -> i32 { 1 }
    fn default_mouse_threshold() -> i32 { 4 }
    fn default_pitch_angle() -> f32 { 30.0 }
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::default(),
            auto_repeat: Self::default_auto_repeat(),
            auto_off: false,
            auto_end: false,
            reset_sound: Self::default_reset_sound(),
            smart_start: Self::default_smart_start(),
            detect_devices: Self::default_detect_devices(),
            draw_facing_text: Self::default_draw_facing_text(),
            mouse_wobble: Self::default_mouse_wobble(),
            mouse_threshold: Self::default_mouse_threshold(),
            pitch_angle: Self::default_pitch_angle(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("rotate_up".to_string(), "Up".to_string());
        m.insert("rotate_down".to_string(), "Down".to_string());
        m.insert("rotate_left".to_string(), "Left".to_string());
        m.insert("rotate_right".to_string(), "Right".to_string());
        m.insert("toggle_3d".to_string(), "PageUp".to_string());
        m.insert("next".to_string(), "F".to_string());
        m.insert("previous".to_string(), "G".to_string());
        m.insert("toggle".to_string(), "R".to_string());
        m.insert("sneak".to_string(), "LShift".to_string());
        m
    }

    /// Key bound to `action`, falling back to the default binding when the
    /// user's map lacks it or names an unknown key.
    #[must_use]
    pub fn key_for(&self, action: &str) -> Option<KeyCode> {
        self.keybinds
            .get(action)
            .and_then(|name| Settings::keycode_from_str(name))
            .or_else(|| {
                Self::default_keybinds()
                    .get(action)
                    .and_then(|name| Settings::keycode_from_str(name))
            })
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Log output configuration, applied when the log plugin is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "LogSettings::default_level")]
    pub level: String, // One of error, warn, info, debug, trace.
    #[serde(default = "LogSettings::default_filter")]
    pub filter: String, // Extra tracing filter directives, e.g. "blockplacer=debug".
}

impl LogSettings {
    fn default_level() -> String { "info".to_string() }
    fn default_filter() -> String { "notify=warn".to_string() }

    /// Parsed `level`, `INFO` when unrecognised.
    #[must_use]
    pub fn tracing_level(&self) -> bevy::log::Level {
        match self.level.to_ascii_lowercase().as_str() {
            "error" => bevy::log::Level::ERROR,
            "warn" | "warning" => bevy::log::Level::WARN,
            "debug" => bevy::log::Level::DEBUG,
            "trace" => bevy::log::Level::TRACE,
            _ => bevy::log::Level::INFO,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            filter: Self::default_filter(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub placement: PlacementSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub log: LogSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Clamp ranges and apply mode constraints. Modes without a toggle key
    /// cannot turn placement off by hand, so they always run with auto-off.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let p = &mut self.placement;
        let (lo, hi) = PlacementSettings::MOUSE_WOBBLE_RANGE;
        p.mouse_wobble = p.mouse_wobble.clamp(lo, hi);
        let (lo, hi) = PlacementSettings::MOUSE_THRESHOLD_RANGE;
        p.mouse_threshold = p.mouse_threshold.clamp(lo, hi);
        if !p.pitch_angle.is_finite() {
            p.pitch_angle = PlacementSettings::default_pitch_angle();
        }
        p.pitch_angle = p.pitch_angle.clamp(0.0, 90.0);

        if p.control_mode.forces_auto_off() && !p.auto_off {
            info!("auto_off forced on for control mode {:?}", p.control_mode);
            p.auto_off = true;
        }
        self
    }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode` that
    /// can be used with Bevy's input system.
    ///
    /// # Arguments
    /// * `name` - The string key identifier to convert (e.g., "R", "PageUp", "F1").
    ///
    /// # Returns
    /// An `Option<KeyCode>` corresponding to the provided string, or `None` if the string
    /// does not match any known key.
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        let s = name.to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let code = match c {
                'A' => KeyCode::KeyA,
                'B' => KeyCode::KeyB,
                'C' => KeyCode::KeyC,
                'D' => KeyCode::KeyD,
                'E' => KeyCode::KeyE,
                'F' => KeyCode::KeyF,
                'G' => KeyCode::KeyG,
                'H' => KeyCode::KeyH,
                'I' => KeyCode::KeyI,
                'J' => KeyCode::KeyJ,
                'K' => KeyCode::KeyK,
                'L' => KeyCode::KeyL,
                'M' => KeyCode::KeyM,
                'N' => KeyCode::KeyN,
                'O' => KeyCode::KeyO,
                'P' => KeyCode::KeyP,
                'Q' => KeyCode::KeyQ,
                'R' => KeyCode::KeyR,
                'S' => KeyCode::KeyS,
                'T' => KeyCode::KeyT,
                'U' => KeyCode::KeyU,
                'V' => KeyCode::KeyV,
                'W' => KeyCode::KeyW,
                'X' => KeyCode::KeyX,
                'Y' => KeyCode::KeyY,
                'Z' => KeyCode::KeyZ,
                '0' => KeyCode::Digit0,
                '1' => KeyCode::Digit1,
                '2' => KeyCode::Digit2,
                '3' => KeyCode::Digit3,
                '4' => KeyCode::Digit4,
                '5' => KeyCode::Digit5,
                '6' => KeyCode::Digit6,
                '7' => KeyCode::Digit7,
                '8' => KeyCode::Digit8,
                '9' => KeyCode::Digit9,
                '-' => KeyCode::Minus,
                '=' => KeyCode::Equal,
                '[' => KeyCode::BracketLeft,
                ']' => KeyCode::BracketRight,
                ';' => KeyCode::Semicolon,
                ',' => KeyCode::Comma,
                '.' => KeyCode::Period,
                '/' => KeyCode::Slash,
                _ => return None,
            };
            return Some(code);
        }

        Some(match s.as_str() {
            // Function keys
            "F1" => KeyCode::F1,
            "F2" => KeyCode::F2,
            "F3" => KeyCode::F3,
            "F4" => KeyCode::F4,
            "F5" => KeyCode::F5,
            "F6" => KeyCode::F6,
            "F7" => KeyCode::F7,
            "F8" => KeyCode::F8,
            "F9" => KeyCode::F9,
            "F10" => KeyCode::F10,
            "F11" => KeyCode::F11,
            "F12" => KeyCode::F12,

            // Arrows / navigation
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "HOME" => KeyCode::Home,
            "END" => KeyCode::End,
            "PAGEUP" => KeyCode::PageUp,
            "PAGEDOWN" => KeyCode::PageDown,
            "INSERT" => KeyCode::Insert,
            "DELETE" | "DEL" => KeyCode::Delete,

            // Whitespace / control
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" | "BACK" => KeyCode::Backspace,

            // Modifiers
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,

            // Numpad
            "NUMPAD0" | "KP_0" => KeyCode::Numpad0,
            "NUMPAD1" | "KP_1" => KeyCode::Numpad1,
            "NUMPAD2" | "KP_2" => KeyCode::Numpad2,
            "NUMPAD3" | "KP_3" => KeyCode::Numpad3,
            "NUMPAD4" | "KP_4" => KeyCode::Numpad4,
            "NUMPAD5" | "KP_5" => KeyCode::Numpad5,
            "NUMPAD6" | "KP_6" => KeyCode::Numpad6,
            "NUMPAD7" | "KP_7" => KeyCode::Numpad7,
            "NUMPAD8" | "KP_8" => KeyCode::Numpad8,
            "NUMPAD9" | "KP_9" => KeyCode::Numpad9,

            _ => return None,
        })
    }
}

pub mod loader;
