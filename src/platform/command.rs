//! Commands accepted by the native overlay module.
//!
//! Serialised as a flat JSON object tagged by `command`, which is the shape
//! the native bridge parses. Every command replaces the native value it
//! targets; none of them is additive.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::remap::InterceptMode;

/// Lower and upper bounds for the native mouse speed multiplier.
pub const MOUSE_SPEED_MIN: f32 = 0.1;
pub const MOUSE_SPEED_MAX: f32 = 5.0;

/// Corner of the game frame where the FPS counter is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpsPosition {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Boolean mouse behaviours toggled through `mouse.option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseOption {
    SwapButtons,
    Numpad5Primary,
    NumpadPlusSecondary,
    YAxisInvert,
}

/// One entry of the native hotkey table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyInfo {
    pub name: String,
    pub key_code: u32,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub passthrough: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all_fields = "camelCase")]
pub enum Command {
    #[serde(rename = "cursor")]
    Cursor { cursor: String },

    #[serde(rename = "fps")]
    Fps { showfps: bool, position: FpsPosition },

    #[serde(rename = "input.intercept")]
    InputIntercept { intercept: bool },

    /// Full replacement of the source-key → target-key table.
    #[serde(rename = "keyboard.remap")]
    KeyboardRemap { mappings: BTreeMap<u32, u32> },

    #[serde(rename = "keyboard.block")]
    KeyboardBlock { blocked_keys: BTreeSet<u32> },

    #[serde(rename = "keyboard.pass")]
    KeyboardPass { passed_keys: BTreeSet<u32> },

    #[serde(rename = "keyboard.mode")]
    KeyboardMode { mode: InterceptMode },

    /// Synthetic key transition delivered to the game.
    #[serde(rename = "keyboard.inject")]
    KeyboardInject {
        key_code: u32,
        modifiers: u32,
        is_down: bool,
    },

    #[serde(rename = "hotkey.info")]
    HotkeyInfo { hotkeys: Vec<HotkeyInfo> },

    /// Key the native layer taps to open the game's own menu before showing
    /// the overlay.
    #[serde(rename = "ingamemenu.key")]
    InGameMenuKey { key_code: u32 },

    #[serde(rename = "mouse.option")]
    MouseOption { option: MouseOption, enabled: bool },

    #[serde(rename = "mouse.speed")]
    MouseSpeed { speed: f32 },
}

impl Command {
    /// Builds a `mouse.speed` command with the multiplier clamped to
    /// [`MOUSE_SPEED_MIN`, `MOUSE_SPEED_MAX`]. Non-finite input falls back to 1.0.
    pub fn mouse_speed(speed: f32) -> Self {
        Command::MouseSpeed {
            speed: clamp_mouse_speed(speed),
        }
    }

    /// The wire tag, for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            Command::Cursor { .. } => "cursor",
            Command::Fps { .. } => "fps",
            Command::InputIntercept { .. } => "input.intercept",
            Command::KeyboardRemap { .. } => "keyboard.remap",
            Command::KeyboardBlock { .. } => "keyboard.block",
            Command::KeyboardPass { .. } => "keyboard.pass",
            Command::KeyboardMode { .. } => "keyboard.mode",
            Command::KeyboardInject { .. } => "keyboard.inject",
            Command::HotkeyInfo { .. } => "hotkey.info",
            Command::InGameMenuKey { .. } => "ingamemenu.key",
            Command::MouseOption { .. } => "mouse.option",
            Command::MouseSpeed { .. } => "mouse.speed",
        }
    }
}

pub fn clamp_mouse_speed(speed: f32) -> f32 {
    if !speed.is_finite() {
        return 1.0;
    }
    speed.clamp(MOUSE_SPEED_MIN, MOUSE_SPEED_MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
