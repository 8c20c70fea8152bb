//! Mouse behaviour settings.
//!
//! `MouseSettings` has no identity beyond its current value: each apply
//! replaces it wholesale and pushes one command per option plus the speed.

use serde::{Deserialize, Serialize};

use crate::platform::command::clamp_mouse_speed;
use crate::platform::{Command, MouseOption, NativeOverlay};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MouseSettings {
    pub swap_buttons: bool,
    pub numpad5_primary: bool,
    pub numpad_plus_secondary: bool,
    pub y_axis_invert: bool,
    /// Movement multiplier, clamped to [0.1, 5.0] when sent.
    pub moving_speed: f32,
}

impl Default for MouseSettings {
    fn default() -> Self {
        Self {
            swap_buttons: false,
            numpad5_primary: false,
            numpad_plus_secondary: false,
            y_axis_invert: false,
            moving_speed: 1.0,
        }
    }
}

impl MouseSettings {
    /// The commands that reproduce these settings natively, speed last.
    pub fn commands(&self) -> Vec<Command> {
        let options = [
            (MouseOption::SwapButtons, self.swap_buttons),
            (MouseOption::Numpad5Primary, self.numpad5_primary),
            (MouseOption::NumpadPlusSecondary, self.numpad_plus_secondary),
            (MouseOption::YAxisInvert, self.y_axis_invert),
        ];
        options
            .into_iter()
            .map(|(option, enabled)| Command::MouseOption { option, enabled })
            .chain(std::iter::once(Command::mouse_speed(self.moving_speed)))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MouseController {
    current: MouseSettings,
}

impl MouseController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &MouseSettings {
        &self.current
    }

    /// Replaces the settings and pushes them. The stored speed is the clamped
    /// value. Individual command failures are logged; the rest still go out.
    pub fn apply(&mut self, native: &dyn NativeOverlay, settings: MouseSettings) {
        self.current = MouseSettings {
            moving_speed: clamp_mouse_speed(settings.moving_speed),
            ..settings
        };
        for command in self.current.commands() {
            if let Err(e) = native.send_command(&command) {
                log::warn!("mouse: {} push failed: {e}", command.tag());
            }
        }
        log::info!("mouse: settings applied (speed {})", self.current.moving_speed);
    }
}
