//! Live keyboard remapping configuration.
//!
//! `KeyboardRemapEngine` owns the process-wide `KeyRemapState` and mirrors it
//! into the native hook. Every mutation is followed by a full push of each
//! non-empty collection (remap table, blocked keys, passed keys), one command
//! per collection; the native side replaces its copy on each command. The
//! three commands are independent, so a failure of one does not stop the
//! others and the native view is whatever the last successful push of each
//! collection said.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::keycodes::{vk_from_name, VkCode};
use crate::platform::{Command, NativeOverlay};
use crate::settings::{KeyboardRow, RowMode};

/// How the native hook treats keyboard input before it reaches the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptMode {
    /// Observe only.
    #[default]
    Monitor,
    BlockOnly,
    BlockAndReplace,
    /// Remap/block the configured keys, pass everything else.
    SelectiveRemap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRemapState {
    pub mappings: BTreeMap<VkCode, VkCode>,
    pub blocked_keys: BTreeSet<VkCode>,
    pub passed_keys: BTreeSet<VkCode>,
    pub intercept_mode: InterceptMode,
}

/// Counts from one `apply_user_settings` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub remapped: usize,
    pub blocked: usize,
    pub passed: usize,
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct KeyboardRemapEngine {
    state: KeyRemapState,
}

impl KeyboardRemapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &KeyRemapState {
        &self.state
    }

    pub fn set_mapping(&mut self, native: &dyn NativeOverlay, src: VkCode, dst: VkCode) {
        self.state.mappings.insert(src, dst);
        self.sync(native);
    }

    pub fn remove_mapping(&mut self, native: &dyn NativeOverlay, src: VkCode) {
        self.state.mappings.remove(&src);
        self.sync(native);
    }

    pub fn clear_mappings(&mut self, native: &dyn NativeOverlay) {
        self.state.mappings.clear();
        self.sync(native);
    }

    /// Adds (`blocked == true`) or removes `keys` from the blocked set.
    pub fn set_blocked(&mut self, native: &dyn NativeOverlay, keys: &[VkCode], blocked: bool) {
        for &key in keys {
            if blocked {
                self.state.blocked_keys.insert(key);
            } else {
                self.state.blocked_keys.remove(&key);
            }
        }
        self.sync(native);
    }

    /// Records and pushes the mode, independently of the collections.
    pub fn set_mode(&mut self, native: &dyn NativeOverlay, mode: InterceptMode) {
        self.state.intercept_mode = mode;
        send(native, Command::KeyboardMode { mode });
    }

    /// Replaces the whole configuration from the settings UI rows.
    ///
    /// Rows whose source key (or, for remaps, target key) does not resolve
    /// are skipped. Each non-empty bucket is pushed, then the mode is forced
    /// to `SelectiveRemap` and the full state is pushed again.
    pub fn apply_user_settings(
        &mut self,
        native: &dyn NativeOverlay,
        rows: &[KeyboardRow],
    ) -> ApplySummary {
        self.state.mappings.clear();
        self.state.blocked_keys.clear();
        self.state.passed_keys.clear();

        let mut summary = ApplySummary::default();
        for row in rows {
            let Some(src) = vk_from_name(&row.source_key) else {
                log::warn!("remap: unknown source key \"{}\", row skipped", row.source_key);
                summary.skipped += 1;
                continue;
            };
            match row.mode {
                RowMode::Remap => {
                    let Some(dst) = vk_from_name(&row.target_key) else {
                        log::warn!(
                            "remap: unknown target key \"{}\" for {}, row skipped",
                            row.target_key,
                            row.source_key
                        );
                        summary.skipped += 1;
                        continue;
                    };
                    self.state.mappings.insert(src, dst);
                    summary.remapped += 1;
                }
                RowMode::Block => {
                    self.state.blocked_keys.insert(src);
                    summary.blocked += 1;
                }
                RowMode::Pass => {
                    self.state.passed_keys.insert(src);
                    summary.passed += 1;
                }
            }
        }
        log::info!(
            "remap: settings applied ({} remapped, {} blocked, {} passed, {} skipped)",
            summary.remapped,
            summary.blocked,
            summary.passed,
            summary.skipped
        );

        self.sync(native);
        self.set_mode(native, InterceptMode::SelectiveRemap);
        self.sync(native);
        summary
    }

    /// Pushes every non-empty collection as its own command.
    fn sync(&self, native: &dyn NativeOverlay) {
        if !self.state.mappings.is_empty() {
            send(
                native,
                Command::KeyboardRemap {
                    mappings: self.state.mappings.clone(),
                },
            );
        }
        if !self.state.blocked_keys.is_empty() {
            send(
                native,
                Command::KeyboardBlock {
                    blocked_keys: self.state.blocked_keys.clone(),
                },
            );
        }
        if !self.state.passed_keys.is_empty() {
            send(
                native,
                Command::KeyboardPass {
                    passed_keys: self.state.passed_keys.clone(),
                },
            );
        }
    }
}

/// Sends one command; failures are logged and swallowed.
fn send(native: &dyn NativeOverlay, command: Command) {
    if let Err(e) = native.send_command(&command) {
        log::warn!("remap: {} push failed: {e}", command.tag());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
