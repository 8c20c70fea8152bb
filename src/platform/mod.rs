//! Native capability boundary.
//!
//! The injection/hook engine lives in a native module outside this crate.
//! This layer defines the traits the core talks to (`NativeOverlay`,
//! `ProcessProbe`, `DisplayScale`, `InputSink`), the closed `Command` set the
//! native layer accepts, and the typed `NativeEvent` set it emits.
//! OS-backed implementations live in child modules.

pub mod command;
pub mod event;
#[cfg(target_os = "windows")]
mod windows;

pub use command::{Command, FpsPosition, HotkeyInfo, MouseOption};
pub use event::{KeyChannel, KeyEvent, NativeEvent, RawInput};

use serde::{Deserialize, Serialize};

use crate::input::OverlayInput;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures reported by the native module or an OS probe.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The capability does not exist on this target or session.
    #[error("platform unavailable: {0}")]
    Unavailable(String),
    /// The native module rejected or failed a call.
    #[error("native call failed: {0}")]
    Native(String),
    #[error("{0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Boundary data
// ---------------------------------------------------------------------------

/// A top-level window as reported by the native enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopWindow {
    pub window_id: u32,
    pub process_id: u32,
    #[serde(default)]
    pub thread_id: u32,
    #[serde(default)]
    pub title: String,
}

/// Outcome of a native injection attempt. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectResult {
    pub inject_succeed: bool,
}

/// Screen rectangle in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Draggable caption area of an overlay window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub height: u32,
}

/// Registration record handed to the native layer for each overlay window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayWindowDetails {
    pub name: String,
    pub transparent: bool,
    pub resizable: bool,
    pub max_width: u32,
    pub max_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub rect: Rect,
    pub native_handle: u32,
    #[serde(default)]
    pub drag_border_width: u32,
    #[serde(default)]
    pub caption: Option<Caption>,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// The process-wide native overlay session.
///
/// Opened once by `start()`, closed once by `stop()`. All commands funnel
/// through `send_command` in call order; each command replaces the native
/// value it targets, so no reordering guarantees are needed.
pub trait NativeOverlay {
    fn start(&self) -> Result<(), PlatformError>;
    fn stop(&self) -> Result<(), PlatformError>;

    /// Enumerates visible top-level windows in z-order.
    fn top_windows(&self) -> Result<Vec<TopWindow>, PlatformError>;

    /// Attaches the hook to the process owning `window`.
    fn inject(&self, window: &TopWindow) -> Result<InjectResult, PlatformError>;

    /// Fire-and-forget configuration/control message.
    fn send_command(&self, command: &Command) -> Result<(), PlatformError>;

    fn add_window(&self, window_id: u32, details: &OverlayWindowDetails)
        -> Result<(), PlatformError>;
    fn close_window(&self, window_id: u32) -> Result<(), PlatformError>;
    fn send_window_bounds(&self, window_id: u32, rect: Rect) -> Result<(), PlatformError>;
}

/// Answers whether a process id is still present in the OS process table.
pub trait ProcessProbe {
    fn is_running(&self, pid: u32) -> bool;
}

/// Display scale factor (1.0 = 96 DPI) of the monitor under a window.
pub trait DisplayScale {
    fn scale_factor(&self, native_handle: u32) -> f64;
}

/// Delivers translated input to an overlay window. Must not block.
pub trait InputSink {
    fn dispatch(&self, native_handle: u32, input: OverlayInput);
}

// ---------------------------------------------------------------------------
// Factories
// ---------------------------------------------------------------------------

/// Returns the OS process-table probe for this target.
pub fn create_process_probe() -> Result<Box<dyn ProcessProbe + Send>, PlatformError> {
    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(windows::WindowsProcessProbe::new()))
    }
    #[cfg(not(target_os = "windows"))]
    {
        Err(PlatformError::Unavailable(
            "process probing requires Windows".into(),
        ))
    }
}

/// Returns the per-monitor DPI scale source for this target.
pub fn create_display_scale() -> Result<Box<dyn DisplayScale + Send>, PlatformError> {
    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(windows::WindowsDisplayScale::new()))
    }
    #[cfg(not(target_os = "windows"))]
    {
        Err(PlatformError::Unavailable(
            "display scale queries require Windows".into(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
