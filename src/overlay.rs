//! Overlay window table.
//!
//! Tracks the transparent UI windows registered with the native layer, keyed
//! by the window id the native side uses in `game.input` events. The input
//! translator resolves ids through this table; an id that is not here has no
//! live window and its input is dropped.

use std::collections::BTreeMap;

use crate::platform::{NativeOverlay, OverlayWindowDetails, PlatformError, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayWindow {
    pub id: u32,
    pub details: OverlayWindowDetails,
}

impl OverlayWindow {
    pub fn native_handle(&self) -> u32 {
        self.details.native_handle
    }

    pub fn bounds(&self) -> Rect {
        self.details.rect
    }
}

#[derive(Debug, Default)]
pub struct OverlayWindows {
    windows: BTreeMap<u32, OverlayWindow>,
}

impl OverlayWindows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a window with the native layer and tracks it locally.
    /// Re-adding an id replaces the previous record.
    pub fn add(
        &mut self,
        native: &dyn NativeOverlay,
        id: u32,
        details: OverlayWindowDetails,
    ) -> Result<(), PlatformError> {
        native.add_window(id, &details)?;
        log::info!("overlay: window {id} \"{}\" added", details.name);
        self.windows.insert(id, OverlayWindow { id, details });
        Ok(())
    }

    /// Forgets a window and tells the native layer. Unknown ids are a no-op.
    pub fn close(&mut self, native: &dyn NativeOverlay, id: u32) -> bool {
        if self.windows.remove(&id).is_none() {
            log::debug!("overlay: close of unknown window {id}");
            return false;
        }
        if let Err(e) = native.close_window(id) {
            log::warn!("overlay: native close of window {id} failed: {e}");
        }
        true
    }

    /// Closes every tracked window. Returns how many were closed.
    pub fn close_all(&mut self, native: &dyn NativeOverlay) -> usize {
        let ids: Vec<u32> = self.ids().collect();
        ids.into_iter().filter(|&id| self.close(native, id)).count()
    }

    /// Resizes/moves a window. Zero arguments keep the current value.
    /// Unknown ids are logged and dropped. Returns the bounds sent.
    pub fn change_size(
        &mut self,
        native: &dyn NativeOverlay,
        id: u32,
        width: u32,
        height: u32,
        x: i32,
        y: i32,
    ) -> Option<Rect> {
        let Some(window) = self.windows.get_mut(&id) else {
            log::error!("overlay: change size window {id} not found");
            return None;
        };

        let current = window.details.rect;
        let rect = Rect {
            x: if x != 0 { x } else { current.x },
            y: if y != 0 { y } else { current.y },
            width: if width != 0 { width } else { current.width },
            height: if height != 0 { height } else { current.height },
        };
        window.details.rect = rect;

        if let Err(e) = native.send_window_bounds(id, rect) {
            log::warn!("overlay: sending bounds for window {id} failed: {e}");
        }
        Some(rect)
    }

    pub fn get(&self, id: u32) -> Option<&OverlayWindow> {
        self.windows.get(&id)
    }

    /// Native handle of a live window, if any.
    pub fn handle(&self, id: u32) -> Option<u32> {
        self.windows
            .get(&id)
            .map(OverlayWindow::native_handle)
            .filter(|&h| h != 0)
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.windows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
