//! Per-monitor DPI lookup.
//!
//! Scale is `effective_dpi / 96`. Any failure along the way falls back to 1.0
//! so coordinates pass through unscaled rather than being dropped.

use windows_sys::Win32::Graphics::Gdi::{MonitorFromWindow, MONITOR_DEFAULTTONEAREST};
use windows_sys::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};

use crate::platform::DisplayScale;

/// Windows reference DPI (100% scaling).
const BASE_DPI: u32 = 96;

pub struct WindowsDisplayScale;

impl WindowsDisplayScale {
    pub fn new() -> Self {
        WindowsDisplayScale
    }
}

impl DisplayScale for WindowsDisplayScale {
    fn scale_factor(&self, native_handle: u32) -> f64 {
        // SAFETY: MonitorFromWindow tolerates stale handles and returns the
        // nearest monitor; GetDpiForMonitor only writes the two out-params.
        let dpi = unsafe {
            let monitor = MonitorFromWindow(native_handle as usize as _, MONITOR_DEFAULTTONEAREST);
            if monitor.is_null() {
                return 1.0;
            }
            let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
            if GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) != 0 {
                return 1.0;
            }
            dpi_x
        };

        if dpi == 0 {
            1.0
        } else {
            dpi as f64 / BASE_DPI as f64
        }
    }
}
