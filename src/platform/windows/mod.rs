//! Windows OS probes backing the core's platform traits.
//!
//! `WindowsProcessProbe` answers process liveness through `OpenProcess` and
//! `GetExitCodeProcess`. `WindowsDisplayScale` reads the effective DPI of the
//! monitor nearest to a window. Injection and window enumeration belong to the
//! native overlay module and are not implemented here.

mod dpi;
mod process;

pub use dpi::WindowsDisplayScale;
pub use process::WindowsProcessProbe;
