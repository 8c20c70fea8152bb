//! gamelay -- game overlay hook lifecycle and input remapping engine.
//!
//! Finds target games by window title, drives the per-process injection
//! lifecycle against an external native hook module, translates captured
//! input for the overlay windows, and keeps the native keyboard and mouse
//! configuration in sync with the user's settings.

pub mod config;
pub mod engine;
pub mod event_bus;
pub mod hook;
pub mod input;
pub mod keycodes;
pub mod mouse;
pub mod overlay;
pub mod platform;
pub mod registry;
pub mod remap;
pub mod scheduler;
pub mod settings;
pub mod watcher;

#[cfg(test)]
mod test_support;

pub use config::{Config, ConfigError};
pub use engine::{Engine, Task};
pub use event_bus::{ControlRequest, EngineMsg, EventBus, EventSink};
pub use platform::PlatformError;
