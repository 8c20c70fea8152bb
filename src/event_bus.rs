//! Single-writer message queue into the engine.
//!
//! The native module calls back on its own threads and the UI issues
//! requests from another. Neither touches engine state: both post an
//! `EngineMsg` through a cloneable `EventSink`, and `Engine::run` drains the
//! queue on one thread in arrival order.
//!
//! Hand out every sink before running the engine. `Engine::run` consumes the
//! bus and drops its own sender, so once the last sink is dropped the queue
//! disconnects and the engine shuts down.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde_json::Value;

use crate::keycodes::VkCode;
use crate::platform::{FpsPosition, HotkeyInfo, OverlayWindowDetails};
use crate::registry::Hook;
use crate::remap::InterceptMode;
use crate::settings::UserSettings;

/// Requests the UI layer can make of the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlRequest {
    AddHooks(Vec<Hook>),
    RemoveHooks(Vec<String>),
    EnableInjection,
    DisableInjection,
    ApplyUserSettings(UserSettings),
    SetKeyMapping { src: VkCode, dst: VkCode },
    RemoveKeyMapping { src: VkCode },
    ClearKeyMappings,
    SetBlockedKeys { keys: Vec<VkCode>, blocked: bool },
    SetInterceptMode(InterceptMode),
    StartIntercept,
    StopIntercept,
    SetCursor(String),
    SetFps { show: bool, position: FpsPosition },
    SetHotkeys(Vec<HotkeyInfo>),
    SendKey { key_code: VkCode, modifiers: u32 },
    AddOverlayWindow { id: u32, details: OverlayWindowDetails },
    CloseOverlayWindow { id: u32 },
    ChangeWindowSize { id: u32, width: u32, height: u32, x: i32, y: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineMsg {
    /// Raw native callback, decoded by the engine.
    Native { tag: String, payload: Value },
    Control(ControlRequest),
    Shutdown,
}

/// Producer half. Cheap to clone; every method returns `false` once the
/// engine has gone away.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<EngineMsg>,
}

impl EventSink {
    pub fn emit(&self, tag: impl Into<String>, payload: Value) -> bool {
        self.send(EngineMsg::Native {
            tag: tag.into(),
            payload,
        })
    }

    pub fn request(&self, request: ControlRequest) -> bool {
        self.send(EngineMsg::Control(request))
    }

    pub fn shutdown(&self) -> bool {
        self.send(EngineMsg::Shutdown)
    }

    fn send(&self, msg: EngineMsg) -> bool {
        self.tx.send(msg).is_ok()
    }
}

#[derive(Debug)]
pub struct EventBus {
    tx: Sender<EngineMsg>,
    rx: Receiver<EngineMsg>,
}

impl Default for EventBus {
    fn default() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> EventSink {
        EventSink {
            tx: self.tx.clone(),
        }
    }

    /// Consumer half. The bus's own sender is dropped here, so the returned
    /// receiver reports a disconnect once every sink is gone.
    pub fn into_receiver(self) -> Receiver<EngineMsg> {
        let Self { tx, rx } = self;
        drop(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_arrive_in_order_across_sinks() {
        let bus = EventBus::new();
        let native = bus.sink();
        let ui = native.clone();

        assert!(native.emit("game.hook", json!({"pid": 7})));
        assert!(ui.request(ControlRequest::EnableInjection));
        assert!(native.shutdown());

        let got: Vec<EngineMsg> = bus.into_receiver().try_iter().collect();
        assert_eq!(
            got,
            [
                EngineMsg::Native {
                    tag: "game.hook".into(),
                    payload: json!({"pid": 7}),
                },
                EngineMsg::Control(ControlRequest::EnableInjection),
                EngineMsg::Shutdown,
            ]
        );
    }

    #[test]
    fn sink_reports_dropped_bus() {
        let sink = EventBus::new().sink();
        assert!(!sink.request(ControlRequest::StartIntercept));
    }

    #[test]
    fn sinks_work_from_other_threads() {
        let bus = EventBus::new();
        let sink = bus.sink();
        std::thread::spawn(move || {
            sink.emit("game.exit", json!({"pid": 3}));
        })
        .join()
        .unwrap();
        assert_eq!(bus.into_receiver().try_iter().count(), 1);
    }

    #[test]
    fn receiver_disconnects_after_last_sink_drops() {
        let bus = EventBus::new();
        let sink = bus.sink();
        assert!(sink.emit("game.exit", json!({"pid": 3})));
        drop(sink);

        let rx = bus.into_receiver();
        assert!(rx.recv().is_ok());
        assert!(rx.recv().is_err());
    }
}
