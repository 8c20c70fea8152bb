//! Native event decoding.
//!
//! The native module reports everything through one callback carrying a
//! string tag and a loosely typed JSON payload. `NativeEvent::from_raw` is the
//! only place that looks at tags; past this point every event is a variant
//! with its own typed fields.

use serde::de::DeserializeOwned;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Logical keyboard channel an event is republished on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyChannel {
    Down,
    Up,
}

/// Normalised keyboard event, identical for all three native spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: u32,
    pub modifiers: u32,
    /// Physical key before remapping, when the native layer remapped it.
    pub original_key: Option<u32>,
}

/// A raw window message captured inside the game for an overlay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInput {
    pub window_id: u32,
    pub msg: u32,
    pub wparam: u64,
    pub lparam: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    /// The hooked module is running inside `pid`.
    Process { pid: u32 },
    /// The hook acquired the graphics/input of `pid`.
    Hook { pid: u32 },
    Exit { pid: u32 },
    Input(RawInput),
    Key { channel: KeyChannel, event: KeyEvent },
    WindowFocus { focus_window_id: u32 },
    GraphicsWindow { width: u32, height: u32 },
    WindowResize { width: u32, height: u32 },
    Fps { fps: Option<f64> },
    FrameBuffer { width: u32, height: u32 },
    Log { message: String },
    GameLog { message: String },
    Unknown { tag: String, payload: Value },
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Union of every field any tag carries. Unknown fields are ignored.
#[derive(Debug)]
struct RawPayload {
    window_id: Option<u32>,
    focus_window_id: Option<u32>,
    message: Option<String>,
    pid: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    key_code: Option<u32>,
    modifiers: Option<u32>,
    original_key: Option<u32>,
    is_down: Option<bool>,
    msg: Option<u32>,
    wparam: Option<u64>,
    lparam: Option<i64>,
    fps: Option<f64>,
}

impl RawPayload {
    /// Decodes field by field, so a mistyped field only loses itself and
    /// not the fields this tag actually needs.
    fn decode(tag: &str, payload: &Value) -> Self {
        let field = |name: &str| payload.get(name).filter(|v| !v.is_null());
        fn typed<T: DeserializeOwned>(tag: &str, name: &str, v: Option<&Value>) -> Option<T> {
            let v = v?;
            match T::deserialize(v) {
                Ok(t) => Some(t),
                Err(e) => {
                    log::debug!("event: bad {name} in {tag}: {e}");
                    None
                }
            }
        }

        // WPARAM is unsigned; some callers send it sign-extended.
        let wparam = field("wparam").and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_i64().map(|signed| signed as u64))
                .or_else(|| typed(tag, "wparam", Some(v)))
        });

        Self {
            window_id: typed(tag, "windowId", field("windowId")),
            focus_window_id: typed(tag, "focusWindowId", field("focusWindowId")),
            message: typed(tag, "message", field("message")),
            pid: typed(tag, "pid", field("pid")),
            width: typed(tag, "width", field("width")),
            height: typed(tag, "height", field("height")),
            key_code: typed(tag, "keyCode", field("keyCode")),
            modifiers: typed(tag, "modifiers", field("modifiers")),
            original_key: typed(tag, "originalKey", field("originalKey")),
            is_down: typed(tag, "isDown", field("isDown")),
            msg: typed(tag, "msg", field("msg")),
            wparam,
            lparam: typed(tag, "lparam", field("lparam")),
            fps: typed(tag, "fps", field("fps")),
        }
    }
}

/// Zero is the native layer's "unset" value for ids and sizes.
fn non_zero(v: Option<u32>) -> Option<u32> {
    v.filter(|&v| v != 0)
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

impl NativeEvent {
    /// Maps a tagged native callback to a typed event.
    ///
    /// Returns `None` when a recognised tag is missing a required field (or
    /// carries zero for it); such events are dropped by the caller. Tags that
    /// are not recognised come back as `Unknown`.
    pub fn from_raw(tag: &str, payload: &Value) -> Option<Self> {
        let p = RawPayload::decode(tag, payload);

        let event = match tag {
            "game.process" => NativeEvent::Process { pid: non_zero(p.pid)? },
            "game.hook" => NativeEvent::Hook { pid: non_zero(p.pid)? },
            "game.exit" => NativeEvent::Exit { pid: non_zero(p.pid)? },
            "game.input" => NativeEvent::Input(RawInput {
                window_id: non_zero(p.window_id)?,
                msg: p.msg?,
                wparam: p.wparam.unwrap_or(0),
                lparam: p.lparam.unwrap_or(0),
            }),
            "game.keyboard.down" => NativeEvent::Key {
                channel: KeyChannel::Down,
                event: key_event(&p)?,
            },
            "game.keyboard.up" => NativeEvent::Key {
                channel: KeyChannel::Up,
                event: key_event(&p)?,
            },
            "game.keyboard.event" => {
                let channel = if p.is_down? {
                    KeyChannel::Down
                } else {
                    KeyChannel::Up
                };
                NativeEvent::Key {
                    channel,
                    event: key_event(&p)?,
                }
            }
            "graphics.window.event.focus" | "game.window.focused" => NativeEvent::WindowFocus {
                focus_window_id: non_zero(p.focus_window_id)?,
            },
            "graphics.window" => NativeEvent::GraphicsWindow {
                width: non_zero(p.width)?,
                height: non_zero(p.height)?,
            },
            "graphics.window.event.resize" => NativeEvent::WindowResize {
                width: non_zero(p.width)?,
                height: non_zero(p.height)?,
            },
            "graphics.fps" => NativeEvent::Fps { fps: p.fps },
            "sharedmem.framebuffer" => NativeEvent::FrameBuffer {
                width: non_zero(p.width)?,
                height: non_zero(p.height)?,
            },
            "log" => NativeEvent::Log {
                message: non_empty(p.message)?,
            },
            "game.log" => NativeEvent::GameLog {
                message: non_empty(p.message)?,
            },
            _ => NativeEvent::Unknown {
                tag: tag.to_string(),
                payload: payload.clone(),
            },
        };
        Some(event)
    }
}

fn key_event(p: &RawPayload) -> Option<KeyEvent> {
    Some(KeyEvent {
        key_code: p.key_code?,
        modifiers: p.modifiers.unwrap_or(0),
        original_key: p.original_key,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
