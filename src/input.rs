//! Input translation between the game's native input stream and the overlay.
//!
//! Two directions pass through here:
//!
//! - Window messages captured inside the game for an overlay window
//!   (`game.input`) are decoded into `OverlayInput`, corrected for the
//!   monitor's display scale and handed to the `InputSink`. Delivery is
//!   fire-and-forget: at most once per native event, never retried.
//! - Keyboard callbacks, whichever of the three native spellings fired, are
//!   republished as `KeyEvent`s on the `Down` and `Up` channels.

use crate::overlay::OverlayWindows;
use crate::platform::{DisplayScale, InputSink, KeyChannel, KeyEvent, RawInput};

// Window message ids (winuser.h).
const WM_KEYDOWN: u32 = 0x0100;
const WM_KEYUP: u32 = 0x0101;
const WM_CHAR: u32 = 0x0102;
const WM_SYSKEYDOWN: u32 = 0x0104;
const WM_SYSKEYUP: u32 = 0x0105;
const WM_SYSCHAR: u32 = 0x0106;
const WM_MOUSEMOVE: u32 = 0x0200;
const WM_LBUTTONDOWN: u32 = 0x0201;
const WM_LBUTTONUP: u32 = 0x0202;
const WM_LBUTTONDBLCLK: u32 = 0x0203;
const WM_RBUTTONDOWN: u32 = 0x0204;
const WM_RBUTTONUP: u32 = 0x0205;
const WM_RBUTTONDBLCLK: u32 = 0x0206;
const WM_MBUTTONDOWN: u32 = 0x0207;
const WM_MBUTTONUP: u32 = 0x0208;
const WM_MBUTTONDBLCLK: u32 = 0x0209;
const WM_MOUSEWHEEL: u32 = 0x020A;
const WM_XBUTTONDOWN: u32 = 0x020B;
const WM_XBUTTONUP: u32 = 0x020C;
const WM_XBUTTONDBLCLK: u32 = 0x020D;
const WM_MOUSEHWHEEL: u32 = 0x020E;

const XBUTTON1: u16 = 0x0001;

// ---------------------------------------------------------------------------
// Overlay input model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

/// Input as the overlay window consumes it. Coordinates are logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayInput {
    MouseMove {
        x: i32,
        y: i32,
    },
    MouseButton {
        button: MouseButton,
        pressed: bool,
        double_click: bool,
        x: i32,
        y: i32,
    },
    MouseWheel {
        delta: i16,
        horizontal: bool,
        x: i32,
        y: i32,
    },
    Key {
        key_code: u32,
        pressed: bool,
        system: bool,
    },
    Char {
        code: u32,
    },
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Physical -> logical: `round(raw / scale)`. Non-positive or non-finite
/// scales are treated as 1.0.
pub fn to_logical(raw: i32, scale: f64) -> i32 {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    (raw as f64 / scale).round() as i32
}

/// Signed x/y packed into the low dword of `lparam` (GET_X/Y_LPARAM).
fn point(lparam: i64, scale: f64) -> (i32, i32) {
    let x = (lparam & 0xFFFF) as u16 as i16 as i32;
    let y = ((lparam >> 16) & 0xFFFF) as u16 as i16 as i32;
    (to_logical(x, scale), to_logical(y, scale))
}

fn hiword(wparam: u64) -> u16 {
    ((wparam >> 16) & 0xFFFF) as u16
}

/// Decodes one window message. Every positional field is scaled. Returns
/// `None` for messages the overlay does not consume.
pub fn translate(raw: &RawInput, scale: f64) -> Option<OverlayInput> {
    let button = |button, pressed, double_click| {
        let (x, y) = point(raw.lparam, scale);
        OverlayInput::MouseButton {
            button,
            pressed,
            double_click,
            x,
            y,
        }
    };
    let x_button = || {
        if hiword(raw.wparam) == XBUTTON1 {
            MouseButton::X1
        } else {
            MouseButton::X2
        }
    };

    let input = match raw.msg {
        WM_MOUSEMOVE => {
            let (x, y) = point(raw.lparam, scale);
            OverlayInput::MouseMove { x, y }
        }
        WM_LBUTTONDOWN => button(MouseButton::Left, true, false),
        WM_LBUTTONUP => button(MouseButton::Left, false, false),
        WM_LBUTTONDBLCLK => button(MouseButton::Left, true, true),
        WM_RBUTTONDOWN => button(MouseButton::Right, true, false),
        WM_RBUTTONUP => button(MouseButton::Right, false, false),
        WM_RBUTTONDBLCLK => button(MouseButton::Right, true, true),
        WM_MBUTTONDOWN => button(MouseButton::Middle, true, false),
        WM_MBUTTONUP => button(MouseButton::Middle, false, false),
        WM_MBUTTONDBLCLK => button(MouseButton::Middle, true, true),
        WM_XBUTTONDOWN => button(x_button(), true, false),
        WM_XBUTTONUP => button(x_button(), false, false),
        WM_XBUTTONDBLCLK => button(x_button(), true, true),
        WM_MOUSEWHEEL | WM_MOUSEHWHEEL => {
            let (x, y) = point(raw.lparam, scale);
            OverlayInput::MouseWheel {
                delta: hiword(raw.wparam) as i16,
                horizontal: raw.msg == WM_MOUSEHWHEEL,
                x,
                y,
            }
        }
        WM_KEYDOWN | WM_SYSKEYDOWN => OverlayInput::Key {
            key_code: raw.wparam as u32,
            pressed: true,
            system: raw.msg == WM_SYSKEYDOWN,
        },
        WM_KEYUP | WM_SYSKEYUP => OverlayInput::Key {
            key_code: raw.wparam as u32,
            pressed: false,
            system: raw.msg == WM_SYSKEYUP,
        },
        WM_CHAR | WM_SYSCHAR => OverlayInput::Char {
            code: raw.wparam as u32,
        },
        _ => return None,
    };
    Some(input)
}

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

pub type KeyListener = Box<dyn FnMut(&KeyEvent) + Send>;

/// Forwards overlay input and fans keyboard events out to listeners.
#[derive(Default)]
pub struct InputTranslator {
    key_down: Vec<KeyListener>,
    key_up: Vec<KeyListener>,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the target window, decodes and scales the message, and
    /// dispatches it. Returns `false` when the event was dropped.
    pub fn forward(
        &self,
        windows: &OverlayWindows,
        scale: &dyn DisplayScale,
        sink: &dyn InputSink,
        raw: &RawInput,
    ) -> bool {
        let Some(handle) = windows.handle(raw.window_id) else {
            return false;
        };
        let Some(input) = translate(raw, scale.scale_factor(handle)) else {
            log::trace!("input: ignoring message {:#06x}", raw.msg);
            return false;
        };
        sink.dispatch(handle, input);
        true
    }

    pub fn on_key_down(&mut self, listener: KeyListener) {
        self.key_down.push(listener);
    }

    pub fn on_key_up(&mut self, listener: KeyListener) {
        self.key_up.push(listener);
    }

    /// Republishes a keyboard event on its channel. Returns the number of
    /// listeners notified.
    pub fn publish_key(&mut self, channel: KeyChannel, event: &KeyEvent) -> usize {
        let listeners = match channel {
            KeyChannel::Down => &mut self.key_down,
            KeyChannel::Up => &mut self.key_up,
        };
        for listener in listeners.iter_mut() {
            listener(event);
        }
        listeners.len()
    }
}

impl std::fmt::Debug for InputTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputTranslator")
            .field("key_down", &self.key_down.len())
            .field("key_up", &self.key_up.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
