//! Display name -> Windows virtual key code resolution.
//!
//! The settings UI stores keys by display name ("A", "F5", "Page Up",
//! "Numpad +"). `vk_from_name` turns those into VK codes from the Windows SDK
//! (winuser.h). Names are normalised before lookup: case-folded, with
//! spaces, underscores and hyphens removed, so "Page Up", "PAGE_UP" and
//! "pageup" all resolve to `VK_PRIOR`.
//!
//! Left/right modifier names resolve to their sided VK codes (VK_LSHIFT etc.);
//! the bare names resolve to the generic code (VK_SHIFT).

/// Virtual key code as the native hook understands it.
pub type VkCode = u32;

pub const VK_BACK: VkCode = 0x08;
pub const VK_TAB: VkCode = 0x09;
pub const VK_RETURN: VkCode = 0x0D;
pub const VK_ESCAPE: VkCode = 0x1B;
pub const VK_SPACE: VkCode = 0x20;

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolves a display name to a virtual key code.
///
/// Returns `None` for empty or unrecognised names.
pub fn vk_from_name(name: &str) -> Option<VkCode> {
    let key = normalize(name);
    if key.is_empty() {
        return None;
    }

    if let Some(vk) = single_char(&key) {
        return Some(vk);
    }
    if let Some(vk) = function_key(&key) {
        return Some(vk);
    }
    if let Some(vk) = numpad_key(&key) {
        return Some(vk);
    }
    named_key(&key)
}

/// Upper-cases and strips separators: "Page Up" -> "PAGEUP".
///
/// A trailing hyphen is kept so "Numpad -" stays distinct from "Numpad".
/// A single character is taken as-is.
fn normalize(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.chars().count() == 1 {
        return trimmed.to_uppercase();
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        let trailing = chars.peek().is_none();
        match c {
            ' ' | '_' => {}
            '-' if !trailing => {}
            _ => out.extend(c.to_uppercase()),
        }
    }
    out
}

/// Letters and top-row digits share their ASCII value with the VK code.
fn single_char(key: &str) -> Option<VkCode> {
    let mut chars = key.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match c {
        'A'..='Z' | '0'..='9' => Some(c as VkCode),
        // Punctuation keys (OEM codes, ANSI layout assumed)
        '`' | '~' => Some(0xC0),
        '-' | '_' => Some(0xBD),
        '=' | '+' => Some(0xBB),
        '[' | '{' => Some(0xDB),
        ']' | '}' => Some(0xDD),
        '\\' | '|' => Some(0xDC),
        ';' | ':' => Some(0xBA),
        '\'' | '"' => Some(0xDE),
        ',' | '<' => Some(0xBC),
        '.' | '>' => Some(0xBE),
        '/' | '?' => Some(0xBF),
        _ => None,
    }
}

/// Parses a suffix made only of ASCII digits. `str::parse` alone would also
/// take a leading sign.
fn digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// F1 (0x70) .. F24 (0x87).
fn function_key(key: &str) -> Option<VkCode> {
    let n = digits(key.strip_prefix('F')?)?;
    if (1..=24).contains(&n) {
        Some(0x70 + n - 1)
    } else {
        None
    }
}

/// NUMPAD0 (0x60) .. NUMPAD9 (0x69) and the keypad operators.
fn numpad_key(key: &str) -> Option<VkCode> {
    let rest = key
        .strip_prefix("NUMPAD")
        .or_else(|| key.strip_prefix("NUM"))?;

    if let Some(n) = digits(rest) {
        return (n <= 9).then_some(0x60 + n);
    }

    match rest {
        "*" | "MULTIPLY" | "MUL" => Some(0x6A),
        "+" | "ADD" | "PLUS" => Some(0x6B),
        "-" | "SUBTRACT" | "SUB" | "MINUS" => Some(0x6D),
        "." | "DECIMAL" | "DEL" | "DOT" => Some(0x6E),
        "/" | "DIVIDE" | "DIV" | "SLASH" => Some(0x6F),
        "ENTER" | "RETURN" => Some(VK_RETURN),
        "LOCK" => Some(0x90),
        _ => None,
    }
}

/// Control, navigation, lock and media keys by name.
fn named_key(key: &str) -> Option<VkCode> {
    let vk = match key {
        // Editing and whitespace
        "BACKSPACE" | "BACK" | "BKSP" => VK_BACK,
        "TAB" => VK_TAB,
        "ENTER" | "RETURN" => VK_RETURN,
        "ESC" | "ESCAPE" => VK_ESCAPE,
        "SPACE" | "SPACEBAR" => VK_SPACE,
        "DELETE" | "DEL" => 0x2E,
        "INSERT" | "INS" => 0x2D,

        // Navigation, including directional aliases
        "PAGEUP" | "PGUP" | "PRIOR" => 0x21,
        "PAGEDOWN" | "PGDN" | "PGDOWN" | "NEXT" => 0x22,
        "END" => 0x23,
        "HOME" => 0x24,
        "LEFT" | "ARROWLEFT" | "LEFTARROW" => 0x25,
        "UP" | "ARROWUP" | "UPARROW" => 0x26,
        "RIGHT" | "ARROWRIGHT" | "RIGHTARROW" => 0x27,
        "DOWN" | "ARROWDOWN" | "DOWNARROW" => 0x28,

        // Modifiers
        "SHIFT" => 0x10,
        "CTRL" | "CONTROL" => 0x11,
        "ALT" | "MENU" => 0x12,
        "LSHIFT" | "LEFTSHIFT" => 0xA0,
        "RSHIFT" | "RIGHTSHIFT" => 0xA1,
        "LCTRL" | "LEFTCTRL" | "LCONTROL" | "LEFTCONTROL" => 0xA2,
        "RCTRL" | "RIGHTCTRL" | "RCONTROL" | "RIGHTCONTROL" => 0xA3,
        "LALT" | "LEFTALT" => 0xA4,
        "RALT" | "RIGHTALT" | "ALTGR" => 0xA5,
        "WIN" | "LWIN" | "LEFTWIN" | "WINDOWS" | "META" | "SUPER" => 0x5B,
        "RWIN" | "RIGHTWIN" => 0x5C,
        "APPS" | "CONTEXTMENU" => 0x5D,

        // Lock and system keys
        "CAPSLOCK" | "CAPS" => 0x14,
        "NUMLOCK" => 0x90,
        "SCROLLLOCK" | "SCROLL" => 0x91,
        "PRINTSCREEN" | "PRTSC" | "PRINTSCR" | "SNAPSHOT" => 0x2C,
        "PAUSE" | "BREAK" => 0x13,

        // Media and volume
        "VOLUMEMUTE" | "MUTE" => 0xAD,
        "VOLUMEDOWN" => 0xAE,
        "VOLUMEUP" => 0xAF,
        "MEDIANEXT" | "NEXTTRACK" => 0xB0,
        "MEDIAPREV" | "MEDIAPREVIOUS" | "PREVTRACK" => 0xB1,
        "MEDIASTOP" | "STOP" => 0xB2,
        "MEDIAPLAYPAUSE" | "PLAYPAUSE" => 0xB3,

        // Spelled-out punctuation
        "BACKTICK" | "GRAVE" | "TILDE" => 0xC0,
        "MINUS" => 0xBD,
        "EQUAL" | "EQUALS" | "PLUS" => 0xBB,
        "COMMA" => 0xBC,
        "PERIOD" | "DOT" => 0xBE,
        "SLASH" => 0xBF,
        "SEMICOLON" => 0xBA,
        "QUOTE" | "APOSTROPHE" => 0xDE,
        "BACKSLASH" => 0xDC,
        "LEFTBRACKET" | "LBRACKET" => 0xDB,
        "RIGHTBRACKET" | "RBRACKET" => 0xDD,

        _ => return None,
    };
    Some(vk)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
