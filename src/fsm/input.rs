//! Keypad input buffer.
//!
//! Holds the digits typed since the last clear, check or timeout.  The
//! buffer is fixed-capacity; presses beyond [`MAX_CODE_LEN`] are refused.

use heapless::String;

/// Longest code the keypad will accept.
pub const MAX_CODE_LEN: usize = 16;

/// Keys on the physical keypad (the Clear button is handled separately).
pub const fn is_keypad_key(key: char) -> bool {
    key.is_ascii_digit() || key == '*' || key == '#'
}

#[derive(Debug, Clone, Default)]
pub struct InputSession {
    buf: String<MAX_CODE_LEN>,
}

impl InputSession {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Append one key.  Returns `false` if the buffer is full.
    pub fn push(&mut self, key: char) -> bool {
        self.buf.push(key).is_ok()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// One `*` per entered key, for echoing on the display.
    pub fn masked(&self) -> std::string::String {
        "*".repeat(self.buf.len())
    }
}
