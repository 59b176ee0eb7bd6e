//! Terminal display adapter.
//!
//! Renders the two keypad lines to stdout whenever either changes.  Used
//! by the simulator binary in place of a real keypad screen.

use std::io::Write;
use std::sync::Mutex;

use crate::app::ports::DisplayPort;

#[derive(Default)]
struct Lines {
    status: String,
    code: String,
}

pub struct ConsoleDisplay {
    lines: Mutex<Lines>,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Lines::default()),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Lines)) {
        let Ok(mut lines) = self.lines.lock() else {
            return;
        };
        f(&mut lines);
        let mut out = std::io::stdout().lock();
        // A closed stdout is not the panel's problem.
        let _ = writeln!(out, "┌ {}\n└ {}", lines.status, lines.code);
        let _ = out.flush();
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for ConsoleDisplay {
    fn set_status_text(&self, text: &str) {
        self.update(|l| l.status = text.to_string());
    }

    fn set_code_text(&self, text: &str) {
        self.update(|l| l.code = text.to_string());
    }

    fn clear(&self) {
        self.update(|l| {
            l.status.clear();
            l.code.clear();
        });
    }
}
