//! Failed-passcode lockout policy.
//!
//! Pure counter logic, no timers.  Failures only count while the panel is
//! in an armed-like mode; the counter resets itself when it trips so the
//! next burst of wrong codes starts from zero.

use super::Mode;

/// Consecutive wrong codes (while armed-like) that start the alarm.
pub const LOCKOUT_THRESHOLD: u8 = 3;

/// What a single failed check amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutVerdict {
    /// The panel was not armed-like; nothing was counted.
    NotCounted,
    /// Counted, still below the threshold.
    Warning { attempts_remaining: u8 },
    /// Threshold reached.  The counter is back at zero.
    Tripped,
}

/// Consecutive-failure counter.
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    threshold: u8,
    failures: u8,
}

impl LockoutPolicy {
    pub fn new() -> Self {
        Self::with_threshold(LOCKOUT_THRESHOLD)
    }

    /// Policy with a custom threshold (clamped to at least 1).
    pub fn with_threshold(threshold: u8) -> Self {
        Self {
            threshold: threshold.max(1),
            failures: 0,
        }
    }

    /// Record one failed passcode check made while in `mode`.
    pub fn record_failure(&mut self, mode: Mode) -> LockoutVerdict {
        if !mode.is_armed_like() {
            return LockoutVerdict::NotCounted;
        }
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.threshold {
            self.failures = 0;
            LockoutVerdict::Tripped
        } else {
            LockoutVerdict::Warning {
                attempts_remaining: self.threshold - self.failures,
            }
        }
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Failures counted since the last reset.
    pub fn failures(&self) -> u8 {
        self.failures
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new()
    }
}
