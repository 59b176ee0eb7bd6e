//! Unified error types for the panel core.
//!
//! Every rejection the state machine can report funnels into [`PanelError`].
//! None of them are fatal: the panel stays in a consistent mode and the
//! caller decides how to surface the message.  Variants are `Copy` so they
//! can be handed to event sinks and logged without allocation.

use core::fmt;

use crate::fsm::Mode;

// ---------------------------------------------------------------------------
// Timer kinds
// ---------------------------------------------------------------------------

/// The three kinds of background timer the panel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Idle timeout that blanks a partially entered code.
    Clear,
    /// Countdown preceding an ARMED / CCTV transition.
    ArmSequence,
    /// Repeating audible alarm.
    Alarm,
}

impl TimerKind {
    /// Thread name used when spawning a task of this kind.
    pub const fn task_name(self) -> &'static str {
        match self {
            Self::Clear => "clear-timer",
            Self::ArmSequence => "arm-sequencer",
            Self::Alarm => "alarm-loop",
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => write!(f, "clear timer"),
            Self::ArmSequence => write!(f, "arm sequencer"),
            Self::Alarm => write!(f, "alarm loop"),
        }
    }
}

// ---------------------------------------------------------------------------
// Panel errors
// ---------------------------------------------------------------------------

/// Every rejected panel operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelError {
    /// A mode button was pressed with no code entered.
    CodeRequired,
    /// The entered code did not match.  `attempts_remaining` is `Some` only
    /// while the failure counts toward lockout.
    IncorrectCode { attempts_remaining: Option<u8> },
    /// The lockout threshold was reached and the alarm has been started.
    AlarmTriggered,
    /// `cancel_pending_arm` was called with no countdown running.
    NoPendingArm,
    /// The requested target can never be entered through a request.
    InvalidTarget(Mode),
    /// The key is not on the keypad.
    InvalidKey(char),
    /// The input buffer is full; the key was dropped.
    InputFull,
    /// The OS refused to start a timer thread.
    TimerSpawn(TimerKind),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeRequired => write!(f, "code required"),
            Self::IncorrectCode {
                attempts_remaining: Some(n),
            } => write!(f, "incorrect code, {n} attempts remaining"),
            Self::IncorrectCode {
                attempts_remaining: None,
            } => write!(f, "incorrect code"),
            Self::AlarmTriggered => write!(f, "alarm triggered"),
            Self::NoPendingArm => write!(f, "no arming countdown in progress"),
            Self::InvalidTarget(mode) => write!(f, "cannot request {mode}"),
            Self::InvalidKey(key) => write!(f, "invalid key {key:?}"),
            Self::InputFull => write!(f, "input buffer full"),
            Self::TimerSpawn(kind) => write!(f, "failed to start {kind}"),
        }
    }
}

impl std::error::Error for PanelError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Panel-wide `Result` alias.
pub type Result<T> = core::result::Result<T, PanelError>;
