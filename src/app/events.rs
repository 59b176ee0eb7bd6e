//! Outbound panel events.
//!
//! The [`PanelService`](super::service::PanelService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, forward them to a
//! monitoring service or drive an LED.

use crate::fsm::Mode;

/// Why the alarm loop was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmReason {
    /// Too many wrong codes while armed.
    Lockout,
    /// The EMERGENCY button.
    Emergency,
}

/// Structured events emitted by the panel core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// The service has started (carries the initial mode).
    Started(Mode),

    /// The committed mode changed.
    ModeChanged { from: Mode, to: Mode },

    /// A correct arm request started the countdown.
    ArmingStarted { target: Mode, countdown_ticks: u32 },

    /// A running countdown was stopped before it committed.
    ArmingCancelled { target: Mode },

    /// A wrong code was entered.  `attempts_remaining` is `Some` while the
    /// failure counts toward lockout.
    IncorrectCode {
        mode: Mode,
        attempts_remaining: Option<u8>,
    },

    AlarmStarted(AlarmReason),

    AlarmStopped,

    /// The idle timer blanked a partially entered code.
    InputTimedOut,

    /// An alert message was handed to the alert port.
    AlertDispatched { mode: Mode },

    /// An alert was dropped by the rate limiter.
    AlertThrottled { mode: Mode },
}

/// Point-in-time view of the panel, suitable for logging or a status API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelStatus {
    pub mode: Mode,
    /// Target of the running arm countdown, if any.
    pub arming: Option<Mode>,
    pub alarm_active: bool,
    pub lockout_failures: u8,
    /// Number of keys currently buffered.
    pub input_len: usize,
    pub clear_timer_live: bool,
}
