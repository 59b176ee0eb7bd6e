//! Timer-to-actor event queue.
//!
//! Background timers never touch panel state.  When one of them finishes
//! something the actor must act on, it posts a [`TimerEvent`] here and the
//! actor applies it on its own thread.
//!
//! ```text
//! ┌──────────────┐
//! │ ClearTimer   │────▶┌──────────────┐     ┌──────────────┐
//! │ ArmSequencer │────▶│  TimerInbox  │────▶│ PanelService │
//! │              │     │  (bounded)   │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Events carry the id of the timer that produced them.  A timer that was
//! cancelled after posting leaves a stale event behind; the actor drops
//! events whose id does not match its live handle.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::fsm::Mode;
use crate::timers::TimerId;

/// Maximum number of undrained timer events.
const INBOX_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The idle window elapsed; the input buffer should be blanked.
    InputExpired { id: TimerId },
    /// The arm countdown ran to completion; commit `target`.
    ArmCompleted { id: TimerId, target: Mode },
}

impl TimerEvent {
    pub fn id(&self) -> TimerId {
        match self {
            Self::InputExpired { id } | Self::ArmCompleted { id, .. } => *id,
        }
    }
}

/// Bounded MPSC queue from timer threads to the actor.
pub struct TimerInbox {
    channel: Channel<CriticalSectionRawMutex, TimerEvent, INBOX_DEPTH>,
}

impl TimerInbox {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Post an event.  Never blocks; a full inbox drops the event.
    pub fn post(&self, event: TimerEvent) -> bool {
        if self.channel.try_send(event).is_err() {
            warn!("timer inbox full, dropping {:?}", event);
            return false;
        }
        true
    }

    /// Next pending event, if any.
    pub fn try_next(&self) -> Option<TimerEvent> {
        self.channel.try_receive().ok()
    }

    /// Wait for the next event.  Used by the runtime's dispatch loop.
    pub async fn next(&self) -> TimerEvent {
        self.channel.receive().await
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl Default for TimerInbox {
    fn default() -> Self {
        Self::new()
    }
}
