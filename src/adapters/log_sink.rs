//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured panel events to the
//! `log` facade (which the binary routes to stderr).  A monitoring-service
//! adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::PanelEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`PanelEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&self, event: &PanelEvent) {
        match event {
            PanelEvent::Started(mode) => {
                info!("START | initial_mode={}", mode);
            }
            PanelEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from, to);
            }
            PanelEvent::ArmingStarted {
                target,
                countdown_ticks,
            } => {
                info!("ARM   | target={} ticks={}", target, countdown_ticks);
            }
            PanelEvent::ArmingCancelled { target } => {
                info!("ARM   | cancelled target={}", target);
            }
            PanelEvent::IncorrectCode {
                mode,
                attempts_remaining: Some(n),
            } => {
                warn!("CODE  | incorrect in {}, {} attempts remaining", mode, n);
            }
            PanelEvent::IncorrectCode {
                mode,
                attempts_remaining: None,
            } => {
                info!("CODE  | incorrect in {}", mode);
            }
            PanelEvent::AlarmStarted(reason) => {
                warn!("ALARM | started ({:?})", reason);
            }
            PanelEvent::AlarmStopped => {
                info!("ALARM | stopped");
            }
            PanelEvent::InputTimedOut => {
                info!("INPUT | cleared after idle timeout");
            }
            PanelEvent::AlertDispatched { mode } => {
                info!("ALERT | dispatched (mode={})", mode);
            }
            PanelEvent::AlertThrottled { mode } => {
                warn!("ALERT | throttled (mode={})", mode);
            }
        }
    }
}
