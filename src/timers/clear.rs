//! ClearTimer: blanks a partially entered code after an idle window.

use core::time::Duration;
use std::sync::Arc;

use log::debug;

use super::task::spawn_timer;
use super::{SleepOutcome, TimerHandle, TimerId};
use crate::app::messages;
use crate::app::ports::DisplayPort;
use crate::error::{PanelError, TimerKind};
use crate::events::{TimerEvent, TimerInbox};

/// Start a single-shot idle timer.
///
/// After `window` without a stop, the code line is reset to the prompt
/// and [`TimerEvent::InputExpired`] is posted so the actor blanks the
/// buffer.  A stop before then ends the task with no side effects.
pub fn start(
    id: TimerId,
    window: Duration,
    display: Arc<dyn DisplayPort>,
    inbox: Arc<TimerInbox>,
) -> Result<TimerHandle, PanelError> {
    spawn_timer(TimerKind::Clear, id, move |token| {
        if token.sleep(window) == SleepOutcome::Cancelled {
            debug!("clear-timer #{}: stopped", id);
            return;
        }
        display.set_code_text(messages::PROMPT);
        inbox.post(TimerEvent::InputExpired { id });
    })
}
