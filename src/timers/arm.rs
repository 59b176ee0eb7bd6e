//! ArmSequencer: the audible countdown before ARMED / CCTV takes effect.
//!
//! ```text
//!  remaining:  60 ........ 30 ........ 10  9  8 ... 1   done
//!  cue:        beep+notice beep+notice beep every tick  armed clip
//! ```
//!
//! The stop token is checked on every tick.  A stopped sequencer exits
//! quietly: no armed clip, no completion event.

use core::time::Duration;
use std::sync::Arc;

use log::{debug, info};

use super::task::spawn_timer;
use super::{CancelToken, SleepOutcome, TimerHandle, TimerId};
use crate::app::messages;
use crate::app::ports::{Ports, SoundClip};
use crate::error::{PanelError, TimerKind};
use crate::events::{TimerEvent, TimerInbox};
use crate::fsm::Mode;

/// Remaining-tick counts that get a spoken-style notice.
pub const NOTICE_AT: [u32; 2] = [60, 30];

/// From this many remaining ticks down, every tick beeps.
pub const FINAL_BEEPS_FROM: u32 = 10;

/// Cues for one tick of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cue {
    /// Show the phase notice instead of the plain countdown line.
    pub notice: bool,
    pub beep: bool,
}

/// What to do with `remaining` ticks left (before the tick's sleep).
pub fn cue_for(remaining: u32) -> Cue {
    let notice = NOTICE_AT.contains(&remaining);
    Cue {
        notice,
        beep: notice || (1..=FINAL_BEEPS_FROM).contains(&remaining),
    }
}

/// Parameters for one sequencer run.
#[derive(Debug, Clone, Copy)]
pub struct ArmPlan {
    pub target: Mode,
    pub ticks: u32,
    pub tick: Duration,
}

/// Start the countdown toward `plan.target`.
pub fn start(
    id: TimerId,
    plan: ArmPlan,
    ports: Ports,
    inbox: Arc<TimerInbox>,
) -> Result<TimerHandle, PanelError> {
    spawn_timer(TimerKind::ArmSequence, id, move |token| {
        let ArmPlan {
            target,
            ticks,
            tick,
        } = plan;

        for remaining in (1..=ticks).rev() {
            if token.is_cancelled() {
                debug!("arm-sequencer #{}: stopped at {}", id, remaining);
                return;
            }
            let cue = cue_for(remaining);
            if cue.notice {
                info!("{} in {} ticks", target, remaining);
                ports
                    .display
                    .set_code_text(&messages::arming_notice(target, remaining));
            } else {
                ports
                    .display
                    .set_code_text(&messages::arming_countdown(target, remaining));
            }
            if cue.beep {
                ports.sound.play(SoundClip::Beep);
            }
            if token.sleep(tick) == SleepOutcome::Cancelled {
                debug!("arm-sequencer #{}: stopped at {}", id, remaining);
                return;
            }
        }

        finish(id, target, &token, &ports, &inbox);
    })
}

/// Natural end of the countdown.  A stop that lands after the last tick
/// still suppresses the armed cue and the completion event.
fn finish(id: TimerId, target: Mode, token: &CancelToken, ports: &Ports, inbox: &TimerInbox) {
    if token.is_cancelled() {
        debug!("arm-sequencer #{}: stopped before completion", id);
        return;
    }
    ports.sound.play(SoundClip::Armed);
    ports.display.set_code_text(messages::PROMPT);
    inbox.post(TimerEvent::ArmCompleted { id, target });
}
