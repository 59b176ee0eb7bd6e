//! AlarmLoop: repeats the alarm clip until stopped.
//!
//! A playback cycle is never interrupted; the stop token is checked after
//! each one, then once more across the optional gap between cycles.

use core::time::Duration;
use std::sync::Arc;

use log::{debug, warn};

use super::task::spawn_timer;
use super::{SleepOutcome, TimerHandle, TimerId};
use crate::app::ports::{SoundClip, SoundPort};
use crate::error::{PanelError, TimerKind};

pub fn start(
    id: TimerId,
    gap: Duration,
    sound: Arc<dyn SoundPort>,
) -> Result<TimerHandle, PanelError> {
    spawn_timer(TimerKind::Alarm, id, move |token| {
        warn!("alarm-loop #{}: sounding", id);
        let mut cycles: u32 = 0;
        loop {
            sound.play(SoundClip::Alarm);
            cycles = cycles.wrapping_add(1);
            if token.is_cancelled() {
                break;
            }
            if !gap.is_zero() && token.sleep(gap) == SleepOutcome::Cancelled {
                break;
            }
        }
        debug!("alarm-loop #{}: silenced after {} cycles", id, cycles);
    })
}
