//! Simulated sound player.
//!
//! Logs the configured clip identifier and blocks for the clip's nominal
//! length, so the alarm loop paces itself the way it would with a real
//! audio device.

use core::time::Duration;

use log::info;

use crate::app::ports::{SoundClip, SoundPort};
use crate::config::SoundClips;

pub struct LogSoundPlayer {
    clips: SoundClips,
    alarm_cycle: Duration,
}

impl LogSoundPlayer {
    pub fn new(clips: SoundClips) -> Self {
        Self {
            clips,
            alarm_cycle: Duration::from_secs(1),
        }
    }

    /// Length of one alarm playback cycle.
    pub fn with_alarm_cycle(mut self, cycle: Duration) -> Self {
        self.alarm_cycle = cycle;
        self
    }

    fn length(&self, clip: SoundClip) -> Duration {
        match clip {
            SoundClip::Alarm => self.alarm_cycle,
            SoundClip::Armed => Duration::from_millis(400),
            SoundClip::Error => Duration::from_millis(150),
            SoundClip::Beep => Duration::from_millis(60),
        }
    }
}

impl SoundPort for LogSoundPlayer {
    fn play(&self, clip: SoundClip) {
        info!("SOUND | {:?} ({})", clip, clip.resolve(&self.clips));
        std::thread::sleep(self.length(clip));
    }
}
