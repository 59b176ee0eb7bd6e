//! Piezo buzzer sound adapter.
//!
//! Drives a GPIO-connected buzzer through `embedded-hal` traits.  Each
//! clip is a fixed on/off pulse pattern; `play` returns when the pattern
//! is done.  Pin errors are logged and the pattern is abandoned.

use std::sync::Mutex;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{SoundClip, SoundPort};

/// One pulse: buzzer on for `on_ms`, then off for `off_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub on_ms: u32,
    pub off_ms: u32,
}

const fn pulse(on_ms: u32, off_ms: u32) -> Pulse {
    Pulse { on_ms, off_ms }
}

const ALARM: [Pulse; 8] = [pulse(120, 40); 8];
const ERROR: [Pulse; 3] = [pulse(80, 80); 3];
const BEEP: [Pulse; 1] = [pulse(60, 0)];
const ARMED: [Pulse; 2] = [pulse(300, 100), pulse(600, 0)];

pub fn pattern(clip: SoundClip) -> &'static [Pulse] {
    match clip {
        SoundClip::Alarm => &ALARM,
        SoundClip::Error => &ERROR,
        SoundClip::Beep => &BEEP,
        SoundClip::Armed => &ARMED,
    }
}

struct Hw<P, D> {
    pin: P,
    delay: D,
}

pub struct BuzzerSound<P, D> {
    hw: Mutex<Hw<P, D>>,
}

impl<P, D> BuzzerSound<P, D>
where
    P: OutputPin + Send,
    D: DelayNs + Send,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            hw: Mutex::new(Hw { pin, delay }),
        }
    }

    /// Give the pin and delay back.
    pub fn release(self) -> Option<(P, D)> {
        self.hw.into_inner().ok().map(|hw| (hw.pin, hw.delay))
    }
}

impl<P, D> SoundPort for BuzzerSound<P, D>
where
    P: OutputPin + Send,
    D: DelayNs + Send,
{
    fn play(&self, clip: SoundClip) {
        let Ok(mut guard) = self.hw.lock() else {
            warn!("buzzer: lock poisoned, dropping {:?}", clip);
            return;
        };
        let hw = &mut *guard;
        for p in pattern(clip) {
            if let Err(e) = hw.pin.set_high() {
                warn!("buzzer: set_high failed: {:?}", e);
                return;
            }
            hw.delay.delay_ms(p.on_ms);
            if let Err(e) = hw.pin.set_low() {
                warn!("buzzer: set_low failed: {:?}", e);
                return;
            }
            if p.off_ms > 0 {
                hw.delay.delay_ms(p.off_ms);
            }
        }
    }
}
