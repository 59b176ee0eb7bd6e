//! Alert rate limiting.
//!
//! A hammered panic button or a stuck keypad must not flood the alert
//! recipients.  Alerts draw from a `burster` token bucket; when it is
//! empty the alert is dropped and the caller logs that it was.

use burster::Limiter;
use core::time::Duration;

pub struct AlertThrottle {
    bucket: burster::TokenBucket<fn() -> Duration>,
}

impl AlertThrottle {
    pub fn new() -> Self {
        Self {
            bucket: burster::TokenBucket::new_with_time_provider(
                1,
                3, // 1 token per second, 3 alerts back to back
                platform_now as fn() -> Duration,
            ),
        }
    }

    /// Take one token; `false` means the alert should be suppressed.
    pub fn try_acquire(&mut self) -> bool {
        self.bucket.try_consume(1).is_ok()
    }
}

impl Default for AlertThrottle {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_now() -> Duration {
    use std::time::Instant;
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    START.get_or_init(Instant::now).elapsed()
}
