//! Cancellation token shared between the actor and one timer task.
//!
//! A stop request sets a flag and fires an `embassy_sync` signal.  Timer
//! sleeps race the signal against an `async-io-mini` reactor timer, so a
//! stop wakes a sleeping task at once instead of at its next tick.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use futures_lite::future;

/// How a [`CancelToken::sleep`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    Elapsed,
    Cancelled,
}

struct Inner {
    cancelled: AtomicBool,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

/// Cloneable stop flag with a wake-up signal.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                wake: Signal::new(),
            }),
        }
    }

    /// Request a stop.  Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.wake.signal(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Block the calling thread for `duration` or until cancelled.
    ///
    /// Must not be called from inside another executor.
    pub fn sleep(&self, duration: Duration) -> SleepOutcome {
        if self.is_cancelled() {
            return SleepOutcome::Cancelled;
        }
        let outcome = future::block_on(future::or(
            async {
                self.inner.wake.wait().await;
                SleepOutcome::Cancelled
            },
            async {
                async_io_mini::Timer::after(duration).await;
                SleepOutcome::Elapsed
            },
        ));
        // The signal may have been consumed by an earlier sleep; the flag
        // is authoritative.
        if self.is_cancelled() {
            SleepOutcome::Cancelled
        } else {
            outcome
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
