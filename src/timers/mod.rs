//! Cancellable background timers.
//!
//! Three kinds of timer run next to the actor:
//!
//! | Kind           | Module     | Ends by                                  |
//! |----------------|------------|------------------------------------------|
//! | ClearTimer     | [`clear`]  | expiry (posts `InputExpired`) or stop    |
//! | ArmSequencer   | [`arm`]    | completion (posts `ArmCompleted`) or stop |
//! | AlarmLoop      | [`alarm`]  | stop only                                |
//!
//! Each one is owned through a [`TimerHandle`].  Stopping is cooperative:
//! the task observes its [`CancelToken`] at its own granularity, and
//! [`TimerHandle::stop_and_join`] blocks until the thread has exited.

pub mod alarm;
pub mod arm;
pub mod clear;
pub mod task;
pub mod token;

use std::thread::JoinHandle;

use log::error;

pub use token::{CancelToken, SleepOutcome};

use crate::error::TimerKind;

/// Unique id of one timer instance.  Monotonic per panel.
pub type TimerId = u32;

/// Owning handle to a running timer task.
///
/// Dropping the handle stops and joins the task, so a handle can never
/// outlive its thread silently.
#[derive(Debug)]
pub struct TimerHandle {
    kind: TimerKind,
    id: TimerId,
    token: CancelToken,
    thread: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub(crate) fn new(
        kind: TimerKind,
        id: TimerId,
        token: CancelToken,
        thread: JoinHandle<()>,
    ) -> Self {
        Self {
            kind,
            id,
            token,
            thread: Some(thread),
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    /// `true` until the task's thread has exited.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the task to stop without waiting for it.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Wait for the task to exit on its own.
    pub fn join(mut self) {
        self.reap();
    }

    /// Signal the task and wait until its thread has exited.
    pub fn stop_and_join(self) {
        self.stop();
        self.join();
    }

    fn reap(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("{} #{} panicked", self.kind.task_name(), self.id);
            }
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.token.cancel();
            self.reap();
        }
    }
}
