//! Named thread spawning for timer tasks.
//!
//! Every timer runs on its own small OS thread so that the actor never
//! blocks on a countdown.  The thread name comes from
//! [`TimerKind::task_name`], which makes the tasks easy to pick out in a
//! debugger or `top -H`.

use log::{debug, error};

use super::token::CancelToken;
use super::{TimerHandle, TimerId};
use crate::error::{PanelError, TimerKind};

/// Stack size for timer threads.  They only sleep, format short strings
/// and call into the ports.
pub const TIMER_STACK_KB: usize = 64;

/// Spawn `body` on a fresh named thread and return its handle.
///
/// `body` receives the token it must poll.  A refused spawn is reported
/// as [`PanelError::TimerSpawn`]; the caller decides whether to continue
/// without the timer.
pub fn spawn_timer(
    kind: TimerKind,
    id: TimerId,
    body: impl FnOnce(CancelToken) + Send + 'static,
) -> Result<TimerHandle, PanelError> {
    let token = CancelToken::new();
    let task_token = token.clone();

    debug!(
        "Spawning '{}' #{} (stack={}KB)",
        kind.task_name(),
        id,
        TIMER_STACK_KB
    );

    let thread = std::thread::Builder::new()
        .name(kind.task_name().into())
        .stack_size(TIMER_STACK_KB * 1024)
        .spawn(move || body(task_token))
        .map_err(|e| {
            error!("{}: thread creation failed: {}", kind.task_name(), e);
            PanelError::TimerSpawn(kind)
        })?;

    Ok(TimerHandle::new(kind, id, token, thread))
}
