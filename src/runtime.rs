//! Panel runtime: the actor thread.
//!
//! Moves a [`PanelService`] onto a dedicated thread and drives it with an
//! `edge-executor` task.  The task sleeps until either a keypad command
//! arrives or a timer posts into the [`TimerInbox`](crate::events::TimerInbox),
//! then applies it.  Timer completions are therefore serialized with every
//! other operation without anyone having to call `poll`.
//!
//! ```text
//!  ┌────────────┐  PanelCommand  ┌──────────────────────────────────┐
//!  │ PanelHandle│───────────────▶│  panel thread                    │
//!  │  (caller)  │◀───────────────│  LocalExecutor                   │
//!  └────────────┘     Reply      │   dispatch_loop:                 │
//!                                │     or(command, timer event)     │
//!  timer threads ──TimerEvent───▶│     → PanelService               │
//!                                └──────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use futures_lite::future;
use log::{error, info, warn};

use crate::app::commands::{Outcome, PanelCommand};
use crate::app::events::PanelStatus;
use crate::app::service::PanelService;
use crate::error::Result;
use crate::events::TimerEvent;

const CMD_DEPTH: usize = 8;
const REPLY_DEPTH: usize = 8;

/// Result of one command, with the panel state right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub result: Result<Outcome>,
    pub status: PanelStatus,
}

struct Channels {
    commands: Channel<CriticalSectionRawMutex, PanelCommand, CMD_DEPTH>,
    replies: Channel<CriticalSectionRawMutex, Reply, REPLY_DEPTH>,
    /// Set once the dispatch loop is gone, panicked or not.
    stopped: AtomicBool,
    exited: Signal<CriticalSectionRawMutex, ()>,
}

/// Marks the panel thread as gone when it unwinds or returns.
struct ExitGuard(Arc<Channels>);

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.0.stopped.store(true, Ordering::Release);
        self.0.exited.signal(());
    }
}

enum Wake {
    Command(PanelCommand),
    Timer(TimerEvent),
}

/// Caller side of a running panel.
pub struct PanelHandle {
    channels: Arc<Channels>,
    thread: Option<JoinHandle<()>>,
}

impl PanelHandle {
    /// Send a command and wait for its reply.  `None` once the panel
    /// thread has stopped, including when it stops while we wait.
    pub fn call(&mut self, cmd: PanelCommand) -> Option<Reply> {
        if !self.is_running() {
            return None;
        }
        let channels = &self.channels;
        future::block_on(channels.commands.send(cmd));
        future::block_on(future::or(
            async { Some(channels.replies.receive().await) },
            async {
                channels.exited.wait().await;
                None
            },
        ))
    }

    pub fn is_running(&self) -> bool {
        !self.channels.stopped.load(Ordering::Acquire)
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop every timer, end the dispatch loop and join the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        if !thread.is_finished() {
            future::block_on(self.channels.commands.send(PanelCommand::Shutdown));
        }
        if thread.join().is_err() {
            error!("panel thread panicked");
        }
    }
}

impl Drop for PanelHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start `service` on its own thread.
pub fn spawn(mut service: PanelService) -> std::io::Result<PanelHandle> {
    let channels = Arc::new(Channels {
        commands: Channel::new(),
        replies: Channel::new(),
        stopped: AtomicBool::new(false),
        exited: Signal::new(),
    });
    let loop_channels = channels.clone();

    let thread = std::thread::Builder::new()
        .name("panel".into())
        .spawn(move || {
            let _exit = ExitGuard(loop_channels.clone());
            service.start();
            let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
            let task = executor.spawn(dispatch_loop(service, loop_channels));
            future::block_on(executor.run(task));
        })?;

    Ok(PanelHandle {
        channels,
        thread: Some(thread),
    })
}

/// Wait for a command or a timer event, apply it, repeat until Shutdown.
async fn dispatch_loop(mut service: PanelService, channels: Arc<Channels>) {
    let inbox = service.timer_inbox();
    info!("Panel dispatch loop running");

    loop {
        let wake = future::or(
            async { Wake::Command(channels.commands.receive().await) },
            async { Wake::Timer(inbox.next().await) },
        )
        .await;

        match wake {
            Wake::Timer(event) => service.apply_timer_event(event),
            Wake::Command(cmd) => {
                let shutting_down = cmd == PanelCommand::Shutdown;
                let result = service.handle_command(cmd);
                let reply = Reply {
                    result,
                    status: service.snapshot(),
                };
                if channels.replies.try_send(reply).is_err() {
                    warn!("reply channel full, dropping reply");
                }
                if shutting_down {
                    break;
                }
            }
        }
    }

    info!("Panel dispatch loop stopped");
}
