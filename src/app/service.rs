//! Panel service, the single-writer core.
//!
//! [`PanelService`] owns the mode, the keypad buffer, the lockout counter
//! and every timer handle.  All mutation happens through `&mut self`;
//! background timers only reach back in through the [`TimerInbox`], which
//! the service drains at the start of every operation (or when the runtime
//! calls [`PanelService::poll`]).
//!
//! ```text
//!   keypad ──▶ ┌────────────────────────────┐ ──▶ DisplayPort
//!              │        PanelService        │ ──▶ SoundPort
//!  TimerInbox ▶│ Mode · Input · Lockout     │ ──▶ AlertPort
//!              │ ClearTimer · Arm · Alarm   │ ──▶ EventSink
//!              └────────────────────────────┘
//! ```

use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::auth::PasscodeVerifier;
use crate::config::{PanelConfig, PanelTimings};
use crate::error::{PanelError, Result};
use crate::events::{TimerEvent, TimerInbox};
use crate::fsm::input::{InputSession, is_keypad_key};
use crate::fsm::lockout::{LockoutPolicy, LockoutVerdict};
use crate::fsm::{self, Mode, Route};
use crate::throttle::AlertThrottle;
use crate::timers::arm::ArmPlan;
use crate::timers::{self, TimerHandle, TimerId};

use super::commands::{Outcome, PanelCommand};
use super::events::{AlarmReason, PanelEvent, PanelStatus};
use super::messages;
use super::ports::{Ports, SoundClip};

/// A countdown that has not committed yet.
struct PendingArm {
    target: Mode,
    handle: TimerHandle,
}

// ───────────────────────────────────────────────────────────────
// PanelService
// ───────────────────────────────────────────────────────────────

pub struct PanelService {
    verifier: PasscodeVerifier,
    timings: PanelTimings,
    mode: Mode,
    input: InputSession,
    lockout: LockoutPolicy,
    ports: Ports,
    inbox: Arc<TimerInbox>,
    clear_timer: Option<TimerHandle>,
    arm: Option<PendingArm>,
    alarm: Option<TimerHandle>,
    alerts: AlertThrottle,
    next_timer_id: TimerId,
}

impl PanelService {
    /// Build the service in STARTUP.  The passcode is reduced to a MAC
    /// here and the plaintext is not kept.
    ///
    /// Does **not** touch the display; call [`start`](Self::start) next.
    pub fn new(config: &PanelConfig, ports: Ports) -> Self {
        Self {
            verifier: PasscodeVerifier::new(&config.passcode),
            timings: config.timings.clone(),
            mode: Mode::Startup,
            input: InputSession::new(),
            lockout: LockoutPolicy::new(),
            ports,
            inbox: Arc::new(TimerInbox::new()),
            clear_timer: None,
            arm: None,
            alarm: None,
            alerts: AlertThrottle::new(),
            next_timer_id: 0,
        }
    }

    /// Replace the lockout policy (e.g. a lower threshold).
    pub fn with_lockout(mut self, lockout: LockoutPolicy) -> Self {
        self.lockout = lockout;
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self) {
        self.ports.display.set_status_text(&messages::status(self.mode));
        self.ports.display.set_code_text(messages::PROMPT);
        self.ports.events.emit(&PanelEvent::Started(self.mode));
        info!("PanelService started in {}", self.mode);
    }

    /// Stop every live timer and wait for all of them to exit.
    pub fn shutdown(&mut self) {
        let clear = self.clear_timer.take();
        let arm = self.arm.take();
        let alarm = self.alarm.take();

        // Signal all three first so they wind down in parallel.
        for handle in [clear.as_ref(), arm.as_ref().map(|p| &p.handle), alarm.as_ref()]
            .into_iter()
            .flatten()
        {
            handle.stop();
        }
        if let Some(h) = clear {
            h.join();
        }
        if let Some(p) = arm {
            p.handle.join();
        }
        if let Some(h) = alarm {
            h.join();
            self.ports.events.emit(&PanelEvent::AlarmStopped);
        }
        while self.inbox.try_next().is_some() {}
        self.input.clear();
        self.ports.display.clear();
        info!("PanelService shut down in {}", self.mode);
    }

    // ── Keypad ────────────────────────────────────────────────

    /// Append a keypad key and echo the masked code.
    pub fn press_key(&mut self, key: char) -> Result<Outcome> {
        self.poll();
        if !is_keypad_key(key) {
            return Err(PanelError::InvalidKey(key));
        }
        if !self.input.push(key) {
            warn!("Keypad buffer full, dropping key");
            return Err(PanelError::InputFull);
        }
        self.ports
            .display
            .set_code_text(&format!("{}{}", messages::PROMPT, self.input.masked()));
        self.ensure_clear_timer();
        Ok(Outcome::Accepted)
    }

    /// The Clear button: drop the typed code and the idle timer.
    pub fn press_clear(&mut self) -> Result<Outcome> {
        self.poll();
        self.stop_clear_timer();
        self.input.clear();
        self.ports.display.set_code_text(messages::PROMPT);
        Ok(Outcome::Accepted)
    }

    /// A mode button: request `target` with the code typed so far.
    pub fn submit(&mut self, target: Mode) -> Result<Outcome> {
        let code = self.input.as_str().to_string();
        self.request(target, &code)
    }

    // ── Mode requests ─────────────────────────────────────────

    /// Request a transition to `target`, gated by `code`.
    pub fn request(&mut self, target: Mode, code: &str) -> Result<Outcome> {
        self.poll();
        let route = fsm::route(self.mode, target)?;

        if route == Route::Panic {
            return Ok(self.enter_panic(target));
        }

        if code.is_empty() {
            self.reject(messages::CODE_REQUIRED);
            return Err(PanelError::CodeRequired);
        }

        let matched = self.verifier.matches(code);
        self.input.clear();
        if !matched {
            return Err(self.wrong_code());
        }

        self.stop_clear_timer();
        self.lockout.reset();

        if matches!(target, Mode::Home | Mode::Disarmed) && self.arm.is_some() {
            // A correct disarm silences the panel even if the mode stays put.
            self.stop_alarm();
            return self.cancel_pending_arm();
        }

        if target == self.mode {
            self.reject(&messages::already_in(target));
            return Ok(Outcome::AlreadyInMode(target));
        }

        match route {
            Route::Countdown => self.begin_arming(target),
            _ => {
                self.stop_alarm();
                let from = self.mode;
                self.set_mode(target);
                Ok(Outcome::Transitioned { from, to: target })
            }
        }
    }

    /// Stop a running arm countdown.  The mode stays where it was.
    pub fn cancel_pending_arm(&mut self) -> Result<Outcome> {
        self.poll();
        let Some(pending) = self.arm.take() else {
            return Err(PanelError::NoPendingArm);
        };
        let target = pending.target;
        pending.handle.stop_and_join();

        self.ports.display.set_status_text(&messages::status(self.mode));
        self.ports.display.set_code_text(messages::ARMING_CANCELLED);
        self.ports
            .events
            .emit(&PanelEvent::ArmingCancelled { target });
        info!("Arming to {} cancelled, staying in {}", target, self.mode);

        self.ensure_clear_timer();
        Ok(Outcome::ArmingCancelled { target })
    }

    /// Dispatch a [`PanelCommand`] to the matching operation.
    pub fn handle_command(&mut self, cmd: PanelCommand) -> Result<Outcome> {
        match cmd {
            PanelCommand::Key(key) => self.press_key(key),
            PanelCommand::Clear => self.press_clear(),
            PanelCommand::Submit(target) => self.submit(target),
            PanelCommand::Request { target, code } => self.request(target, &code),
            PanelCommand::CancelArm => self.cancel_pending_arm(),
            PanelCommand::Status => {
                self.poll();
                Ok(Outcome::Accepted)
            }
            PanelCommand::Shutdown => {
                self.shutdown();
                Ok(Outcome::Accepted)
            }
        }
    }

    // ── Timer events ──────────────────────────────────────────

    /// Apply every pending timer event.  Returns how many were drained.
    pub fn poll(&mut self) -> usize {
        let mut n = 0;
        while let Some(event) = self.inbox.try_next() {
            self.apply_timer_event(event);
            n += 1;
        }
        n
    }

    /// Apply one timer event.  Events from timers that are no longer the
    /// live handle of their kind are ignored.
    pub fn apply_timer_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::InputExpired { id } => {
                if self.clear_timer.as_ref().map(TimerHandle::id) != Some(id) {
                    debug!("Ignoring stale clear-timer #{}", id);
                    return;
                }
                if let Some(handle) = self.clear_timer.take() {
                    handle.join();
                }
                self.input.clear();
                self.ports.events.emit(&PanelEvent::InputTimedOut);
                debug!("Input cleared after idle timeout");
            }
            TimerEvent::ArmCompleted { id, target } => {
                if self.arm.as_ref().map(|p| p.handle.id()) != Some(id) {
                    debug!("Ignoring stale arm-sequencer #{}", id);
                    return;
                }
                if let Some(pending) = self.arm.take() {
                    pending.handle.join();
                }
                self.set_mode(target);
            }
        }
    }

    /// Shared inbox the timers post into.  The runtime awaits it.
    pub fn timer_inbox(&self) -> Arc<TimerInbox> {
        self.inbox.clone()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn lockout_failures(&self) -> u8 {
        self.lockout.failures()
    }

    pub fn is_alarm_active(&self) -> bool {
        self.alarm.as_ref().is_some_and(TimerHandle::is_running)
    }

    /// Target of the running countdown, if any.
    pub fn arming_target(&self) -> Option<Mode> {
        self.arm.as_ref().map(|p| p.target)
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn snapshot(&self) -> PanelStatus {
        PanelStatus {
            mode: self.mode,
            arming: self.arming_target(),
            alarm_active: self.is_alarm_active(),
            lockout_failures: self.lockout.failures(),
            input_len: self.input.len(),
            clear_timer_live: self
                .clear_timer
                .as_ref()
                .is_some_and(TimerHandle::is_running),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// EMERGENCY / SILENT: no passcode gate, no countdown.
    fn enter_panic(&mut self, target: Mode) -> Outcome {
        self.input.clear();
        self.stop_clear_timer();
        if let Some(pending) = self.arm.take() {
            pending.handle.stop_and_join();
            self.ports.events.emit(&PanelEvent::ArmingCancelled {
                target: pending.target,
            });
        }
        if target == Mode::Emergency {
            self.ensure_alarm(AlarmReason::Emergency);
        }

        if target == self.mode {
            self.ports.display.set_code_text(&messages::already_in(target));
            return Outcome::AlreadyInMode(target);
        }

        let from = self.mode;
        self.set_mode(target);
        self.dispatch_alert();
        Outcome::Transitioned { from, to: target }
    }

    fn begin_arming(&mut self, target: Mode) -> Result<Outcome> {
        if let Some(old) = self.arm.take() {
            debug!("Replacing countdown to {}", old.target);
            old.handle.stop_and_join();
        }

        let id = self.alloc_timer_id();
        let plan = ArmPlan {
            target,
            ticks: self.timings.arm_countdown_ticks,
            tick: self.timings.tick(),
        };
        let handle = timers::arm::start(id, plan, self.ports.clone(), self.inbox.clone())?;
        self.arm = Some(PendingArm { target, handle });

        self.ports.events.emit(&PanelEvent::ArmingStarted {
            target,
            countdown_ticks: plan.ticks,
        });
        info!(
            "Arming {} from {} ({} ticks)",
            target, self.mode, plan.ticks
        );
        Ok(Outcome::ArmingStarted { target })
    }

    fn wrong_code(&mut self) -> PanelError {
        let mode = self.mode;
        match self.lockout.record_failure(mode) {
            LockoutVerdict::Tripped => {
                warn!("Lockout threshold reached in {}", mode);
                self.ports.display.set_code_text(messages::ALARM_TRIGGERED);
                self.ensure_alarm(AlarmReason::Lockout);
                self.dispatch_alert();
                PanelError::AlarmTriggered
            }
            LockoutVerdict::Warning { attempts_remaining } => {
                warn!(
                    "Incorrect code in {}, {} attempts remaining",
                    mode, attempts_remaining
                );
                self.reject(&messages::incorrect_code(attempts_remaining));
                self.ports.events.emit(&PanelEvent::IncorrectCode {
                    mode,
                    attempts_remaining: Some(attempts_remaining),
                });
                PanelError::IncorrectCode {
                    attempts_remaining: Some(attempts_remaining),
                }
            }
            LockoutVerdict::NotCounted => {
                info!("Incorrect code in {}", mode);
                self.reject(messages::INCORRECT_CODE);
                self.ports.events.emit(&PanelEvent::IncorrectCode {
                    mode,
                    attempts_remaining: None,
                });
                PanelError::IncorrectCode {
                    attempts_remaining: None,
                }
            }
        }
    }

    /// Error clip, message on the code line, and an idle timer to wipe it.
    fn reject(&mut self, message: &str) {
        self.ports.sound.play(SoundClip::Error);
        self.ports.display.set_code_text(message);
        self.ensure_clear_timer();
    }

    fn set_mode(&mut self, to: Mode) {
        let from = self.mode;
        if from == to {
            return;
        }
        self.mode = to;
        self.lockout.reset();
        self.ports.display.set_status_text(&messages::status(to));
        self.ports.display.set_code_text(messages::PROMPT);
        self.ports.events.emit(&PanelEvent::ModeChanged { from, to });
        info!("Mode {} -> {}", from, to);
    }

    /// Keep a live ClearTimer if there is one; otherwise start a fresh one.
    fn ensure_clear_timer(&mut self) {
        if self
            .clear_timer
            .as_ref()
            .is_some_and(TimerHandle::is_running)
        {
            return;
        }
        if let Some(done) = self.clear_timer.take() {
            done.join();
        }
        let id = self.alloc_timer_id();
        let window = self.timings.tick() * self.timings.clear_after_ticks;
        match timers::clear::start(
            id,
            window,
            self.ports.display.clone(),
            self.inbox.clone(),
        ) {
            Ok(handle) => self.clear_timer = Some(handle),
            Err(e) => warn!("Input will not auto-clear: {}", e),
        }
    }

    fn stop_clear_timer(&mut self) {
        if let Some(handle) = self.clear_timer.take() {
            handle.stop_and_join();
        }
    }

    fn ensure_alarm(&mut self, reason: AlarmReason) {
        if self.is_alarm_active() {
            return;
        }
        if let Some(dead) = self.alarm.take() {
            dead.join();
        }
        let id = self.alloc_timer_id();
        match timers::alarm::start(
            id,
            self.timings.alarm_cycle_gap(),
            self.ports.sound.clone(),
        ) {
            Ok(handle) => {
                self.alarm = Some(handle);
                self.ports.events.emit(&PanelEvent::AlarmStarted(reason));
            }
            Err(e) => error!("Alarm could not start: {}", e),
        }
    }

    fn stop_alarm(&mut self) {
        if let Some(handle) = self.alarm.take() {
            handle.stop_and_join();
            self.ports.events.emit(&PanelEvent::AlarmStopped);
            info!("Alarm silenced");
        }
    }

    fn dispatch_alert(&mut self) {
        let mode = self.mode;
        if !self.alerts.try_acquire() {
            warn!("Alert suppressed by rate limit ({})", mode);
            self.ports.events.emit(&PanelEvent::AlertThrottled { mode });
            return;
        }
        let timestamp = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S%.6f")
            .to_string();
        self.ports
            .alerts
            .send_alert(&messages::alert_body(mode, &timestamp));
        self.ports.events.emit(&PanelEvent::AlertDispatched { mode });
    }

    fn alloc_timer_id(&mut self) -> TimerId {
        let id = self.next_timer_id;
        self.next_timer_id = self.next_timer_id.wrapping_add(1);
        id
    }
}
