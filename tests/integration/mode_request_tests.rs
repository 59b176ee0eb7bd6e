//! Mode requests: passcode gate, routing, countdown and cancellation.

use std::time::Duration;

use bluess::app::commands::Outcome;
use bluess::app::events::{AlarmReason, PanelEvent};
use bluess::app::messages;
use bluess::app::ports::SoundClip;
use bluess::error::PanelError;
use bluess::fsm::Mode;

use super::mock_hw::{CODE, fast_timings, panel, slow_arm_timings, wait_until};

#[test]
fn empty_code_never_changes_mode() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Armed, CODE).unwrap();

    for target in [Mode::Disarmed, Mode::Home, Mode::Armed, Mode::Cctv] {
        assert_eq!(svc.request(target, ""), Err(PanelError::CodeRequired));
        assert_eq!(svc.mode(), Mode::Armed);
        assert_eq!(svc.lockout_failures(), 0);
    }
    assert!(mock.showed_code_text(messages::CODE_REQUIRED));
    assert!(svc.snapshot().clear_timer_live);
    svc.shutdown();
}

#[test]
fn first_request_from_startup_is_immediate() {
    let (mut svc, mock) = panel(fast_timings());
    assert_eq!(
        svc.request(Mode::Cctv, CODE),
        Ok(Outcome::Transitioned {
            from: Mode::Startup,
            to: Mode::Cctv
        })
    );
    assert_eq!(mock.last_status_text().as_deref(), Some("System Status:  CCTV"));
    assert_eq!(mock.count_sound(SoundClip::Beep), 0);
}

#[test]
fn arming_from_disarmed_commits_after_countdown() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Disarmed, CODE).unwrap();

    assert_eq!(
        svc.request(Mode::Armed, CODE),
        Ok(Outcome::ArmingStarted { target: Mode::Armed })
    );
    assert_eq!(svc.mode(), Mode::Disarmed);
    assert_eq!(svc.arming_target(), Some(Mode::Armed));

    assert!(wait_until(&mut svc, Duration::from_secs(2), |s| s.mode() == Mode::Armed));
    assert_eq!(svc.arming_target(), None);
    assert_eq!(mock.count_sound(SoundClip::Beep), 3);
    assert_eq!(mock.count_sound(SoundClip::Armed), 1);
    assert_eq!(mock.last_code_text().as_deref(), Some(messages::PROMPT));
    assert!(mock.saw_event(&PanelEvent::ModeChanged {
        from: Mode::Disarmed,
        to: Mode::Armed
    }));
}

#[test]
fn cancel_leaves_mode_and_no_timers() {
    let (mut svc, mock) = panel(slow_arm_timings());
    svc.request(Mode::Disarmed, CODE).unwrap();
    svc.request(Mode::Armed, CODE).unwrap();

    assert_eq!(
        svc.cancel_pending_arm(),
        Ok(Outcome::ArmingCancelled { target: Mode::Armed })
    );
    assert_eq!(svc.mode(), Mode::Disarmed);
    assert_eq!(svc.arming_target(), None);
    assert!(!svc.is_alarm_active());
    assert!(mock.showed_code_text(messages::ARMING_CANCELLED));

    std::thread::sleep(Duration::from_millis(50));
    svc.poll();
    assert_eq!(svc.mode(), Mode::Disarmed);
    assert_eq!(mock.count_sound(SoundClip::Armed), 0);
    svc.shutdown();
}

#[test]
fn disarm_during_countdown_cancels_it() {
    let (mut svc, _mock) = panel(slow_arm_timings());
    svc.request(Mode::Home, CODE).unwrap();
    svc.request(Mode::Cctv, CODE).unwrap();

    assert_eq!(
        svc.request(Mode::Disarmed, CODE),
        Ok(Outcome::ArmingCancelled { target: Mode::Cctv })
    );
    assert_eq!(svc.mode(), Mode::Home);
    assert_eq!(svc.arming_target(), None);
    svc.shutdown();
}

#[test]
fn wrong_code_does_not_cancel_countdown() {
    let (mut svc, _mock) = panel(slow_arm_timings());
    svc.request(Mode::Disarmed, CODE).unwrap();
    svc.request(Mode::Armed, CODE).unwrap();

    assert_eq!(
        svc.request(Mode::Disarmed, "1111"),
        Err(PanelError::IncorrectCode {
            attempts_remaining: None
        })
    );
    assert_eq!(svc.arming_target(), Some(Mode::Armed));
    svc.shutdown();
}

#[test]
fn new_arm_request_replaces_pending_one() {
    let (mut svc, mock) = panel(slow_arm_timings());
    svc.request(Mode::Disarmed, CODE).unwrap();
    svc.request(Mode::Armed, CODE).unwrap();
    svc.request(Mode::Cctv, CODE).unwrap();
    assert_eq!(svc.arming_target(), Some(Mode::Cctv));
    assert_eq!(
        mock.count_events(|e| matches!(e, PanelEvent::ArmingStarted { .. })),
        2
    );
    svc.cancel_pending_arm().unwrap();
    assert_eq!(svc.mode(), Mode::Disarmed);
}

#[test]
fn cancel_without_countdown_fails() {
    let (mut svc, _mock) = panel(fast_timings());
    svc.request(Mode::Home, CODE).unwrap();
    assert_eq!(svc.cancel_pending_arm(), Err(PanelError::NoPendingArm));
}

#[test]
fn home_stops_a_running_alarm() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Armed, CODE).unwrap();
    for _ in 0..3 {
        let _ = svc.request(Mode::Armed, "0000");
    }
    assert!(svc.is_alarm_active());

    assert_eq!(
        svc.request(Mode::Home, CODE),
        Ok(Outcome::Transitioned {
            from: Mode::Armed,
            to: Mode::Home
        })
    );
    assert!(!svc.is_alarm_active());
    assert_eq!(svc.mode(), Mode::Home);
    assert_eq!(svc.lockout_failures(), 0);
    assert!(mock.saw_event(&PanelEvent::AlarmStopped));

    let played = mock.count_sound(SoundClip::Alarm);
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(mock.count_sound(SoundClip::Alarm), played);
}

#[test]
fn home_during_countdown_silences_lockout_alarm() {
    let (mut svc, mock) = panel(slow_arm_timings());
    svc.request(Mode::Armed, CODE).unwrap();
    for _ in 0..3 {
        let _ = svc.request(Mode::Armed, "0000");
    }
    assert!(svc.is_alarm_active());
    svc.request(Mode::Cctv, CODE).unwrap();
    assert_eq!(svc.arming_target(), Some(Mode::Cctv));
    assert!(svc.is_alarm_active());

    assert_eq!(
        svc.request(Mode::Home, CODE),
        Ok(Outcome::ArmingCancelled { target: Mode::Cctv })
    );
    assert_eq!(svc.mode(), Mode::Armed);
    assert_eq!(svc.arming_target(), None);
    assert!(!svc.is_alarm_active());
    assert!(mock.saw_event(&PanelEvent::AlarmStopped));

    let played = mock.count_sound(SoundClip::Alarm);
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(mock.count_sound(SoundClip::Alarm), played);
    svc.shutdown();
}

#[test]
fn disarm_during_countdown_silences_emergency_alarm() {
    let (mut svc, _mock) = panel(slow_arm_timings());
    svc.request(Mode::Emergency, "").unwrap();
    svc.request(Mode::Armed, CODE).unwrap();
    assert!(svc.is_alarm_active());

    assert_eq!(
        svc.request(Mode::Disarmed, CODE),
        Ok(Outcome::ArmingCancelled { target: Mode::Armed })
    );
    assert_eq!(svc.mode(), Mode::Emergency);
    assert!(!svc.is_alarm_active());
    svc.shutdown();
}

#[test]
fn emergency_ignores_the_code() {
    for code in ["", "0000", CODE] {
        let (mut svc, mock) = panel(fast_timings());
        svc.request(Mode::Home, CODE).unwrap();

        assert_eq!(
            svc.request(Mode::Emergency, code),
            Ok(Outcome::Transitioned {
                from: Mode::Home,
                to: Mode::Emergency
            })
        );
        assert_eq!(svc.mode(), Mode::Emergency);
        assert!(svc.is_alarm_active());
        assert!(mock.saw_event(&PanelEvent::AlarmStarted(AlarmReason::Emergency)));
        assert_eq!(mock.alert_count(), 1);
        assert!(mock.alerts.lock().unwrap()[0].contains("System was in EMERGENCY"));
        svc.shutdown();
        assert!(!svc.is_alarm_active());
    }
}

#[test]
fn emergency_reentry_keeps_a_single_alarm() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Emergency, "").unwrap();
    assert_eq!(
        svc.request(Mode::Emergency, ""),
        Ok(Outcome::AlreadyInMode(Mode::Emergency))
    );
    assert_eq!(
        mock.count_events(|e| matches!(e, PanelEvent::AlarmStarted(_))),
        1
    );
    svc.shutdown();
}

#[test]
fn emergency_cancels_a_pending_arm() {
    let (mut svc, _mock) = panel(slow_arm_timings());
    svc.request(Mode::Disarmed, CODE).unwrap();
    svc.request(Mode::Armed, CODE).unwrap();
    svc.request(Mode::Emergency, "").unwrap();
    assert_eq!(svc.arming_target(), None);
    assert_eq!(svc.mode(), Mode::Emergency);
    svc.shutdown();
}

#[test]
fn silent_has_no_alarm() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Disarmed, CODE).unwrap();
    assert_eq!(
        svc.request(Mode::Silent, "whatever"),
        Ok(Outcome::Transitioned {
            from: Mode::Disarmed,
            to: Mode::Silent
        })
    );
    assert!(!svc.is_alarm_active());
    assert_eq!(mock.count_sound(SoundClip::Alarm), 0);
    assert_eq!(mock.alert_count(), 1);
}

#[test]
fn cctv_twice_is_already_in_mode() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Cctv, CODE).unwrap();

    for _ in 0..2 {
        assert_eq!(
            svc.request(Mode::Cctv, CODE),
            Ok(Outcome::AlreadyInMode(Mode::Cctv))
        );
        assert_eq!(svc.arming_target(), None);
    }
    assert!(mock.showed_code_text("System is already in CCTV mode!"));
    assert_eq!(
        mock.count_events(|e| matches!(e, PanelEvent::ArmingStarted { .. })),
        0
    );
    svc.shutdown();
}

#[test]
fn armed_home_armed_repeats_the_countdown() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Armed, CODE).unwrap();

    for cycle in 1..=2 {
        svc.request(Mode::Home, CODE).unwrap();
        assert_eq!(svc.lockout_failures(), 0);

        assert_eq!(
            svc.request(Mode::Armed, CODE),
            Ok(Outcome::ArmingStarted { target: Mode::Armed })
        );
        assert_eq!(svc.lockout_failures(), 0);
        assert!(wait_until(&mut svc, Duration::from_secs(2), |s| s.mode() == Mode::Armed));

        assert_eq!(mock.count_sound(SoundClip::Beep), 3 * cycle);
        assert_eq!(mock.count_sound(SoundClip::Armed), cycle);
    }
}

#[test]
fn keypad_submit_drives_requests() {
    let (mut svc, mock) = panel(fast_timings());
    for k in CODE.chars() {
        svc.press_key(k).unwrap();
    }
    assert_eq!(mock.last_code_text().as_deref(), Some("Enter Code: *****"));
    svc.submit(Mode::Home).unwrap();
    assert_eq!(svc.mode(), Mode::Home);
    assert_eq!(svc.input_len(), 0);

    assert_eq!(svc.submit(Mode::Disarmed), Err(PanelError::CodeRequired));
    svc.shutdown();
}

#[test]
fn startup_cannot_be_requested() {
    let (mut svc, _mock) = panel(fast_timings());
    assert_eq!(
        svc.request(Mode::Startup, CODE),
        Err(PanelError::InvalidTarget(Mode::Startup))
    );
    assert_eq!(svc.mode(), Mode::Startup);
}
