//! Lockout escalation through the panel service.

use bluess::app::events::{AlarmReason, PanelEvent};
use bluess::app::messages;
use bluess::app::ports::SoundClip;
use bluess::error::PanelError;
use bluess::fsm::Mode;
use bluess::fsm::lockout::LockoutPolicy;

use super::mock_hw::{CODE, MockPanel, config, fast_timings, panel};

#[test]
fn three_wrong_codes_while_armed_trip_the_alarm() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Armed, CODE).unwrap();

    assert_eq!(
        svc.request(Mode::Armed, "0000"),
        Err(PanelError::IncorrectCode {
            attempts_remaining: Some(2)
        })
    );
    assert_eq!(svc.lockout_failures(), 1);
    assert_eq!(
        svc.request(Mode::Armed, "0000"),
        Err(PanelError::IncorrectCode {
            attempts_remaining: Some(1)
        })
    );
    assert!(!svc.is_alarm_active());
    assert_eq!(
        svc.request(Mode::Armed, "0000"),
        Err(PanelError::AlarmTriggered)
    );

    assert!(svc.is_alarm_active());
    assert_eq!(svc.lockout_failures(), 0);
    assert_eq!(svc.mode(), Mode::Armed);
    assert!(mock.saw_event(&PanelEvent::AlarmStarted(AlarmReason::Lockout)));
    assert!(mock.showed_code_text(messages::ALARM_TRIGGERED));
    assert!(mock.showed_code_text(&messages::incorrect_code(2)));

    let alerts = mock.alerts.lock().unwrap().clone();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].starts_with("BlueSS Alert! - Alarm was triggered on main console!"));
    assert!(alerts[0].contains("System was in ARMED"));

    svc.shutdown();
}

#[test]
fn further_failures_do_not_start_a_second_alarm() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Cctv, CODE).unwrap();
    for _ in 0..6 {
        let _ = svc.request(Mode::Home, "9");
    }
    assert!(svc.is_alarm_active());
    assert_eq!(
        mock.count_events(|e| matches!(e, PanelEvent::AlarmStarted(_))),
        1
    );
    svc.shutdown();
}

#[test]
fn failures_outside_armed_modes_are_not_counted() {
    let (mut svc, mock) = panel(fast_timings());
    svc.request(Mode::Home, CODE).unwrap();
    for _ in 0..5 {
        assert_eq!(
            svc.request(Mode::Armed, "0000"),
            Err(PanelError::IncorrectCode {
                attempts_remaining: None
            })
        );
    }
    assert_eq!(svc.lockout_failures(), 0);
    assert!(!svc.is_alarm_active());
    assert_eq!(mock.count_sound(SoundClip::Error), 5);
    assert_eq!(mock.alert_count(), 0);
    svc.shutdown();
}

#[test]
fn correct_code_resets_the_counter() {
    let (mut svc, _mock) = panel(fast_timings());
    svc.request(Mode::Armed, CODE).unwrap();
    let _ = svc.request(Mode::Home, "1");
    let _ = svc.request(Mode::Home, "1");
    assert_eq!(svc.lockout_failures(), 2);

    svc.request(Mode::Armed, CODE).unwrap();
    assert_eq!(svc.lockout_failures(), 0);

    let _ = svc.request(Mode::Home, "1");
    let _ = svc.request(Mode::Home, "1");
    assert!(!svc.is_alarm_active());
    svc.shutdown();
}

#[test]
fn custom_threshold_trips_on_first_failure() {
    let mock = std::sync::Arc::new(MockPanel::default());
    let mut svc = bluess::app::service::PanelService::new(&config(fast_timings()), mock.ports())
        .with_lockout(LockoutPolicy::with_threshold(1));
    svc.start();
    svc.request(Mode::Silent, "").unwrap();

    assert_eq!(
        svc.request(Mode::Home, "0000"),
        Err(PanelError::AlarmTriggered)
    );
    assert!(svc.is_alarm_active());
    assert_eq!(svc.mode(), Mode::Silent);
    svc.shutdown();
}
