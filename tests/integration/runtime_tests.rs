//! The threaded runtime: commands in, replies out, timers applied without
//! anyone polling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bluess::app::commands::{Outcome, PanelCommand};
use bluess::app::events::PanelEvent;
use bluess::app::service::PanelService;
use bluess::fsm::Mode;
use bluess::runtime;

use super::mock_hw::{CODE, DisplayCall, MockPanel, config, fast_timings};

#[test]
fn commands_round_trip_through_the_panel_thread() {
    let mock = Arc::new(MockPanel::default());
    let svc = PanelService::new(&config(fast_timings()), mock.ports());
    let mut panel = runtime::spawn(svc).unwrap();

    for k in CODE.chars() {
        let reply = panel.call(PanelCommand::Key(k)).unwrap();
        assert_eq!(reply.result, Ok(Outcome::Accepted));
    }
    let reply = panel.call(PanelCommand::Submit(Mode::Disarmed)).unwrap();
    assert_eq!(
        reply.result,
        Ok(Outcome::Transitioned {
            from: Mode::Startup,
            to: Mode::Disarmed
        })
    );
    assert_eq!(reply.status.mode, Mode::Disarmed);
    assert_eq!(reply.status.input_len, 0);

    panel.shutdown();
}

#[test]
fn countdown_commits_without_further_commands() {
    let mock = Arc::new(MockPanel::default());
    let svc = PanelService::new(&config(fast_timings()), mock.ports());
    let mut panel = runtime::spawn(svc).unwrap();

    panel
        .call(PanelCommand::Request {
            target: Mode::Home,
            code: CODE.to_string(),
        })
        .unwrap();
    let reply = panel
        .call(PanelCommand::Request {
            target: Mode::Armed,
            code: CODE.to_string(),
        })
        .unwrap();
    assert_eq!(reply.status.arming, Some(Mode::Armed));

    let committed = PanelEvent::ModeChanged {
        from: Mode::Home,
        to: Mode::Armed,
    };
    let deadline = Instant::now() + Duration::from_secs(2);
    while !mock.saw_event(&committed) && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(mock.saw_event(&committed));

    let status = panel.call(PanelCommand::Status).unwrap().status;
    assert_eq!(status.mode, Mode::Armed);
    assert_eq!(status.arming, None);
    panel.shutdown();
}

#[test]
fn shutdown_silences_the_alarm() {
    let mock = Arc::new(MockPanel::default());
    let svc = PanelService::new(&config(fast_timings()), mock.ports());
    let mut panel = runtime::spawn(svc).unwrap();

    let reply = panel
        .call(PanelCommand::Request {
            target: Mode::Emergency,
            code: String::new(),
        })
        .unwrap();
    assert!(reply.status.alarm_active);

    let reply = panel.call(PanelCommand::Shutdown).unwrap();
    assert!(!reply.status.alarm_active);
    assert!(mock.saw_event(&PanelEvent::AlarmStopped));
    assert_eq!(
        mock.display.lock().unwrap().last(),
        Some(&DisplayCall::Clear)
    );

    std::thread::sleep(Duration::from_millis(20));
    assert!(!panel.is_running());
    assert!(panel.call(PanelCommand::Status).is_none());
}

#[test]
fn call_right_after_shutdown_returns_none() {
    let mock = Arc::new(MockPanel::default());
    let svc = PanelService::new(&config(fast_timings()), mock.ports());
    let mut panel = runtime::spawn(svc).unwrap();

    assert!(panel.call(PanelCommand::Shutdown).is_some());
    // The thread may still be unwinding; the call must not wait forever.
    assert!(panel.call(PanelCommand::Status).is_none());
    assert!(!panel.is_running());
}
