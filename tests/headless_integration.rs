use std::cell::Cell;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use ding::history::{CsvSessionLog, NullLog};
use ding::notify::RecordingNotifier;
use ding::runtime::{
    FixedTicker, Runner, SessionEvent, SessionEventSource, SteppingClock, TestEventSource,
};
use ding::session::{CompletionKind, DingKind, SessionConfig};
use ding::timer::{SessionLoop, Timer};

// Headless integration using the session loop without a TTY or real time.
// The stepping clock advances a fixed amount per reading, so every run is deterministic.

/// Cancels once `ticks` waits have gone by.
struct CancelAfter {
    ticks: Cell<u32>,
}

impl SessionEventSource for CancelAfter {
    fn recv_timeout(&self, _timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        let left = self.ticks.get();
        if left == 0 {
            return Ok(SessionEvent::Cancel);
        }
        self.ticks.set(left - 1);
        Err(RecvTimeoutError::Timeout)
    }
}

fn fast_ticker() -> FixedTicker {
    FixedTicker::new(Duration::from_millis(1))
}

#[test]
fn headless_count_session_completes() {
    let config = SessionConfig::new(1.0)
        .unwrap()
        .quiet(true)
        .with_max_dings(2)
        .unwrap();
    let mut timer = Timer::new(config);

    let (_tx, es) = TestEventSource::channel();
    let clock = SteppingClock::new(0.1);
    let notifier = RecordingNotifier::new();
    let session = SessionLoop {
        runner: Runner::new(es, fast_ticker()),
        clock: &clock,
        notifier: &notifier,
        log: &NullLog,
        term_width: 80,
    };

    let mut out = Vec::new();
    let summary = session.run(&mut timer, &mut out).unwrap();

    assert_eq!(summary.completion, CompletionKind::MaxDingsReached);
    assert_eq!(summary.ding_count, 2);
    assert_eq!(
        notifier.events(),
        vec![
            DingKind::Regular,
            DingKind::Regular,
            DingKind::SessionComplete
        ]
    );

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("STOPWATCH"));
    assert!(text.contains("[2/2]"));
    assert!(text.contains("Session complete"));
    assert!(text.contains("Average interval:"));
}

#[test]
fn headless_countdown_stops_at_duration() {
    let config = SessionConfig::new(2.0)
        .unwrap()
        .with_duration("3s")
        .unwrap();
    let mut timer = Timer::new(config);

    let (_tx, es) = TestEventSource::channel();
    let clock = SteppingClock::new(0.1);
    let notifier = RecordingNotifier::new();
    let session = SessionLoop {
        runner: Runner::new(es, fast_ticker()),
        clock: &clock,
        notifier: &notifier,
        log: &NullLog,
        term_width: 80,
    };

    let mut out = Vec::new();
    let summary = session.run(&mut timer, &mut out).unwrap();

    assert_eq!(summary.completion, CompletionKind::DurationReached);
    assert!(summary.elapsed >= 3.0);
    assert_eq!(summary.ding_count, 1);
    assert_eq!(
        notifier.events(),
        vec![DingKind::Regular, DingKind::SessionComplete]
    );

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("COUNTDOWN"));
    assert!(text.contains("left"));
    assert!(text.contains("Session complete"));
}

#[test]
fn headless_cancel_reports_state_at_interrupt() {
    let config = SessionConfig::new(1.0).unwrap();
    let mut timer = Timer::new(config);

    let clock = SteppingClock::new(0.1);
    let notifier = RecordingNotifier::new();
    let session = SessionLoop {
        runner: Runner::new(
            CancelAfter {
                ticks: Cell::new(25),
            },
            fast_ticker(),
        ),
        clock: &clock,
        notifier: &notifier,
        log: &NullLog,
        term_width: 80,
    };

    let mut out = Vec::new();
    let summary = session.run(&mut timer, &mut out).unwrap();

    // 26 ticks rendered, the 27th reading is taken at cancellation
    assert_eq!(summary.completion, CompletionKind::UserCancelled);
    assert_eq!(summary.ding_count, 2);
    assert!((summary.elapsed - 2.7).abs() < 1e-9);
    // no completion sound for an interrupt
    assert_eq!(notifier.events(), vec![DingKind::Regular, DingKind::Regular]);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("STOPPED"));
    assert!(text.contains("Final time: 00:02.7"));
    assert!(text.contains("Total dings: 2"));
}

#[test]
fn headless_milestone_fires_once() {
    let config = SessionConfig::new(1.0)
        .unwrap()
        .with_milestones(true)
        .with_max_dings(12)
        .unwrap();
    let mut timer = Timer::new(config);

    let (_tx, es) = TestEventSource::channel();
    let clock = SteppingClock::new(0.5);
    let notifier = RecordingNotifier::new();
    let session = SessionLoop {
        runner: Runner::new(es, fast_ticker()),
        clock: &clock,
        notifier: &notifier,
        log: &NullLog,
        term_width: 80,
    };

    let summary = session.run(&mut timer, &mut Vec::<u8>::new()).unwrap();

    let events = notifier.events();
    let milestones: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, k)| matches!(k, DingKind::Milestone(_)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(milestones, vec![9]);
    assert_eq!(events[9], DingKind::Milestone(10));
    assert_eq!(events.len(), 13);
    assert_eq!(events.last(), Some(&DingKind::SessionComplete));
    assert_eq!(summary.milestones, vec![10]);
}

#[test]
fn headless_session_is_logged_once() {
    let dir = tempfile::tempdir().unwrap();
    let log = CsvSessionLog::with_path(dir.path().join("ding-log.csv"));

    let config = SessionConfig::new(0.5)
        .unwrap()
        .with_task("log-test-session")
        .with_max_dings(1)
        .unwrap();
    let mut timer = Timer::new(config);

    let (_tx, es) = TestEventSource::channel();
    let clock = SteppingClock::new(0.25);
    let notifier = RecordingNotifier::new();
    let session = SessionLoop {
        runner: Runner::new(es, fast_ticker()),
        clock: &clock,
        notifier: &notifier,
        log: &log,
        term_width: 80,
    };
    session.run(&mut timer, &mut Vec::<u8>::new()).unwrap();

    let content = std::fs::read_to_string(log.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "date,task,elapsed_seconds,dings,interval_seconds");
    assert!(lines[1].ends_with(",log-test-session,0.8,1,0.5"), "{}", lines[1]);
}
