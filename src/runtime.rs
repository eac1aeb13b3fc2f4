use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// Unified event type consumed by the session loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Cancel,
    Tick,
}

/// Source of out-of-band session events (interrupts)
pub trait SessionEventSource {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError>;
}

/// Production event source fed by the Ctrl+C handler
pub struct InterruptEventSource {
    rx: Receiver<SessionEvent>,
}

impl InterruptEventSource {
    /// Install the process-wide SIGINT handler. Can only succeed once per process.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let (tx, rx) = mpsc::channel();

        ctrlc::set_handler(move || {
            if tx.send(SessionEvent::Cancel).is_err() {
                tracing::debug!("interrupt received after the session loop exited");
            }
        })?;

        Ok(Self { rx })
    }
}

impl SessionEventSource for InterruptEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<SessionEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<SessionEvent>) -> Self {
        Self { rx }
    }

    /// Convenience constructor returning the sending half alongside the source.
    pub fn channel() -> (Sender<SessionEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }
}

impl SessionEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that paces the session loop one tick at a time
pub struct Runner<E: SessionEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: SessionEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout.
    /// An event cuts the wait short.
    pub fn step(&self) -> SessionEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => SessionEvent::Tick,
            // nobody can cancel any more; keep the cadence
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(self.ticker.interval());
                SessionEvent::Tick
            }
        }
    }
}

/// Seconds elapsed since the session started
pub trait Clock {
    fn elapsed(&self) -> f64;
}

/// Monotonic clock anchored at construction
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Deterministic clock for tests: the n-th reading is `n * step`
#[derive(Debug)]
pub struct SteppingClock {
    readings: Cell<u64>,
    step: f64,
}

impl SteppingClock {
    pub fn new(step: f64) -> Self {
        Self {
            readings: Cell::new(0),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn elapsed(&self) -> f64 {
        let n = self.readings.get() + 1;
        self.readings.set(n);
        n as f64 * self.step
    }
}
