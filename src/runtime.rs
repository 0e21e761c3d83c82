use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::debug;

use crate::scheduler::TickId;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum PomoEvent {
    Key(KeyEvent),
    Resize,
    /// One elapsed second from the armed ticker with this id
    Tick(TickId),
}

/// Source of app events (keyboard, resize, ticks)
pub trait PomoEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError>;
}

/// Create the channel every producer (terminal reader, tick scheduler) feeds into
pub fn event_channel() -> (Sender<PomoEvent>, Receiver<PomoEvent>) {
    mpsc::channel()
}

/// Production event source: forwards crossterm input into the shared channel
pub struct CrosstermEventSource {
    rx: Receiver<PomoEvent>,
}

impl CrosstermEventSource {
    /// Spawn the terminal reader thread writing into `tx`; events are read back from `rx`
    pub fn new(tx: Sender<PomoEvent>, rx: Receiver<PomoEvent>) -> Self {
        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => tx.send(PomoEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => tx.send(PomoEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    debug!(%err, "terminal reader stopped");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl PomoEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
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

    /// One tick per wall-clock second
    pub fn seconds() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<PomoEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<PomoEvent>) -> Self {
        Self { rx }
    }
}

impl PomoEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Outcome of one runner step
#[derive(Clone, Debug)]
pub enum Step {
    Event(PomoEvent),
    /// Nothing arrived within the poll interval
    Idle,
    /// Every producer hung up
    Closed,
}

/// Runner that advances the application one event at a time
pub struct Runner<E: PomoEventSource, T: Ticker> {
    event_source: E,
    poll: T,
}

impl<E: PomoEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, poll: T) -> Self {
        Self { event_source, poll }
    }

    /// Blocks up to the poll interval and returns the next event
    pub fn step(&self) -> Step {
        match self.event_source.recv_timeout(self.poll.interval()) {
            Ok(ev) => Step::Event(ev),
            Err(RecvTimeoutError::Timeout) => Step::Idle,
            Err(RecvTimeoutError::Disconnected) => Step::Closed,
        }
    }
}
