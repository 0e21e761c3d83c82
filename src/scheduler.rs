use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::runtime::{PomoEvent, Ticker};

/// Generation tag carried by every tick so that ticks queued by a ticker
/// that has since been cancelled can be told apart from live ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickId(u64);

/// A live recurring tick thread. Dropping it stops the thread and waits for it.
#[derive(Debug)]
struct ArmedTicker {
    id: TickId,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ArmedTicker {
    fn spawn<T: Ticker + Clone>(id: TickId, ticker: T, tx: Sender<PomoEvent>) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(ticker.interval()) {
                Err(RecvTimeoutError::Timeout) => {
                    if tx.send(PomoEvent::Tick(id)).is_err() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        Self {
            id,
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for ArmedTicker {
    fn drop(&mut self) {
        // hanging up the stop channel wakes the thread immediately
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(id = self.id.0, "tick thread panicked");
            }
        }
    }
}

/// Owns at most one recurring ticker and keeps it in step with whether the
/// timer should be counting down.
pub struct TickScheduler<T: Ticker + Clone> {
    ticker: T,
    tx: Sender<PomoEvent>,
    armed: Option<ArmedTicker>,
    next_id: u64,
}

impl<T: Ticker + Clone> TickScheduler<T> {
    pub fn new(ticker: T, tx: Sender<PomoEvent>) -> Self {
        Self {
            ticker,
            tx,
            armed: None,
            next_id: 0,
        }
    }

    /// Arm or disarm so that ticks flow exactly while `should_run` holds.
    /// Returns true if anything changed.
    pub fn sync(&mut self, should_run: bool) -> bool {
        match (should_run, self.armed.is_some()) {
            (true, false) => {
                self.arm();
                true
            }
            (false, true) => {
                self.disarm();
                true
            }
            _ => false,
        }
    }

    /// Drop any current ticker and start a fresh one
    pub fn arm(&mut self) -> TickId {
        self.disarm();

        let id = TickId(self.next_id);
        self.next_id += 1;
        self.armed = Some(ArmedTicker::spawn(id, self.ticker.clone(), self.tx.clone()));
        debug!(id = id.0, "armed ticker");
        id
    }

    pub fn disarm(&mut self) {
        if let Some(armed) = self.armed.take() {
            debug!(id = armed.id.0, "disarming ticker");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn current(&self) -> Option<TickId> {
        self.armed.as_ref().map(|armed| armed.id)
    }

    /// Only ticks from the currently armed ticker may advance the timer
    pub fn accepts(&self, id: TickId) -> bool {
        self.current() == Some(id)
    }
}
