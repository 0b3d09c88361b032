use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

use crate::clock::{Clock, Timestamp};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum GameEvent {
    /// Key press, stamped when it was read from the terminal
    Key(KeyEvent, Timestamp),
    Mouse(MouseEvent, Timestamp),
    Resize(u16, u16),
    Tick,
}

impl GameEvent {
    /// When the input happened, for input events
    pub fn stamp(&self) -> Option<Timestamp> {
        match self {
            GameEvent::Key(_, at) | GameEvent::Mouse(_, at) => Some(*at),
            GameEvent::Resize(..) | GameEvent::Tick => None,
        }
    }
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source using crossterm.
///
/// Events are stamped on the reader thread as soon as they are read, so time
/// spent waiting in the channel doesn't count against the player.
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new<C: Clock>(clock: C) -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => GameEvent::Key(key, clock.now()),
                Ok(CtEvent::Mouse(mouse)) => GameEvent::Mouse(mouse, clock.now()),
                Ok(CtEvent::Resize(width, height)) => GameEvent::Resize(width, height),
                Ok(_) => continue,
                Err(err) => {
                    log::warn!("terminal event reader stopped: {}", err);
                    break;
                }
            };

            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
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
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> GameEvent {
        self.step_until(None)
    }

    /// Like [`step`](Self::step), but never waits longer than `remaining`.
    /// Used to wake up right when the ready timer is due.
    pub fn step_until(&self, remaining: Option<Duration>) -> GameEvent {
        let timeout = match remaining {
            Some(remaining) => remaining.min(self.ticker.interval()),
            None => self.ticker.interval(),
        };

        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => GameEvent::Tick,
        }
    }
}
