use log::{debug, info};
use std::time::Duration;

use crate::celebration::{CelebrationOverlay, NEON_PALETTE};
use crate::clock::Timestamp;
use crate::delay::DelaySource;
use crate::timer::{PendingTimer, SessionId, TimerSlot};

/// How long it takes to provision a Postgres database, the time to beat
pub const REFERENCE_LATENCY: Duration = Duration::from_millis(500);

/// How long the celebration stays on screen after a win
pub const CELEBRATION_DURATION: Duration = Duration::from_millis(5_000);

pub const WIN_MESSAGE: &str =
    "Impressive! Your reflexes beat Neon's average database provisioning time.";
pub const TRY_AGAIN_MESSAGE: &str =
    "Don't feel bad - Neon's Postgres provisioning time is fast. Try it yourself with a free account";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum GameState {
    Idle,
    Waiting,
    Ready,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Win,
    TryAgain,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Win => WIN_MESSAGE,
            Verdict::TryAgain => TRY_AGAIN_MESSAGE,
        }
    }
}

/// Time between the square turning green and the player's click
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReactionTime(Duration);

impl ReactionTime {
    pub fn new(elapsed: Duration) -> Self {
        Self(elapsed)
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub fn as_millis(&self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }

    /// Only strictly faster than the reference counts as a win
    pub fn verdict(&self) -> Verdict {
        if self.0 < REFERENCE_LATENCY {
            Verdict::Win
        } else {
            Verdict::TryAgain
        }
    }
}

/// One play-through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub started_at: Timestamp,
    /// When the square actually turned green
    pub ready_at: Option<Timestamp>,
    pub reaction_time: Option<ReactionTime>,
}

impl Session {
    fn new(id: SessionId, started_at: Timestamp) -> Self {
        Self {
            id,
            started_at,
            ready_at: None,
            reaction_time: None,
        }
    }
}

/// The reaction game state machine.
///
/// Every input takes the current time explicitly and is processed to
/// completion. Inputs that don't apply to the current state are ignored and
/// reported as `false`.
#[derive(Debug)]
pub struct ReactionGame<D: DelaySource, O: CelebrationOverlay> {
    state: GameState,
    session: Option<Session>,
    timer: TimerSlot,
    next_session: SessionId,
    delays: D,
    overlay: O,
}

impl<D: DelaySource, O: CelebrationOverlay> ReactionGame<D, O> {
    pub fn new(delays: D, overlay: O) -> Self {
        Self {
            state: GameState::Idle,
            session: None,
            timer: TimerSlot::new(),
            next_session: SessionId::new(1),
            delays,
            overlay,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn pending_timer(&self) -> Option<&PendingTimer> {
        self.timer.pending()
    }

    /// When the event loop next needs to call [`poll`](Self::poll)
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timer.pending().map(|t| t.due)
    }

    pub fn reaction_time(&self) -> Option<ReactionTime> {
        self.session.as_ref().and_then(|s| s.reaction_time)
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.reaction_time().map(|rt| rt.verdict())
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut O {
        &mut self.overlay
    }

    /// Begin a session: the square turns green after a random delay
    pub fn start(&mut self, now: Timestamp) -> bool {
        if self.state != GameState::Idle {
            debug!("start ignored in state {}", self.state);
            return false;
        }

        let id = self.next_session;
        self.next_session = id.next();

        let delay = self.delays.next_delay();
        let due = now + delay;
        self.timer.schedule(PendingTimer { session: id, due });
        self.session = Some(Session::new(id, now));
        self.state = GameState::Waiting;

        info!(
            "session {} started, ready in {} ms",
            id,
            delay.as_millis()
        );
        true
    }

    /// The player pressed the click region
    pub fn click(&mut self, now: Timestamp) -> bool {
        match self.state {
            GameState::Waiting => {
                self.timer.cancel();
                if let Some(session) = self.session.take() {
                    info!("session {} clicked too early", session.id);
                }
                self.state = GameState::Idle;
                true
            }
            GameState::Ready => {
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                let Some(ready_at) = session.ready_at else {
                    return false;
                };

                // pressed while the square was still red, seen only after it turned
                if now < ready_at {
                    info!(
                        "session {} pressed {} ms before ready, too early",
                        session.id,
                        ready_at.saturating_duration_since(now).as_millis()
                    );
                    self.timer.cancel();
                    self.session = None;
                    self.state = GameState::Idle;
                    return true;
                }

                let reaction = ReactionTime::new(now.saturating_duration_since(ready_at));
                session.reaction_time = Some(reaction);
                self.state = GameState::Results;
                info!(
                    "session {} reacted in {} ms, {} ms after starting",
                    session.id,
                    reaction.as_millis(),
                    now.saturating_duration_since(session.started_at).as_millis()
                );

                if reaction.verdict() == Verdict::Win {
                    self.overlay
                        .show(now, CELEBRATION_DURATION, &NEON_PALETTE);
                }
                true
            }
            GameState::Idle | GameState::Results => {
                debug!("click ignored in state {}", self.state);
                false
            }
        }
    }

    /// The ready timer for `session` went off.
    ///
    /// Only the session's own, still pending timer can make the game ready;
    /// a cancelled or superseded timer is ignored.
    pub fn fire_timer(&mut self, session: SessionId, now: Timestamp) -> bool {
        if self.state != GameState::Waiting {
            debug!("timer for session {} ignored in state {}", session, self.state);
            return false;
        }
        if self.timer.take_for(session).is_none() {
            debug!("stale timer for session {} ignored", session);
            return false;
        }

        match self.session.as_mut() {
            Some(current) if current.id == session => {
                current.ready_at = Some(now);
                self.state = GameState::Ready;
                info!("session {} ready", session);
                true
            }
            _ => false,
        }
    }

    /// Fire the pending timer if it is due at `now`
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.timer.due(now).map(|t| t.session) {
            Some(session) => self.fire_timer(session, now),
            None => false,
        }
    }

    /// Back to a clean idle state, from any state
    pub fn reset(&mut self) -> bool {
        self.timer.cancel();
        self.overlay.hide();
        if let Some(session) = self.session.take() {
            debug!("session {} discarded", session.id);
        }
        let changed = self.state != GameState::Idle;
        self.state = GameState::Idle;
        changed
    }

    /// Release the timer and the overlay before the game goes away
    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.overlay.hide();
        self.session = None;
        self.state = GameState::Idle;
    }
}

impl<D: DelaySource, O: CelebrationOverlay> Drop for ReactionGame<D, O> {
    fn drop(&mut self) {
        self.teardown();
    }
}
