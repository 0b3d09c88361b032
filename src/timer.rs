use std::fmt;

use crate::clock::Timestamp;

/// Identifies one play-through, from `start` to its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The scheduled "turn ready" transition for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub session: SessionId,
    pub due: Timestamp,
}

impl PendingTimer {
    pub fn is_due(&self, now: Timestamp) -> bool {
        now >= self.due
    }
}

/// Owner of the single outstanding timer.
///
/// A timer only fires by being taken out of the slot, so anything cancelled
/// or replaced can never fire afterwards.
#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<PendingTimer>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is pending with `timer`, returning the replaced one
    pub fn schedule(&mut self, timer: PendingTimer) -> Option<PendingTimer> {
        let previous = self.cancel();
        self.pending = Some(timer);
        previous
    }

    /// Drop the pending timer, if any. Safe to call repeatedly.
    pub fn cancel(&mut self) -> Option<PendingTimer> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&PendingTimer> {
        self.pending.as_ref()
    }

    /// The pending timer, if it has reached its due time
    pub fn due(&self, now: Timestamp) -> Option<&PendingTimer> {
        self.pending.as_ref().filter(|t| t.is_due(now))
    }

    /// Take the pending timer only if it belongs to `session`
    pub fn take_for(&mut self, session: SessionId) -> Option<PendingTimer> {
        match self.pending {
            Some(timer) if timer.session == session => self.pending.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(session: u64, due: u64) -> PendingTimer {
        PendingTimer {
            session: SessionId::new(session),
            due: Timestamp::from_millis(due),
        }
    }

    #[test]
    fn schedule_replaces_existing_timer() {
        let mut slot = TimerSlot::new();
        assert_eq!(slot.schedule(timer(1, 2_000)), None);
        assert_eq!(slot.schedule(timer(2, 3_000)), Some(timer(1, 2_000)));
        assert_eq!(slot.pending(), Some(&timer(2, 3_000)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut slot = TimerSlot::new();
        slot.schedule(timer(1, 2_000));

        assert!(slot.cancel().is_some());
        assert!(slot.cancel().is_none());
        assert!(slot.cancel().is_none());
        assert!(slot.pending().is_none());
    }

    #[test]
    fn due_only_after_deadline() {
        let mut slot = TimerSlot::new();
        slot.schedule(timer(1, 2_000));

        assert!(slot.due(Timestamp::from_millis(1_999)).is_none());
        assert!(slot.due(Timestamp::from_millis(2_000)).is_some());
        assert!(slot.due(Timestamp::from_millis(9_000)).is_some());
    }

    #[test]
    fn take_for_ignores_other_sessions() {
        let mut slot = TimerSlot::new();
        slot.schedule(timer(2, 2_000));

        assert_eq!(slot.take_for(SessionId::new(1)), None);
        assert!(slot.pending().is_some());
        assert_eq!(slot.take_for(SessionId::new(2)), Some(timer(2, 2_000)));
        assert_eq!(slot.take_for(SessionId::new(2)), None);
    }

    #[test]
    fn session_ids_advance() {
        let id = SessionId::new(1);
        assert_eq!(id.next(), SessionId::new(2));
        assert_eq!(id.to_string(), "#1");
    }
}
