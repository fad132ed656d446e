//! Debounce gate for outgoing searches
//!
//! The gate is a single owned deadline rather than a timer thread: the event
//! loop polls it, so re-arming simply overwrites the previous deadline and the
//! superseded query can never fire.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Armed {
    query: String,
    deadline: Instant,
}

/// Collapses a burst of scheduled queries into one fire carrying the last query.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    delay: Duration,
    armed: Option<Armed>,
}

impl DebounceGate {
    pub fn new(delay: Duration) -> Self {
        Self { delay, armed: None }
    }

    /// Arm the gate for `query`, replacing whatever was armed before.
    pub fn schedule(&mut self, query: impl Into<String>, now: Instant) {
        self.armed = Some(Armed {
            query: query.into(),
            deadline: now + self.delay,
        });
    }

    /// Disarm the gate. Safe to call when nothing is armed.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Returns the armed query once its deadline has passed, disarming the gate.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.armed {
            Some(armed) if now >= armed.deadline => self.armed.take().map(|a| a.query),
            _ => None,
        }
    }

    /// Time left before the armed query fires (zero if already due)
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.armed
            .as_ref()
            .map(|a| a.deadline.saturating_duration_since(now))
    }
}
