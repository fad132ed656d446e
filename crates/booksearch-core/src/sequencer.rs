//! Request sequencing
//!
//! Every outgoing request is tagged with a strictly increasing sequence number.
//! Only the most recently issued request is live; a response is applied only
//! if it carries the live number, so a slow answer to an old query can never
//! overwrite the results of a newer one. Superseded requests are not aborted,
//! their responses are simply dropped on arrival.

use std::time::{Duration, Instant};

/// The single request whose response is still wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest<Q> {
    pub seq: u64,
    pub query: Q,
    pub issued_at: Instant,
}

impl<Q> PendingRequest<Q> {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.issued_at)
    }
}

#[derive(Debug, Clone)]
pub struct RequestSequencer<Q = String> {
    last_issued: u64,
    live: Option<PendingRequest<Q>>,
}

impl<Q> Default for RequestSequencer<Q> {
    fn default() -> Self {
        Self {
            last_issued: 0,
            live: None,
        }
    }
}

impl<Q> RequestSequencer<Q> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next sequence number and make it the live request.
    pub fn issue(&mut self, query: Q, now: Instant) -> u64 {
        self.last_issued += 1;
        self.live = Some(PendingRequest {
            seq: self.last_issued,
            query,
            issued_at: now,
        });
        self.last_issued
    }

    /// Yield `response` if `seq` is the live request, retiring it.
    ///
    /// Returns `None` for stale responses; the caller must leave its state
    /// untouched in that case.
    pub fn accept<T>(&mut self, seq: u64, response: T) -> Option<T> {
        match &self.live {
            Some(live) if live.seq == seq => {
                self.live = None;
                Some(response)
            }
            _ => None,
        }
    }

    /// Retire the live request without accepting anything.
    pub fn invalidate(&mut self) {
        self.live = None;
    }

    pub fn live(&self) -> Option<&PendingRequest<Q>> {
        self.live.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }
}
