//! Detail loading for the selected match
//!
//! Selection is a single user action, not a keystroke stream, so there is no
//! debouncing here. Overlapping loads still go through their own sequencer so
//! that the most recently started load is the one that sticks.

use crate::error::ServiceError;
use crate::sequencer::RequestSequencer;
use crate::service::{DetailRecord, RecordId};
use crate::worker::{DetailRequest, DetailResponse};
use log::{debug, warn};
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading {
        id: RecordId,
    },
    Loaded {
        id: RecordId,
        record: DetailRecord,
    },
    /// Failures are shown to the user rather than hidden
    Failed {
        id: RecordId,
        message: String,
    },
}

pub struct DetailLoader {
    sequencer: RequestSequencer<RecordId>,
    state: DetailState,
    request_tx: Sender<DetailRequest>,
    response_rx: Receiver<DetailResponse>,
}

impl DetailLoader {
    pub fn new(request_tx: Sender<DetailRequest>, response_rx: Receiver<DetailResponse>) -> Self {
        Self {
            sequencer: RequestSequencer::new(),
            state: DetailState::Idle,
            request_tx,
            response_rx,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn record(&self) -> Option<&DetailRecord> {
        match &self.state {
            DetailState::Loaded { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.sequencer.is_live()
    }

    /// Start loading `id`, superseding any load still in flight.
    pub fn load(&mut self, id: RecordId, now: Instant) {
        let seq = self.sequencer.issue(id, now);
        debug!("loading detail #{} for record {}", seq, id);
        self.state = DetailState::Loading { id };

        if self.request_tx.send(DetailRequest { seq, id }).is_err() {
            self.finish(id, Err(ServiceError::WorkerGone("detail")));
        }
    }

    /// Apply a worker response. Returns false if it was stale and ignored.
    pub fn apply(&mut self, response: DetailResponse) -> bool {
        let DetailResponse { seq, id, result } = response;
        match self.sequencer.accept(seq, result) {
            Some(result) => {
                self.state_from(id, result);
                true
            }
            None => {
                debug!("dropping stale detail #{} for record {}", seq, id);
                false
            }
        }
    }

    /// Drain pending responses from the detail worker.
    pub fn poll_responses(&mut self) {
        while let Ok(response) = self.response_rx.try_recv() {
            self.apply(response);
        }
    }

    /// Fail the live load if it has been outstanding longer than `timeout`.
    pub fn expire_overdue(&mut self, now: Instant, timeout: Duration) {
        let overdue = self
            .sequencer
            .live()
            .filter(|live| live.age(now) >= timeout)
            .map(|live| live.query);

        if let Some(id) = overdue {
            self.finish(id, Err(ServiceError::Timeout(timeout)));
        }
    }

    /// Forget the current record and ignore any load still in flight.
    pub fn clear(&mut self) {
        self.sequencer.invalidate();
        self.state = DetailState::Idle;
    }

    fn finish(&mut self, id: RecordId, result: Result<DetailRecord, ServiceError>) {
        self.sequencer.invalidate();
        self.state_from(id, result);
    }

    fn state_from(&mut self, id: RecordId, result: Result<DetailRecord, ServiceError>) {
        self.state = match result {
            Ok(record) => DetailState::Loaded { id, record },
            Err(e) => {
                warn!("detail for record {} failed: {}", id, e);
                DetailState::Failed {
                    id,
                    message: e.to_string(),
                }
            }
        };
    }
}
