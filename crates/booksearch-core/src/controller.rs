//! Search controller: owns the visible search state
//!
//! State machine for one query stream:
//! ```text
//! Idle -> Debouncing -> Loading -> Settled
//!   ^                      |   \-> Stale-Discarded (no visible effect)
//!   +---- query cleared ---+
//! ```
//! Every handler runs to completion on the caller's thread. The only
//! suspension points are the debounce deadline and the outstanding request,
//! both of which are advanced by [`SearchController::tick`].

use crate::config::SearchSettings;
use crate::debounce::DebounceGate;
use crate::detail::{DetailLoader, DetailState};
use crate::error::ServiceError;
use crate::query::{is_searchable, normalize};
use crate::sequencer::RequestSequencer;
use crate::service::{DetailRecord, Match, SearchService};
use crate::worker::{
    ControllerChannels, SearchRequest, SearchResponse, channels, spawn_workers,
};
use log::{debug, warn};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

/// What to show in place of an empty result list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    Loading,
    NoResults,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::Loading => "Loading...",
            EmptyState::NoResults => "No results found",
        }
    }
}

/// How a search response was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    Stale,
}

pub struct SearchController {
    settings: SearchSettings,
    /// Raw input, exactly as typed
    query: String,
    gate: DebounceGate,
    sequencer: RequestSequencer,
    /// Replaced wholesale on every accepted response
    results: Vec<Match>,
    /// Query of the last successful response, for duplicate suppression
    settled_query: Option<String>,
    /// Highlighted row in `results`
    cursor: Option<usize>,
    selected: Option<Match>,
    last_error: Option<String>,
    last_duration: Option<Duration>,
    search_tx: Sender<SearchRequest>,
    search_rx: Receiver<SearchResponse>,
    detail: DetailLoader,
}

impl SearchController {
    pub fn new(settings: SearchSettings, channels: ControllerChannels) -> Self {
        Self {
            settings,
            query: String::new(),
            gate: DebounceGate::new(settings.debounce),
            sequencer: RequestSequencer::new(),
            results: Vec::new(),
            settled_query: None,
            cursor: None,
            selected: None,
            last_error: None,
            last_duration: None,
            search_tx: channels.search_tx,
            search_rx: channels.search_rx,
            detail: DetailLoader::new(channels.detail_tx, channels.detail_rx),
        }
    }

    /// Create a controller backed by worker threads calling `service`.
    pub fn spawn(settings: SearchSettings, service: Arc<dyn SearchService>) -> Self {
        let (controller_channels, worker_channels) = channels();
        spawn_workers(service, worker_channels);
        Self::new(settings, controller_channels)
    }

    pub fn on_input_change(&mut self, raw: &str) {
        self.on_input_change_at(raw, Instant::now());
    }

    /// Record the new input and arm the debounce gate, or clear everything
    /// synchronously when the query is not searchable.
    pub fn on_input_change_at(&mut self, raw: &str, now: Instant) {
        self.query = raw.to_string();

        let normalized = normalize(raw);
        if !is_searchable(&normalized, self.settings.min_query_len) {
            self.reset();
            return;
        }

        self.gate.schedule(normalized, now);
    }

    pub fn on_debounce_fire(&mut self, query: String) {
        self.on_debounce_fire_at(query, Instant::now());
    }

    /// Issue a sequenced search for `query` unless it would duplicate the
    /// live request or the results already on screen.
    pub fn on_debounce_fire_at(&mut self, query: String, now: Instant) {
        if self.is_duplicate(&query) {
            debug!("skipping duplicate search for '{}'", query);
            return;
        }

        let seq = self.sequencer.issue(query.clone(), now);
        debug!("issuing search #{} for '{}'", seq, query);

        let request = SearchRequest {
            seq,
            query: query.clone(),
        };
        if self.search_tx.send(request).is_err() {
            self.apply_search_response(SearchResponse {
                seq,
                query,
                result: Err(ServiceError::WorkerGone("search")),
                duration: Duration::ZERO,
            });
        }
    }

    pub fn on_select(&mut self, selected: Match) {
        self.on_select_at(selected, Instant::now());
    }

    /// Record the selection and hand it to the detail loader.
    pub fn on_select_at(&mut self, selected: Match, now: Instant) {
        match selected.record_id {
            Some(id) => self.detail.load(id, now),
            None => {
                debug!("'{}' has no record id, nothing to load", selected.original_entry);
                self.detail.clear();
            }
        }
        self.selected = Some(selected);
    }

    /// Select the match under the cursor, if any.
    pub fn select_cursor(&mut self) {
        if let Some(m) = self.cursor_match().cloned() {
            self.on_select(m);
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Advance timers and apply whatever the workers have answered.
    pub fn tick_at(&mut self, now: Instant) {
        if let Some(query) = self.gate.poll(now) {
            self.on_debounce_fire_at(query, now);
        }
        self.poll_responses();
        self.expire_overdue(now);
        self.detail.expire_overdue(now, self.settings.request_timeout);
    }

    /// Drain pending responses from both workers without blocking.
    pub fn poll_responses(&mut self) {
        while let Ok(response) = self.search_rx.try_recv() {
            self.apply_search_response(response);
        }
        self.detail.poll_responses();
    }

    /// Apply a search response if it answers the live request.
    ///
    /// Failures are swallowed here: they are logged, remembered for the status
    /// line and degrade to an empty, non-loading result set.
    pub fn apply_search_response(&mut self, response: SearchResponse) -> ResponseOutcome {
        let SearchResponse {
            seq,
            query,
            result,
            duration,
        } = response;

        let Some(result) = self.sequencer.accept(seq, result) else {
            debug!("discarding stale search #{} for '{}'", seq, query);
            return ResponseOutcome::Stale;
        };

        self.last_duration = Some(duration);
        match result {
            Ok(matches) => {
                debug!("search #{} for '{}': {} results", seq, query, matches.len());
                self.settled_query = Some(query);
                self.last_error = None;
                self.replace_results(matches);
            }
            Err(e) => {
                warn!("search for '{}' failed: {}", query, e);
                self.settled_query = None;
                self.last_error = Some(e.to_string());
                self.replace_results(Vec::new());
            }
        }
        ResponseOutcome::Applied
    }

    pub fn move_cursor_up(&mut self) {
        if let Some(current) = self.cursor {
            self.cursor = Some(current.saturating_sub(1));
        }
    }

    pub fn move_cursor_down(&mut self) {
        if let Some(current) = self.cursor {
            let max_index = self.results.len().saturating_sub(1);
            self.cursor = Some((current + 1).min(max_index));
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn cursor_match(&self) -> Option<&Match> {
        self.cursor.and_then(|i| self.results.get(i))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// True exactly while a live search request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.sequencer.is_live()
    }

    /// True while a keystroke is waiting for the input to go quiet.
    pub fn is_debouncing(&self) -> bool {
        self.gate.is_armed()
    }

    pub fn results(&self) -> &[Match] {
        &self.results
    }

    pub fn selected(&self) -> Option<&Match> {
        self.selected.as_ref()
    }

    pub fn detail(&self) -> &DetailState {
        self.detail.state()
    }

    pub fn detail_record(&self) -> Option<&DetailRecord> {
        self.detail.record()
    }

    /// Term to highlight in result labels
    pub fn highlight_term(&self) -> String {
        normalize(&self.query)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_duration(&self) -> Option<Duration> {
        self.last_duration
    }

    /// How long the event loop may sleep before the gate needs polling.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.gate.time_until_fire(now)
    }

    /// Message for an empty result list, or `None` if there is nothing to say.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.results.is_empty() {
            return None;
        }
        if self.is_loading() || self.is_debouncing() {
            return Some(EmptyState::Loading);
        }
        if self.highlight_term().is_empty() {
            return None;
        }
        Some(EmptyState::NoResults)
    }

    fn is_duplicate(&self, query: &str) -> bool {
        match self.sequencer.live() {
            Some(live) => live.query == query,
            None => self.settled_query.as_deref() == Some(query),
        }
    }

    fn replace_results(&mut self, matches: Vec<Match>) {
        self.cursor = if matches.is_empty() { None } else { Some(0) };
        self.results = matches;
    }

    /// Treat a request outstanding for longer than the timeout as failed.
    fn expire_overdue(&mut self, now: Instant) {
        let timeout = self.settings.request_timeout;
        let overdue = self
            .sequencer
            .live()
            .filter(|live| live.age(now) >= timeout)
            .map(|live| (live.seq, live.query.clone()));

        if let Some((seq, query)) = overdue {
            self.apply_search_response(SearchResponse {
                seq,
                query,
                result: Err(ServiceError::Timeout(timeout)),
                duration: timeout,
            });
        }
    }

    /// Back to Idle: nothing armed, nothing live, nothing shown.
    fn reset(&mut self) {
        self.gate.cancel();
        if let Some(live) = self.sequencer.live() {
            debug!("abandoning search #{} for '{}'", live.seq, live.query);
        }
        self.sequencer.invalidate();
        self.results = Vec::new();
        self.settled_query = None;
        self.cursor = None;
        self.selected = None;
        self.last_error = None;
        self.detail.clear();
    }
}
