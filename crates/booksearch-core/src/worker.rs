//! Background workers that own the search service
//!
//! The controller never blocks on the network. It sends sequenced requests over
//! a channel and drains tagged responses on its next tick. Each call runs
//! on its own thread so a slow stale request cannot hold up the live one.

use crate::error::ServiceError;
use crate::service::{DetailRecord, Match, RecordId, SearchService};
use log::debug;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Search sent to the search worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// Outcome of a search, tagged with the request it answers
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<Match>, ServiceError>,
    pub duration: Duration,
}

/// Request to fetch the full record behind a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub seq: u64,
    pub id: RecordId,
}

#[derive(Debug, Clone)]
pub struct DetailResponse {
    pub seq: u64,
    pub id: RecordId,
    pub result: Result<DetailRecord, ServiceError>,
}

/// Controller side of the worker channels
pub struct ControllerChannels {
    pub search_tx: Sender<SearchRequest>,
    pub search_rx: Receiver<SearchResponse>,
    pub detail_tx: Sender<DetailRequest>,
    pub detail_rx: Receiver<DetailResponse>,
}

/// Worker side of the worker channels
pub struct WorkerChannels {
    pub search_rx: Receiver<SearchRequest>,
    pub search_tx: Sender<SearchResponse>,
    pub detail_rx: Receiver<DetailRequest>,
    pub detail_tx: Sender<DetailResponse>,
}

/// Create both ends of the search and detail channels.
pub fn channels() -> (ControllerChannels, WorkerChannels) {
    let (search_req_tx, search_req_rx) = mpsc::channel::<SearchRequest>();
    let (search_resp_tx, search_resp_rx) = mpsc::channel::<SearchResponse>();
    let (detail_req_tx, detail_req_rx) = mpsc::channel::<DetailRequest>();
    let (detail_resp_tx, detail_resp_rx) = mpsc::channel::<DetailResponse>();

    (
        ControllerChannels {
            search_tx: search_req_tx,
            search_rx: search_resp_rx,
            detail_tx: detail_req_tx,
            detail_rx: detail_resp_rx,
        },
        WorkerChannels {
            search_rx: search_req_rx,
            search_tx: search_resp_tx,
            detail_rx: detail_req_rx,
            detail_tx: detail_resp_tx,
        },
    )
}

/// Spawn the search and detail workers. They exit once the controller is dropped.
pub fn spawn_workers(
    service: Arc<dyn SearchService>,
    channels: WorkerChannels,
) -> (JoinHandle<()>, JoinHandle<()>) {
    let search = spawn_search_worker(service.clone(), channels.search_rx, channels.search_tx);
    let detail = spawn_detail_worker(service, channels.detail_rx, channels.detail_tx);
    (search, detail)
}

/// Drain everything queued behind `first` and keep only the newest.
///
/// Skipped requests are never answered. They can only have been queued before
/// the newest one was issued, so the sequencer already treats them as stale.
fn latest<T: std::fmt::Debug>(first: T, rx: &Receiver<T>) -> T {
    let mut request = first;
    while let Ok(next) = rx.try_recv() {
        debug!("coalescing {:?}", request);
        request = next;
    }
    request
}

/// Dispatch searches, each on its own short-lived thread.
///
/// A superseded search that is still running never delays the one after it.
/// Its answer still arrives, and the sequencer drops it as stale.
pub fn spawn_search_worker(
    service: Arc<dyn SearchService>,
    request_rx: Receiver<SearchRequest>,
    response_tx: Sender<SearchResponse>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(request) = request_rx.recv() {
            let request = latest(request, &request_rx);
            let service = service.clone();
            let response_tx = response_tx.clone();
            thread::spawn(move || {
                let start = Instant::now();
                let result = service.search(&request.query);
                let duration = start.elapsed();

                debug!(
                    "search #{} '{}' finished in {:?}",
                    request.seq, request.query, duration
                );

                // The controller may be gone by now
                let _ = response_tx.send(SearchResponse {
                    seq: request.seq,
                    query: request.query,
                    result,
                    duration,
                });
            });
        }
    })
}

/// Dispatch detail loads the same way as searches.
pub fn spawn_detail_worker(
    service: Arc<dyn SearchService>,
    request_rx: Receiver<DetailRequest>,
    response_tx: Sender<DetailResponse>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(request) = request_rx.recv() {
            let request = latest(request, &request_rx);
            let service = service.clone();
            let response_tx = response_tx.clone();
            thread::spawn(move || {
                let result = service.fetch_detail(request.id);
                let _ = response_tx.send(DetailResponse {
                    seq: request.seq,
                    id: request.id,
                    result,
                });
            });
        }
    })
}
