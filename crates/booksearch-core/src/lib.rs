//! Incremental search controller
//!
//! Architecture:
//! - Presentation layer: forwards keystrokes and selections, reads state back
//! - [`SearchController`]: single-threaded owner of query, results and selection
//! - Worker threads: own the [`SearchService`] and run the blocking calls
//! - Communication via mpsc channels (requests -> workers, tagged responses <- workers)
//!
//! Data flow:
//! ```text
//! keystroke -> normalize -> DebounceGate -> (quiescent) issue #seq -> search worker
//!                                                                        |
//! results <- accept #seq (stale #seq dropped) <--------------------------+
//! ```

pub mod config;
pub mod controller;
pub mod debounce;
pub mod detail;
pub mod error;
pub mod highlight;
pub mod query;
pub mod sequencer;
pub mod service;
pub mod worker;

pub use config::{Config, SearchSettings};
pub use controller::{EmptyState, ResponseOutcome, SearchController};
pub use debounce::DebounceGate;
pub use detail::{DetailLoader, DetailState};
pub use error::{ConfigError, ServiceError};
pub use highlight::{Highlighter, Segment, highlight};
pub use query::{is_searchable, normalize};
pub use sequencer::{PendingRequest, RequestSequencer};
pub use service::{DetailRecord, HttpSearchService, Match, RecordId, SearchService};
pub use worker::{
    ControllerChannels, DetailRequest, DetailResponse, SearchRequest, SearchResponse,
    WorkerChannels, channels, spawn_workers,
};
