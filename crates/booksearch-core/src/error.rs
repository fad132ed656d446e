use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure of a call to the remote search service.
///
/// Search failures are swallowed by the controller and degrade to an empty
/// result set; detail failures are surfaced through [`crate::DetailState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Network(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("record {0} not found")]
    NotFound(u64),

    #[error("{0} worker is not running")]
    WorkerGone(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
