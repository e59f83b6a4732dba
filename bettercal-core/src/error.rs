//! Error types for the bettercal crates.

use thiserror::Error;

/// Errors that can occur while loading datasets or talking to TISS.
#[derive(Error, Debug)]
pub enum BetterCalError {
    #[error("Dataset resource '{path}' unreadable: {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset '{path}': {reason}")]
    DatasetFormat { path: String, reason: String },

    #[error("TISS rejected the request (status {0})")]
    UpstreamRejected(u16),

    #[error("Could not reach TISS: {0}")]
    UpstreamUnreachable(String),

    #[error("Response is not an iCalendar document: {0}")]
    NotACalendar(String),
}

/// Result type alias for bettercal operations.
pub type BetterCalResult<T> = Result<T, BetterCalError>;
