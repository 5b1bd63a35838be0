//! Error types for orderable search.

use orderable_search_repository::UpstreamError;
use thiserror::Error;

/// A synchronization step failed. Nothing was retried and nothing was partially written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// An upstream call made by the synchronizer failed.
    #[error("{operation} failed: {source}")]
    Upstream {
        operation: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl SyncError {
    pub fn upstream(operation: &'static str, source: UpstreamError) -> Self {
        Self::Upstream { operation, source }
    }

    /// The step that failed, e.g. `catalog fetch` or `index write`.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Upstream { operation, .. } => operation,
        }
    }

    pub fn upstream_error(&self) -> &UpstreamError {
        match self {
            Self::Upstream { source, .. } => source,
        }
    }
}

/// A priced search could not be answered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// One of the upstream calls behind the search failed.
    #[error("Search upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// The index returned a hit that cannot be priced.
    #[error("Hit {object_id} cannot be priced: {reason}")]
    MalformedHit { object_id: String, reason: String },
}

impl SearchError {
    pub fn malformed_hit(object_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedHit {
            object_id: object_id.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while ingesting indexing jobs.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The job source failed.
    #[error("Consumer error: {0}")]
    ConsumerError(String),

    /// A job could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A job was decoded but names an unsupported trigger/action combination or lacks data.
    #[error("Invalid job: {0}")]
    InvalidJob(String),

    /// The synchronizer handling a job failed.
    #[error("Sync error: {0}")]
    SyncError(#[from] SyncError),

    /// Channel communication error.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl IngestError {
    /// Create a consumer error.
    pub fn consumer(msg: impl Into<String>) -> Self {
        Self::ConsumerError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an invalid job error.
    pub fn invalid_job(msg: impl Into<String>) -> Self {
        Self::InvalidJob(msg.into())
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::ConsumerError(err.to_string())
    }
}
