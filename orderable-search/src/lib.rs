//! # Orderable Search
//!
//! Keeps the orderable products search index in step with the catalog and
//! supplier services, and prices search hits for the customer asking.
//!
//! ## Architecture
//!
//! Indexing follows the Consumer-Dispatcher-Synchronizer pattern:
//!
//! 1. **Consumer**: Receives indexing jobs (newline-delimited JSON on stdin)
//! 2. **Dispatcher**: Validates a job and routes it to a synchronizer
//! 3. **Synchronizers**: Rebuild and write index documents
//! 4. **Orchestrator**: Coordinates the job flow and reports progress
//!
//! Searching goes through the [`search::SearchProxy`], which applies customer and
//! group price adjustments to every hit.
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: Indexing job sources
//! - [`dispatcher`]: Routes indexing jobs to synchronizers
//! - [`processor`]: Document building and price resolution, both free of I/O
//! - [`synchronizer`]: Single-offering and catalog fan-out synchronization
//! - [`search`]: Customer-priced search
//! - [`orchestrator`]: Coordinates the job flow
//! - [`errors`]: Error types

pub mod config;
pub mod consumer;
pub mod dispatcher;
pub mod errors;
pub mod orchestrator;
pub mod processor;
pub mod search;
pub mod synchronizer;

pub use config::Dependencies;
pub use errors::{IngestError, SearchError, SyncError};

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
