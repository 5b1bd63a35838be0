//! Consumer module for orderable search.
//!
//! A consumer feeds indexing jobs into the orchestrator's channel until its source
//! is exhausted or shutdown is signalled.

mod line_consumer;
mod messages;

pub use line_consumer::LineConsumer;
pub use messages::{IndexingJob, JobAction, JobCommand, StreamMessage, TriggerType};

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use crate::errors::IngestError;

/// A source of indexing jobs.
#[async_trait]
pub trait Consumer: Send + Sync {
    /// Send every job to `sender`, then [`StreamMessage::End`].
    ///
    /// Returns early, without sending `End`, when `shutdown` fires.
    async fn run(
        &self,
        sender: mpsc::Sender<StreamMessage>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError>;
}
