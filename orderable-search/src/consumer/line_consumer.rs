//! Newline-delimited JSON job consumer.
//!
//! Reads one indexing job per line from any async reader, stdin in production.
//! Blank lines are ignored. A line that does not decode is reported to the
//! orchestrator and reading continues with the next line.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::consumer::messages::{IndexingJob, StreamMessage};
use crate::consumer::Consumer;
use crate::errors::IngestError;

/// Consumer decoding indexing jobs from lines of text.
pub struct LineConsumer<R> {
    reader: Mutex<Option<R>>,
}

impl LineConsumer<BufReader<Stdin>> {
    /// Read jobs from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> LineConsumer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
        }
    }
}

#[async_trait]
impl<R> Consumer for LineConsumer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Read lines until end of input, shutdown, or the receiver going away.
    ///
    /// The reader is consumed by the first call; later calls end immediately.
    #[instrument(skip(self, sender, shutdown))]
    async fn run(
        &self,
        sender: mpsc::Sender<StreamMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError> {
        let reader = self.reader.lock().await.take();
        let Some(reader) = reader else {
            warn!("Job source already consumed");
            let _ = sender.send(StreamMessage::End).await;
            return Ok(());
        };

        let mut lines = reader.lines();
        let mut position: u64 = 0;

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Consumer received shutdown signal");
                    return Ok(());
                }
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            info!(lines_read = position, "Job source exhausted");
                            let _ = sender.send(StreamMessage::End).await;
                            return Ok(());
                        }
                        Err(e) => {
                            let _ = sender
                                .send(StreamMessage::Error {
                                    position,
                                    message: e.to_string(),
                                })
                                .await;
                            return Err(e.into());
                        }
                    };
                    position += 1;

                    if line.trim().is_empty() {
                        continue;
                    }

                    let message = match serde_json::from_str::<IndexingJob>(&line) {
                        Ok(job) => {
                            debug!(position, trigger_type = ?job.trigger_type, action = ?job.action, "Decoded job");
                            StreamMessage::Job { job, position }
                        }
                        Err(e) => StreamMessage::Error {
                            position,
                            message: IngestError::from(e).to_string(),
                        },
                    };

                    if sender.send(message).await.is_err() {
                        debug!("Job receiver dropped, stopping consumer");
                        return Ok(());
                    }
                }
            }
        }
    }
}
