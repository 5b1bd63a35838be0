//! Orchestrator module for orderable search.
//!
//! Coordinates the consumer and the job dispatcher.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, instrument};

use crate::consumer::{Consumer, IndexingJob, StreamMessage};
use crate::dispatcher::JobDispatcher;
use crate::errors::IngestError;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Size of the job channel buffer.
    pub channel_buffer_size: usize,
    /// How often progress is logged.
    pub progress_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: 1000,
            progress_interval: Duration::from_secs(10),
        }
    }
}

/// Job counters since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStats {
    pub received: u64,
    pub succeeded: u64,
    pub failed: u64,
}

#[derive(Default)]
struct JobCounters {
    received: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl JobCounters {
    fn snapshot(&self) -> JobStats {
        JobStats {
            received: self.received.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Orchestrator that coordinates job ingestion.
///
/// The orchestrator:
/// - Runs the consumer in the background
/// - Dispatches jobs one at a time in arrival order
/// - Counts successes and failures; a failed job never stops the run
/// - Handles shutdown signals
pub struct Orchestrator {
    consumer: Arc<dyn Consumer>,
    dispatcher: JobDispatcher,
    config: OrchestratorConfig,
    shutdown_tx: broadcast::Sender<()>,
    counters: Arc<JobCounters>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(consumer: Arc<dyn Consumer>, dispatcher: JobDispatcher) -> Self {
        Self::with_config(consumer, dispatcher, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        consumer: Arc<dyn Consumer>,
        dispatcher: JobDispatcher,
        config: OrchestratorConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            consumer,
            dispatcher,
            config,
            shutdown_tx,
            counters: Arc::new(JobCounters::default()),
        }
    }

    /// Run the orchestrator.
    ///
    /// Blocks until the consumer reports the end of its input, a shutdown is
    /// requested, or Ctrl-C is received.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<JobStats, IngestError> {
        info!("Starting orderable search job orchestrator");

        let (job_transmitter, mut job_receiver) =
            mpsc::channel::<StreamMessage>(self.config.channel_buffer_size.max(1));

        // Start consumer in background
        let consumer = self.consumer.clone();
        let consumer_shutdown = self.shutdown_tx.subscribe();
        let consumer_handle = tokio::spawn(async move {
            if let Err(e) = consumer.run(job_transmitter, consumer_shutdown).await {
                error!(error = %e, "Consumer error");
            }
        });

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut progress_timer = interval(self.config.progress_interval);
        progress_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut prev_received: u64 = 0;
        let mut prev_time = std::time::Instant::now();

        info!("Ready to process indexing jobs");

        loop {
            tokio::select! {
                msg = job_receiver.recv() => {
                    match msg {
                        Some(StreamMessage::Job { job, position }) => {
                            self.process_job(job, position).await;
                        }
                        Some(StreamMessage::Error { position, message }) => {
                            self.counters.received.fetch_add(1, Ordering::Relaxed);
                            self.counters.failed.fetch_add(1, Ordering::Relaxed);
                            error!(position, error = %message, "Received undecodable job");
                        }
                        Some(StreamMessage::End) | None => {
                            info!("Job stream ended");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown requested");
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    let _ = self.shutdown_tx.send(());
                    break;
                }
                _ = progress_timer.tick() => {
                    let stats = self.counters.snapshot();

                    let now = std::time::Instant::now();
                    let elapsed_secs = now.duration_since(prev_time).as_secs_f64();
                    let jobs_per_sec = if elapsed_secs > 0.0 {
                        (stats.received.saturating_sub(prev_received) as f64) / elapsed_secs
                    } else {
                        0.0
                    };

                    info!(
                        jobs_received = stats.received,
                        jobs_succeeded = stats.succeeded,
                        jobs_failed = stats.failed,
                        jobs_per_sec = format!("{:.2}", jobs_per_sec),
                        "Processing progress"
                    );

                    prev_received = stats.received;
                    prev_time = now;
                }
            }
        }

        // A consumer still blocked on its source or on a full channel is told to stop.
        let _ = self.shutdown_tx.send(());
        drop(job_receiver);
        let _ = consumer_handle.await;

        let stats = self.counters.snapshot();
        info!(
            total_jobs_received = stats.received,
            total_jobs_succeeded = stats.succeeded,
            total_jobs_failed = stats.failed,
            "Orchestrator shutdown complete"
        );
        Ok(stats)
    }

    /// Dispatch one job and record its outcome.
    async fn process_job(&self, job: IndexingJob, position: u64) {
        self.counters.received.fetch_add(1, Ordering::Relaxed);
        debug!(position, "Dispatching job");

        match self.dispatcher.dispatch(job).await {
            Ok(_) => {
                self.counters.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(position, error = %e, "Indexing job failed");
            }
        }
    }

    /// Current job counters.
    pub fn stats(&self) -> JobStats {
        self.counters.snapshot()
    }

    /// A handle that stops a running orchestrator when sent to.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
