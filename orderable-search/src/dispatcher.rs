//! Routes indexing jobs to the synchronizer that handles them.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::consumer::{IndexingJob, JobCommand};
use crate::errors::IngestError;
use crate::synchronizer::{CatalogSynchronizer, OfferingSynchronizer, PropagationSummary};

/// Result of a dispatched job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// A catalog product change was propagated to its offerings.
    Propagated(PropagationSummary),
    /// An offering document was written.
    Indexed { object_id: String },
    /// An offering document was deleted.
    Removed { object_id: String },
}

/// Validates indexing jobs and hands them to a synchronizer.
pub struct JobDispatcher {
    offerings: Arc<OfferingSynchronizer>,
    catalog: Arc<CatalogSynchronizer>,
}

impl JobDispatcher {
    pub fn new(offerings: Arc<OfferingSynchronizer>, catalog: Arc<CatalogSynchronizer>) -> Self {
        Self { offerings, catalog }
    }

    /// Run one job to completion.
    ///
    /// An invalid job is rejected before any upstream call is made.
    #[instrument(skip(self, job), fields(trigger_type = ?job.trigger_type, action = ?job.action))]
    pub async fn dispatch(&self, job: IndexingJob) -> Result<JobOutcome, IngestError> {
        let command = job.into_command().inspect_err(|e| {
            warn!(error = %e, "Rejected indexing job");
        })?;

        let outcome = match command {
            JobCommand::PropagateProduct(product) => {
                JobOutcome::Propagated(self.catalog.propagate(&product).await?)
            }
            JobCommand::UpsertOffering(offering) => {
                let document = self.offerings.upsert(&offering).await?;
                JobOutcome::Indexed {
                    object_id: document.object_id,
                }
            }
            JobCommand::RemoveOffering(object_id) => {
                self.offerings.remove(&object_id).await?;
                JobOutcome::Removed { object_id }
            }
        };

        info!(outcome = ?outcome, "Indexing job completed");
        Ok(outcome)
    }
}
