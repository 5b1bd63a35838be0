//! Message types for the consumer.
//!
//! An indexing job names the kind of resource that changed, what happened to it
//! and the resource itself:
//!
//! ```json
//! {"trigger_type": "linked_product", "action": "update", "data": {"id": "s1p", ...}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::IngestError;
use orderable_search_shared::{CatalogProduct, Offering};

/// Kind of resource that triggered a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// A catalog product.
    Product,
    /// A supplier offering.
    LinkedProduct,
}

/// What happened to the triggering resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobAction {
    Add,
    Update,
    Remove,
}

/// An indexing job as received from the job source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexingJob {
    pub trigger_type: TriggerType,
    pub action: JobAction,
    /// The triggering resource. Always carries a non-empty `id`.
    pub data: Value,
}

/// The synchronizer call an indexing job resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum JobCommand {
    /// Rebuild every offering document of a changed catalog product.
    PropagateProduct(CatalogProduct),
    /// Write the document of an added or updated offering.
    UpsertOffering(Offering),
    /// Delete the document of a removed offering.
    RemoveOffering(String),
}

impl IndexingJob {
    pub fn new(trigger_type: TriggerType, action: JobAction, data: Value) -> Self {
        Self {
            trigger_type,
            action,
            data,
        }
    }

    /// The id of the triggering resource, if present.
    pub fn resource_id(&self) -> Option<&str> {
        self.data.get("id").and_then(Value::as_str)
    }

    /// Validate the job and decode its data.
    ///
    /// Catalog products only support `update`; offerings support `add`, `update`
    /// and `remove`.
    pub fn into_command(self) -> Result<JobCommand, IngestError> {
        match self.resource_id() {
            Some(id) if !id.trim().is_empty() => {}
            _ => return Err(IngestError::invalid_job("data.id is required")),
        }

        match (self.trigger_type, self.action) {
            (TriggerType::Product, JobAction::Update) => {
                let product = serde_json::from_value(self.data).map_err(|e| {
                    IngestError::invalid_job(format!("invalid product data: {}", e))
                })?;
                Ok(JobCommand::PropagateProduct(product))
            }
            (TriggerType::Product, action) => Err(IngestError::invalid_job(format!(
                "action {:?} is not supported for products",
                action
            ))),
            (TriggerType::LinkedProduct, JobAction::Add | JobAction::Update) => {
                let offering = serde_json::from_value(self.data).map_err(|e| {
                    IngestError::invalid_job(format!("invalid linked product data: {}", e))
                })?;
                Ok(JobCommand::UpsertOffering(offering))
            }
            (TriggerType::LinkedProduct, JobAction::Remove) => {
                let id = self.resource_id().unwrap_or_default().to_string();
                Ok(JobCommand::RemoveOffering(id))
            }
        }
    }
}

/// Messages that flow from a consumer to the orchestrator.
#[derive(Debug)]
pub enum StreamMessage {
    /// A decoded job, with its position in the source for diagnostics.
    Job { job: IndexingJob, position: u64 },
    /// A job could not be decoded; the source continues.
    Error { position: u64, message: String },
    /// Stream has ended.
    End,
}
