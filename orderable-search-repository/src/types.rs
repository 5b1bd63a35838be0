//! Request and response types for upstream operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use orderable_search_shared::SearchDocument;

/// Action of a single batch operation. Only upserts are ever batched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    Upsert,
}

/// One operation within `POST /indexes/{name}/batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOperation {
    pub action: BatchAction,
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub body: Map<String, Value>,
}

/// Body of `POST /indexes/{name}/batch`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<BatchOperation>,
}

/// Outcome of a batch upsert.
///
/// The index accepts or rejects a batch as a whole, so there are no per-document
/// results; a rejected batch surfaces as an error instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchOperationSummary {
    /// Number of documents submitted.
    pub total: usize,
    /// Ids of the documents submitted, in submission order.
    pub object_ids: Vec<String>,
}

/// Parameters of a supplier group price adjustment lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAdjustmentQuery {
    pub supplier_id: String,
    pub price_adjustment_group_id: String,
    pub as_of: DateTime<Utc>,
    /// Restrict the answer to adjustments of exactly these offerings.
    pub linked_product_ids: Vec<String>,
}

impl BatchRequest {
    /// Build an upsert batch from complete documents.
    pub fn upserts(documents: &[SearchDocument]) -> Self {
        Self {
            requests: documents
                .iter()
                .map(|doc| BatchOperation {
                    action: BatchAction::Upsert,
                    object_id: doc.object_id.clone(),
                    body: doc.fields.clone(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn object_ids(&self) -> Vec<String> {
        self.requests.iter().map(|r| r.object_id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_request_wire_format() {
        let mut doc = SearchDocument::new("s1p");
        doc.fields.insert("supplier_id".to_string(), json!("s1"));

        let batch = BatchRequest::upserts(&[doc]);

        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!({
                "requests": [
                    {"action": "upsert", "objectID": "s1p", "body": {"supplier_id": "s1"}}
                ]
            })
        );
        assert_eq!(batch.object_ids(), vec!["s1p".to_string()]);
    }
}
