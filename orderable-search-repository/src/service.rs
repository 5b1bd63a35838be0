//! Search index service implementation.
//!
//! This module provides the main service for interacting with the search index.
//! The synchronizers use it to write and delete documents and the search proxy
//! uses it to run queries.
//!
//! # Note on Document Writes
//!
//! There is no partial update. Every write sends the complete document and replaces
//! whatever the index held under the same id, so `upsert` both creates and updates.

use crate::config::SearchIndexServiceConfig;
use crate::errors::UpstreamError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BatchOperationSummary, BatchRequest};
use crate::utils::validate_id;
use orderable_search_shared::{SearchDocument, SearchHits};

/// The main service for interacting with the search index.
///
/// This is the high-level API that application code should use. It validates
/// requests and delegates to a `SearchIndexProvider` for the actual backend calls.
///
/// # Example
///
/// ```no_run
/// use orderable_search_repository::{EndpointConfig, HttpSearchIndexProvider, SearchIndexService};
/// use orderable_search_shared::SearchDocument;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = EndpointConfig::new("http://localhost:1111")?;
/// let provider = Box::new(HttpSearchIndexProvider::new(endpoint, "orderable-products")?);
/// let service = SearchIndexService::new(provider);
///
/// let mut document = SearchDocument::new("s1p");
/// document.fields.insert("supplier_id".to_string(), "s1".into());
/// service.upsert(&document).await?;
/// # Ok(())
/// # }
/// ```
pub struct SearchIndexService {
    provider: Box<dyn SearchIndexProvider>,
    config: SearchIndexServiceConfig,
}

impl SearchIndexService {
    /// Create a new SearchIndexService with default configuration.
    ///
    /// The default configuration includes a batch size limit of 1000 documents.
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexServiceConfig::default(),
        }
    }

    /// Create a new SearchIndexService with custom configuration.
    pub fn with_config(
        provider: Box<dyn SearchIndexProvider>,
        config: SearchIndexServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), UpstreamError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(UpstreamError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Run a raw query against the index.
    ///
    /// The body is forwarded byte for byte; the index decides what it means.
    pub async fn query(&self, raw_query: &[u8]) -> Result<SearchHits, UpstreamError> {
        self.provider.query(raw_query).await
    }

    /// Fetch documents by id. Ids not present in the index are left out of the result.
    pub async fn get_documents(
        &self,
        ids: &[String],
    ) -> Result<Vec<SearchDocument>, UpstreamError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.provider.get_documents(ids).await
    }

    /// Write a complete document, creating or fully replacing it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was written
    /// * `Err(UpstreamError::ValidationError)` - If the document id is blank
    /// * `Err(UpstreamError)` - If the index rejected the write
    pub async fn upsert(&self, document: &SearchDocument) -> Result<(), UpstreamError> {
        validate_id("objectID", &document.object_id)?;
        self.provider.put_document(document).await
    }

    /// Delete a document. A document that does not exist counts as deleted.
    pub async fn remove(&self, object_id: &str) -> Result<(), UpstreamError> {
        validate_id("objectID", object_id)?;
        self.provider.delete_document(object_id).await
    }

    /// Upsert many complete documents in a single index request.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - The number and ids of the submitted documents
    /// * `Err(UpstreamError::BatchSizeExceeded)` - If the batch exceeds the configured maximum
    /// * `Err(UpstreamError::ValidationError)` - If any document id is blank
    /// * `Err(UpstreamError)` - If the index rejected the batch
    ///
    /// # Note
    ///
    /// An empty batch succeeds without contacting the index. Nothing is submitted
    /// when validation fails, so a batch is either sent whole or not at all.
    pub async fn batch_upsert(
        &self,
        documents: &[SearchDocument],
    ) -> Result<BatchOperationSummary, UpstreamError> {
        if documents.is_empty() {
            return Ok(BatchOperationSummary::default());
        }

        self.validate_batch_size(documents.len())?;

        for document in documents {
            validate_id("objectID", &document.object_id)?;
        }

        self.provider.batch(&BatchRequest::upserts(documents)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Mock provider for testing
    #[derive(Default)]
    struct MockProvider {
        put_documents: Arc<Mutex<Vec<SearchDocument>>>,
        deleted_ids: Arc<Mutex<Vec<String>>>,
        batches: Arc<Mutex<Vec<BatchRequest>>>,
        lookups: Arc<Mutex<Vec<Vec<String>>>>,
        should_fail: bool,
    }

    impl MockProvider {
        fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::default()
            }
        }

        fn mock_failure(&self) -> UpstreamError {
            UpstreamError::status("POST", "http://search/indexes/orderable-products", 500, "Mock failure")
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn query(&self, _raw_query: &[u8]) -> Result<SearchHits, UpstreamError> {
            if self.should_fail {
                return Err(self.mock_failure());
            }
            Ok(SearchHits::new(vec![SearchDocument::new("x")]))
        }

        async fn get_documents(
            &self,
            ids: &[String],
        ) -> Result<Vec<SearchDocument>, UpstreamError> {
            self.lookups.lock().await.push(ids.to_vec());
            Ok(ids.iter().map(SearchDocument::new).collect())
        }

        async fn put_document(&self, document: &SearchDocument) -> Result<(), UpstreamError> {
            if self.should_fail {
                return Err(self.mock_failure());
            }
            self.put_documents.lock().await.push(document.clone());
            Ok(())
        }

        async fn delete_document(&self, id: &str) -> Result<(), UpstreamError> {
            if self.should_fail {
                return Err(self.mock_failure());
            }
            self.deleted_ids.lock().await.push(id.to_string());
            Ok(())
        }

        async fn batch(
            &self,
            request: &BatchRequest,
        ) -> Result<BatchOperationSummary, UpstreamError> {
            if self.should_fail {
                return Err(self.mock_failure());
            }
            self.batches.lock().await.push(request.clone());
            Ok(BatchOperationSummary {
                total: request.len(),
                object_ids: request.object_ids(),
            })
        }
    }

    fn create_test_document(object_id: &str) -> SearchDocument {
        let mut document = SearchDocument::new(object_id);
        document
            .fields
            .insert("supplier_id".to_string(), json!("s1"));
        document.fields.insert("price".to_string(), json!(15.5));
        document
    }

    #[tokio::test]
    async fn test_upsert_forwards_document() {
        let provider = MockProvider::default();
        let put_documents = provider.put_documents.clone();
        let service = SearchIndexService::new(Box::new(provider));

        service.upsert(&create_test_document("s1p")).await.unwrap();

        let written = put_documents.lock().await;
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].object_id, "s1p");
    }

    #[tokio::test]
    async fn test_upsert_validation() {
        let provider = MockProvider::default();
        let put_documents = provider.put_documents.clone();
        let service = SearchIndexService::new(Box::new(provider));

        let result = service.upsert(&create_test_document("")).await;

        assert!(matches!(result, Err(UpstreamError::ValidationError(_))));
        assert!(put_documents.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_validation() {
        let provider = MockProvider::default();
        let deleted_ids = provider.deleted_ids.clone();
        let service = SearchIndexService::new(Box::new(provider));

        assert!(service.remove(" ").await.is_err());
        service.remove("s1p").await.unwrap();

        assert_eq!(*deleted_ids.lock().await, vec!["s1p".to_string()]);
    }

    #[tokio::test]
    async fn test_provider_failure_is_propagated() {
        let service = SearchIndexService::new(Box::new(MockProvider::failing()));

        let err = service.remove("s1p").await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));

        let err = service.query(b"{}").await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_get_documents_empty_skips_provider() {
        let provider = MockProvider::default();
        let lookups = provider.lookups.clone();
        let service = SearchIndexService::new(Box::new(provider));

        let documents = service.get_documents(&[]).await.unwrap();

        assert!(documents.is_empty());
        assert!(lookups.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_upsert_empty() {
        let provider = MockProvider::default();
        let batches = provider.batches.clone();
        let service = SearchIndexService::new(Box::new(provider));

        let result = service.batch_upsert(&[]).await.unwrap();

        assert_eq!(result.total, 0);
        assert!(result.object_ids.is_empty());
        assert!(batches.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_upsert_multiple() {
        let provider = MockProvider::default();
        let batches = provider.batches.clone();
        let service = SearchIndexService::new(Box::new(provider));

        let documents = vec![create_test_document("s1p"), create_test_document("s2p")];
        let result = service.batch_upsert(&documents).await.unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.object_ids, vec!["s1p".to_string(), "s2p".to_string()]);

        let batches = batches.lock().await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].requests[1].body["price"], json!(15.5));
    }

    #[tokio::test]
    async fn test_batch_upsert_rejects_blank_id_before_sending() {
        let provider = MockProvider::default();
        let batches = provider.batches.clone();
        let service = SearchIndexService::new(Box::new(provider));

        let documents = vec![create_test_document("s1p"), create_test_document("")];
        let result = service.batch_upsert(&documents).await;

        assert!(matches!(result, Err(UpstreamError::ValidationError(_))));
        assert!(batches.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_size_exceeded() {
        let provider = MockProvider::default();
        let batches = provider.batches.clone();
        let config = SearchIndexServiceConfig::with_max_batch_size(2);
        let service = SearchIndexService::with_config(Box::new(provider), config);

        let documents: Vec<SearchDocument> = (0..3)
            .map(|i| create_test_document(&format!("offering-{}", i)))
            .collect();
        let result = service.batch_upsert(&documents).await;

        assert_eq!(
            result.unwrap_err(),
            UpstreamError::BatchSizeExceeded {
                provided: 3,
                max: 2
            }
        );
        assert!(batches.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_size_unlimited() {
        let provider = MockProvider::default();
        let config = SearchIndexServiceConfig::unlimited();
        let service = SearchIndexService::with_config(Box::new(provider), config);

        let documents: Vec<SearchDocument> = (0..5000)
            .map(|i| create_test_document(&format!("offering-{}", i)))
            .collect();

        let result = service.batch_upsert(&documents).await.unwrap();
        assert_eq!(result.total, 5000);
    }
}
