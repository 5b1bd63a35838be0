//! Search index provider trait definition.

use async_trait::async_trait;

use crate::errors::UpstreamError;
use crate::types::{BatchOperationSummary, BatchRequest};
use orderable_search_shared::{SearchDocument, SearchHits};

/// Abstracts the search index holding orderable product documents.
///
/// Implementations are injected into `SearchIndexService`, which validates requests
/// before delegating here.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Run a raw query against the index and return its hits.
    ///
    /// The query body is passed through untouched; an empty body sends no payload.
    async fn query(&self, raw_query: &[u8]) -> Result<SearchHits, UpstreamError>;

    /// Fetch the documents with the given ids.
    ///
    /// Ids the index does not know are simply missing from the result.
    async fn get_documents(&self, ids: &[String]) -> Result<Vec<SearchDocument>, UpstreamError>;

    /// Write a document, fully replacing any existing document with the same id.
    async fn put_document(&self, document: &SearchDocument) -> Result<(), UpstreamError>;

    /// Delete a document. Deleting a document that does not exist succeeds.
    async fn delete_document(&self, id: &str) -> Result<(), UpstreamError>;

    /// Submit a batch of upserts as a single request.
    async fn batch(&self, request: &BatchRequest) -> Result<BatchOperationSummary, UpstreamError>;
}
