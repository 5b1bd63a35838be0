//! HTTP search index provider.
//!
//! Talks to the search API that hosts the orderable products index:
//!
//! - `POST /indexes/{name}/query` runs a raw query
//! - `GET /indexes/{name}?id[]=..` fetches documents by id
//! - `PUT /indexes/{name}/{id}` replaces one document
//! - `DELETE /indexes/{name}/{id}` removes one document
//! - `POST /indexes/{name}/batch` submits a batch of upserts

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};
use url::Url;

use crate::errors::UpstreamError;
use crate::http::client::JsonClient;
use crate::http::endpoint::EndpointConfig;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BatchOperationSummary, BatchRequest};
use orderable_search_shared::{SearchDocument, SearchHits};

/// The index orderable product documents live in.
pub const DEFAULT_INDEX_NAME: &str = "orderable-products";

/// Search index provider backed by the search API.
pub struct HttpSearchIndexProvider {
    client: JsonClient,
    index_name: String,
}

impl HttpSearchIndexProvider {
    /// Create a provider for the named index.
    pub fn new(
        endpoint: EndpointConfig,
        index_name: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        let index_name = index_name.into();
        let client = JsonClient::new(endpoint)?;

        info!(
            url = %client.endpoint().base_url,
            index = %index_name,
            "Created search index provider"
        );

        Ok(Self { client, index_name })
    }

    fn index_url(&self, extra: &[&str]) -> Result<Url, UpstreamError> {
        let mut segments = vec!["indexes", self.index_name.as_str()];
        segments.extend_from_slice(extra);
        self.client.url(&segments)
    }

    fn documents_url(&self, ids: &[String]) -> Result<Url, UpstreamError> {
        let mut url = self.index_url(&[])?;
        {
            let mut query = url.query_pairs_mut();
            for id in ids {
                query.append_pair("id[]", id);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl SearchIndexProvider for HttpSearchIndexProvider {
    async fn query(&self, raw_query: &[u8]) -> Result<SearchHits, UpstreamError> {
        let url = self.index_url(&["query"])?;
        let hits: SearchHits = self.client.send_raw(Method::POST, url, raw_query).await?;

        debug!(hit_count = hits.len(), "Index query completed");
        Ok(hits)
    }

    async fn get_documents(&self, ids: &[String]) -> Result<Vec<SearchDocument>, UpstreamError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.documents_url(ids)?;
        let documents: Vec<SearchDocument> = self.client.get_json(url).await?;

        debug!(
            requested = ids.len(),
            found = documents.len(),
            "Fetched indexed documents"
        );
        Ok(documents)
    }

    async fn put_document(&self, document: &SearchDocument) -> Result<(), UpstreamError> {
        let url = self.index_url(&[document.object_id.as_str()])?;
        self.client
            .send_json(Method::PUT, url, &document.fields)
            .await?;

        debug!(object_id = %document.object_id, "Document written");
        Ok(())
    }

    async fn delete_document(&self, id: &str) -> Result<(), UpstreamError> {
        let url = self.index_url(&[id])?;
        self.client.delete(url).await?;

        debug!(object_id = %id, "Document deleted");
        Ok(())
    }

    async fn batch(&self, request: &BatchRequest) -> Result<BatchOperationSummary, UpstreamError> {
        let url = self.index_url(&["batch"])?;
        self.client.send_json(Method::POST, url, request).await?;

        debug!(count = request.len(), "Batch submitted");
        Ok(BatchOperationSummary {
            total: request.len(),
            object_ids: request.object_ids(),
        })
    }
}
