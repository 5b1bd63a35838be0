//! Fan-out catalog synchronizer.
//!
//! A catalog product is offered by any number of suppliers and every offering has
//! its own index document. When the product changes, all of those documents are
//! rebuilt from their already-indexed commercial fields and the refreshed product,
//! then written back as a single batch.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, instrument};

use crate::errors::SyncError;
use crate::processor::build_document;
use orderable_search_repository::utils::validate_id;
use orderable_search_repository::{
    BatchOperationSummary, SearchIndexService, SupplierProvider, UpstreamError,
};
use orderable_search_shared::{CatalogProduct, SearchDocument};

/// Ids per index lookup. Keeps the `id[]=` query string of a single request bounded.
pub const DEFAULT_LOOKUP_CHUNK_SIZE: usize = 50;

/// What a propagation touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationSummary {
    /// Offerings the supplier service reported for the product.
    pub linked_product_ids: Vec<String>,
    /// Offerings reported by the supplier service but unknown to the index.
    pub skipped_ids: Vec<String>,
    /// The batch write; empty when there was nothing to rewrite.
    pub batch: BatchOperationSummary,
}

/// Propagates catalog product changes to every supplier document of the product.
pub struct CatalogSynchronizer {
    suppliers: Arc<dyn SupplierProvider>,
    index: Arc<SearchIndexService>,
    lookup_chunk_size: usize,
}

impl CatalogSynchronizer {
    pub fn new(suppliers: Arc<dyn SupplierProvider>, index: Arc<SearchIndexService>) -> Self {
        Self {
            suppliers,
            index,
            lookup_chunk_size: DEFAULT_LOOKUP_CHUNK_SIZE,
        }
    }

    /// Use a different lookup chunk size. Zero is treated as one.
    pub fn with_lookup_chunk_size(mut self, lookup_chunk_size: usize) -> Self {
        self.lookup_chunk_size = lookup_chunk_size.max(1);
        self
    }

    /// Rebuild and rewrite every indexed offering of `product`.
    ///
    /// # Returns
    ///
    /// * `Ok(PropagationSummary)` - Including the no-op case of a product nobody supplies
    /// * `Err(SyncError)` - If the supplier lookup, any document lookup chunk or the
    ///   batch write failed; no document is written in that case
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn propagate(&self, product: &CatalogProduct) -> Result<PropagationSummary, SyncError> {
        validate_id("id", &product.id).map_err(|e| SyncError::upstream("validation", e))?;

        let links = self
            .suppliers
            .suppliers_of_product(&product.id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch suppliers of product");
                SyncError::upstream("supplier lookup", e)
            })?;

        if links.is_empty() {
            debug!("Product has no suppliers, nothing to propagate");
            return Ok(PropagationSummary::default());
        }

        let mut seen = HashSet::new();
        let linked_product_ids: Vec<String> = links
            .iter()
            .map(|link| link.linked_product_id().to_string())
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let indexed = self.fetch_indexed(&linked_product_ids).await.map_err(|e| {
            error!(error = %e, "Failed to fetch indexed offerings");
            SyncError::upstream("document lookup", e)
        })?;

        let found: HashSet<&str> = indexed.iter().map(|d| d.object_id.as_str()).collect();
        let skipped_ids: Vec<String> = linked_product_ids
            .iter()
            .filter(|id| !found.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &skipped_ids {
            debug!(object_id = %id, "Offering not in index, skipping");
        }

        let rebuilt: Vec<SearchDocument> = indexed
            .iter()
            .map(|document| {
                build_document(&document.object_id, &document.commercial_fields(), product)
            })
            .collect();

        let batch = self.index.batch_upsert(&rebuilt).await.map_err(|e| {
            error!(error = %e, document_count = rebuilt.len(), "Failed to write rebuilt documents");
            SyncError::upstream("batch write", e)
        })?;

        info!(
            offering_count = linked_product_ids.len(),
            rewritten_count = batch.total,
            skipped_count = skipped_ids.len(),
            "Catalog change propagated"
        );

        Ok(PropagationSummary {
            linked_product_ids,
            skipped_ids,
            batch,
        })
    }

    /// Look the ids up chunk by chunk, concurrently.
    ///
    /// Every chunk runs to completion before the results are inspected; the first
    /// failed chunk (in id order) is reported.
    async fn fetch_indexed(&self, ids: &[String]) -> Result<Vec<SearchDocument>, UpstreamError> {
        let lookups = ids
            .chunks(self.lookup_chunk_size)
            .map(|chunk| self.index.get_documents(chunk));

        let mut documents = Vec::with_capacity(ids.len());
        for result in join_all(lookups).await {
            documents.extend(result?);
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use orderable_search_repository::{
        BatchRequest, GroupAdjustmentQuery, SearchIndexProvider, SearchIndexServiceConfig,
    };
    use orderable_search_shared::{GroupPriceAdjustment, SearchHits, SupplierLink};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockSuppliers {
        links: Vec<SupplierLink>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockSuppliers {
        fn with_links(pairs: &[(&str, &str)]) -> Self {
            let links = pairs
                .iter()
                .map(|(supplier, linked)| {
                    serde_json::from_value(json!({
                        "id": supplier,
                        "_metadata": {"linked_product_id": linked}
                    }))
                    .unwrap()
                })
                .collect();
            Self {
                links,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl SupplierProvider for MockSuppliers {
        async fn suppliers_of_product(
            &self,
            product_id: &str,
        ) -> Result<Vec<SupplierLink>, UpstreamError> {
            self.calls.lock().unwrap().push(product_id.to_string());
            Ok(self.links.clone())
        }

        async fn group_price_adjustments(
            &self,
            _query: &GroupAdjustmentQuery,
        ) -> Result<Vec<GroupPriceAdjustment>, UpstreamError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct MockIndex {
        documents: HashMap<String, SearchDocument>,
        failing_ids: HashSet<String>,
        lookups: Arc<Mutex<Vec<Vec<String>>>>,
        batches: Arc<Mutex<Vec<BatchRequest>>>,
    }

    impl MockIndex {
        fn with_documents(documents: serde_json::Value) -> Self {
            let documents: Vec<SearchDocument> = serde_json::from_value(documents).unwrap();
            Self {
                documents: documents
                    .into_iter()
                    .map(|d| (d.object_id.clone(), d))
                    .collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockIndex {
        async fn query(&self, _raw_query: &[u8]) -> Result<SearchHits, UpstreamError> {
            Ok(SearchHits::default())
        }

        async fn get_documents(
            &self,
            ids: &[String],
        ) -> Result<Vec<SearchDocument>, UpstreamError> {
            self.lookups.lock().unwrap().push(ids.to_vec());
            if ids.iter().any(|id| self.failing_ids.contains(id)) {
                return Err(UpstreamError::status(
                    "GET",
                    "http://search/indexes/orderable-products",
                    500,
                    r#"{"message":"Internal Server Error"}"#,
                ));
            }
            Ok(ids
                .iter()
                .filter_map(|id| self.documents.get(id).cloned())
                .collect())
        }

        async fn put_document(&self, _document: &SearchDocument) -> Result<(), UpstreamError> {
            Ok(())
        }

        async fn delete_document(&self, _id: &str) -> Result<(), UpstreamError> {
            Ok(())
        }

        async fn batch(
            &self,
            request: &BatchRequest,
        ) -> Result<BatchOperationSummary, UpstreamError> {
            self.batches.lock().unwrap().push(request.clone());
            Ok(BatchOperationSummary {
                total: request.len(),
                object_ids: request.object_ids(),
            })
        }
    }

    fn updated_product() -> CatalogProduct {
        serde_json::from_value(json!({
            "id": "p1",
            "name": "new product name",
            "category": {"id": "c1", "name": "category", "_metadata": {"hierarchy": ["c", "c.c1"]}},
            "brand": "mars",
            "product_type_attributes": [
                {"name": "attribute1", "values": ["one", "two"]},
                {"name": "attribute2", "values": [1, 2]}
            ]
        }))
        .unwrap()
    }

    fn existing_documents() -> serde_json::Value {
        json!([
            {"objectID": "s1p", "product_id": "p1", "supplier_id": "s1", "price": 15.50, "was_price": 21.99},
            {"objectID": "s2p", "product_id": "p1", "supplier_id": "s2", "price": 8.10, "was_price": 12.65}
        ])
    }

    fn synchronizer(suppliers: MockSuppliers, index: MockIndex) -> CatalogSynchronizer {
        CatalogSynchronizer::new(
            Arc::new(suppliers),
            Arc::new(SearchIndexService::new(Box::new(index))),
        )
    }

    #[tokio::test]
    async fn test_propagate_rewrites_every_offering() {
        let index = MockIndex::with_documents(existing_documents());
        let batches = index.batches.clone();
        let sync = synchronizer(MockSuppliers::with_links(&[("s1", "s1p"), ("s2", "s2p")]), index);

        let summary = sync.propagate(&updated_product()).await.unwrap();

        assert_eq!(summary.batch.total, 2);
        assert!(summary.skipped_ids.is_empty());

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let requests = &batches[0].requests;
        assert_eq!(batches[0].object_ids(), vec!["s1p".to_string(), "s2p".to_string()]);
        assert_eq!(requests[0].body["supplier_id"], json!("s1"));
        assert_eq!(requests[1].body["supplier_id"], json!("s2"));
        assert_eq!(requests[0].body["price"], json!(15.5));
        assert_eq!(requests[1].body["price"], json!(8.1));
        assert_eq!(requests[0].body["was_price"], json!(21.99));
        assert_eq!(requests[1].body["was_price"], json!(12.65));
        for request in requests {
            assert_eq!(request.body["category_id"], json!("c1"));
            assert_eq!(request.body["category_name"], json!("category"));
            assert_eq!(request.body["category_hierarchy"], json!(["c", "c.c1"]));
            assert_eq!(request.body["attribute1"], json!(["one", "two"]));
            assert_eq!(request.body["attribute2"], json!([1, 2]));
            assert_eq!(request.body["name"], json!("new product name"));
            assert_eq!(request.body["brand"], json!("mars"));
            assert!(!request.body.contains_key("category"));
            assert!(!request.body.contains_key("product_type_attributes"));
        }
    }

    #[tokio::test]
    async fn test_propagate_without_suppliers_is_noop() {
        let index = MockIndex::with_documents(existing_documents());
        let lookups = index.lookups.clone();
        let batches = index.batches.clone();
        let sync = synchronizer(MockSuppliers::with_links(&[]), index);

        let summary = sync.propagate(&updated_product()).await.unwrap();

        assert_eq!(summary, PropagationSummary::default());
        assert!(lookups.lock().unwrap().is_empty());
        assert!(batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_propagate_skips_offerings_missing_from_index() {
        let index = MockIndex::with_documents(existing_documents());
        let batches = index.batches.clone();
        let sync = synchronizer(
            MockSuppliers::with_links(&[("s1", "s1p"), ("s3", "s3p")]),
            index,
        );

        let summary = sync.propagate(&updated_product()).await.unwrap();

        assert_eq!(summary.skipped_ids, vec!["s3p".to_string()]);
        assert_eq!(summary.batch.object_ids, vec!["s1p".to_string()]);
        assert_eq!(batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_propagate_bare_document_keeps_commercial_fields_absent() {
        let index = MockIndex::with_documents(json!([{"objectID": "search_api_batch_error"}]));
        let batches = index.batches.clone();
        let sync = synchronizer(
            MockSuppliers::with_links(&[("s1", "search_api_batch_error")]),
            index,
        );

        sync.propagate(&updated_product()).await.unwrap();

        let batches = batches.lock().unwrap();
        let body = &batches[0].requests[0].body;
        assert!(!body.contains_key("supplier_id"));
        assert!(!body.contains_key("price"));
        assert_eq!(body["brand"], json!("mars"));
    }

    #[tokio::test]
    async fn test_lookup_is_chunked() {
        let pairs: Vec<(String, String)> = (0..5)
            .map(|i| (format!("s{}", i), format!("s{}p", i)))
            .collect();
        let pair_refs: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(s, l)| (s.as_str(), l.as_str()))
            .collect();
        let index = MockIndex::default();
        let lookups = index.lookups.clone();
        let sync = synchronizer(MockSuppliers::with_links(&pair_refs), index)
            .with_lookup_chunk_size(2);

        let summary = sync.propagate(&updated_product()).await.unwrap();

        let mut chunk_sizes: Vec<usize> = lookups.lock().unwrap().iter().map(Vec::len).collect();
        chunk_sizes.sort_unstable();
        assert_eq!(chunk_sizes, vec![1, 2, 2]);
        assert_eq!(summary.skipped_ids.len(), 5);
        assert_eq!(summary.batch.total, 0);
    }

    #[tokio::test]
    async fn test_failed_chunk_fails_propagation_after_all_chunks_ran() {
        let mut index = MockIndex::with_documents(existing_documents());
        index.failing_ids.insert("s2p".to_string());
        let lookups = index.lookups.clone();
        let batches = index.batches.clone();
        let sync = synchronizer(MockSuppliers::with_links(&[("s1", "s1p"), ("s2", "s2p")]), index)
            .with_lookup_chunk_size(1);

        let err = sync.propagate(&updated_product()).await.unwrap_err();

        assert_eq!(err.operation(), "document lookup");
        assert_eq!(err.upstream_error().status_code(), Some(500));
        assert_eq!(lookups.lock().unwrap().len(), 2);
        assert!(batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected_whole() {
        let index = MockIndex::with_documents(existing_documents());
        let batches = index.batches.clone();
        let service = SearchIndexService::with_config(
            Box::new(index),
            SearchIndexServiceConfig::with_max_batch_size(1),
        );
        let sync = CatalogSynchronizer::new(
            Arc::new(MockSuppliers::with_links(&[("s1", "s1p"), ("s2", "s2p")])),
            Arc::new(service),
        );

        let err = sync.propagate(&updated_product()).await.unwrap_err();

        assert_eq!(err.operation(), "batch write");
        assert_eq!(
            *err.upstream_error(),
            UpstreamError::BatchSizeExceeded {
                provided: 2,
                max: 1
            }
        );
        assert!(batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_links_are_looked_up_once() {
        let index = MockIndex::with_documents(existing_documents());
        let lookups = index.lookups.clone();
        let sync = synchronizer(
            MockSuppliers::with_links(&[("s1", "s1p"), ("s1", "s1p")]),
            index,
        );

        let summary = sync.propagate(&updated_product()).await.unwrap();

        assert_eq!(summary.linked_product_ids, vec!["s1p".to_string()]);
        assert_eq!(*lookups.lock().unwrap(), vec![vec!["s1p".to_string()]]);
    }
}
