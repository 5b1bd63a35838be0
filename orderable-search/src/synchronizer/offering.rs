//! Single-offering synchronizer.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::errors::SyncError;
use crate::processor::build_document;
use orderable_search_repository::utils::validate_id;
use orderable_search_repository::{CatalogProvider, SearchIndexService};
use orderable_search_shared::{Offering, SearchDocument};

/// Writes and deletes the index document of one supplier offering.
///
/// Each call is independent: one catalog read, one index write. A failure is
/// logged and returned; nothing is retried.
pub struct OfferingSynchronizer {
    catalog: Arc<dyn CatalogProvider>,
    index: Arc<SearchIndexService>,
}

impl OfferingSynchronizer {
    pub fn new(catalog: Arc<dyn CatalogProvider>, index: Arc<SearchIndexService>) -> Self {
        Self { catalog, index }
    }

    /// Rebuild the offering's document from the current catalog product and write it,
    /// replacing any previous version.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchDocument)` - The document as written
    /// * `Err(SyncError)` - Naming the step that failed (`validation`, `catalog fetch`
    ///   or `index write`)
    #[instrument(skip(self, offering), fields(offering_id = %offering.id, product_id = %offering.product_id))]
    pub async fn upsert(&self, offering: &Offering) -> Result<SearchDocument, SyncError> {
        validate_id("id", &offering.id)
            .and_then(|_| validate_id("product_id", &offering.product_id))
            .map_err(|e| SyncError::upstream("validation", e))?;

        let product = self
            .catalog
            .get_product(&offering.product_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch catalog product");
                SyncError::upstream("catalog fetch", e)
            })?;

        let document = build_document(&offering.id, &offering.commercial_fields(), &product);
        debug!(field_count = document.fields.len(), "Built offering document");

        self.index.upsert(&document).await.map_err(|e| {
            error!(error = %e, "Failed to write offering document");
            SyncError::upstream("index write", e)
        })?;

        info!("Offering indexed");
        Ok(document)
    }

    /// Delete the offering's document. Deleting an absent document succeeds.
    #[instrument(skip(self))]
    pub async fn remove(&self, offering_id: &str) -> Result<(), SyncError> {
        validate_id("id", offering_id).map_err(|e| SyncError::upstream("validation", e))?;

        self.index.remove(offering_id).await.map_err(|e| {
            error!(error = %e, "Failed to delete offering document");
            SyncError::upstream("index delete", e)
        })?;

        info!("Offering removed from index");
        Ok(())
    }
}
