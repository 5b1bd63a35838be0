//! Catalog provider trait definition.

use async_trait::async_trait;

use crate::errors::UpstreamError;
use orderable_search_shared::CatalogProduct;

/// Read access to the catalog service.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch a product with its category expanded.
    async fn get_product(&self, product_id: &str) -> Result<CatalogProduct, UpstreamError>;
}
