//! Supplier provider trait definition.

use async_trait::async_trait;

use crate::errors::UpstreamError;
use crate::types::GroupAdjustmentQuery;
use orderable_search_shared::{GroupPriceAdjustment, SupplierLink};

/// Read access to the supplier service.
#[async_trait]
pub trait SupplierProvider: Send + Sync {
    /// Every supplier offering the given catalog product, with the id of its offering.
    async fn suppliers_of_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<SupplierLink>, UpstreamError>;

    /// Group price adjustments of one supplier, restricted to the queried offerings
    /// and valid at the queried date.
    async fn group_price_adjustments(
        &self,
        query: &GroupAdjustmentQuery,
    ) -> Result<Vec<GroupPriceAdjustment>, UpstreamError>;
}
