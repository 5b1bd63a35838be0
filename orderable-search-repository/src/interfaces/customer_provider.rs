//! Customer provider trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::UpstreamError;
use orderable_search_shared::{CustomerPriceAdjustment, Membership};

/// Read access to the customer service.
#[async_trait]
pub trait CustomerProvider: Send + Sync {
    /// The customer's supplier memberships.
    async fn memberships(&self, customer_id: &str) -> Result<Vec<Membership>, UpstreamError>;

    /// The customer's own price adjustments valid at `as_of`.
    async fn price_adjustments(
        &self,
        customer_id: &str,
        as_of: &DateTime<Utc>,
    ) -> Result<Vec<CustomerPriceAdjustment>, UpstreamError>;
}
