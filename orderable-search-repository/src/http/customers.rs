//! HTTP customer provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use url::Url;

use crate::errors::UpstreamError;
use crate::http::client::JsonClient;
use crate::http::endpoint::EndpointConfig;
use crate::interfaces::CustomerProvider;
use crate::utils::format_as_of_date;
use orderable_search_shared::{CustomerPriceAdjustment, Membership};

/// Customer provider backed by the customers API.
pub struct HttpCustomerProvider {
    client: JsonClient,
}

impl HttpCustomerProvider {
    pub fn new(endpoint: EndpointConfig) -> Result<Self, UpstreamError> {
        let client = JsonClient::new(endpoint)?;
        info!(url = %client.endpoint().base_url, "Created customer provider");
        Ok(Self { client })
    }

    /// `GET /customers/{id}/memberships`
    fn memberships_url(&self, customer_id: &str) -> Result<Url, UpstreamError> {
        self.client.url(&["customers", customer_id, "memberships"])
    }

    /// `GET /customers/{id}/product_price_adjustments?date=..`
    fn price_adjustments_url(
        &self,
        customer_id: &str,
        as_of: &DateTime<Utc>,
    ) -> Result<Url, UpstreamError> {
        let mut url = self
            .client
            .url(&["customers", customer_id, "product_price_adjustments"])?;
        url.query_pairs_mut()
            .append_pair("date", &format_as_of_date(as_of));
        Ok(url)
    }
}

#[async_trait]
impl CustomerProvider for HttpCustomerProvider {
    async fn memberships(&self, customer_id: &str) -> Result<Vec<Membership>, UpstreamError> {
        let url = self.memberships_url(customer_id)?;
        let memberships: Vec<Membership> = self.client.get_json(url).await?;

        debug!(customer_id = %customer_id, memberships = memberships.len(), "Fetched memberships");
        Ok(memberships)
    }

    async fn price_adjustments(
        &self,
        customer_id: &str,
        as_of: &DateTime<Utc>,
    ) -> Result<Vec<CustomerPriceAdjustment>, UpstreamError> {
        let url = self.price_adjustments_url(customer_id, as_of)?;
        let adjustments: Vec<CustomerPriceAdjustment> = self.client.get_json(url).await?;

        debug!(
            customer_id = %customer_id,
            adjustments = adjustments.len(),
            "Fetched customer price adjustments"
        );
        Ok(adjustments)
    }
}
