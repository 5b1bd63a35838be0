//! HTTP supplier provider.
//!
//! - `GET /suppliers?supplies_product={product_id}` lists the suppliers of a product
//! - `GET /suppliers/{id}/price_adjustments?price_adjustment_group_id=..&date=..&linked_product_id[]=..`
//!   lists one group's adjustments for the given offerings

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::errors::UpstreamError;
use crate::http::client::JsonClient;
use crate::http::endpoint::EndpointConfig;
use crate::interfaces::SupplierProvider;
use crate::types::GroupAdjustmentQuery;
use crate::utils::format_as_of_date;
use orderable_search_shared::{GroupPriceAdjustment, SupplierLink};

/// Supplier provider backed by the suppliers API.
pub struct HttpSupplierProvider {
    client: JsonClient,
}

impl HttpSupplierProvider {
    pub fn new(endpoint: EndpointConfig) -> Result<Self, UpstreamError> {
        let client = JsonClient::new(endpoint)?;
        info!(url = %client.endpoint().base_url, "Created supplier provider");
        Ok(Self { client })
    }

    fn suppliers_url(&self, product_id: &str) -> Result<Url, UpstreamError> {
        let mut url = self.client.url(&["suppliers"])?;
        url.query_pairs_mut()
            .append_pair("supplies_product", product_id);
        Ok(url)
    }

    fn price_adjustments_url(&self, query: &GroupAdjustmentQuery) -> Result<Url, UpstreamError> {
        let mut url = self
            .client
            .url(&["suppliers", query.supplier_id.as_str(), "price_adjustments"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("price_adjustment_group_id", &query.price_adjustment_group_id)
                .append_pair("date", &format_as_of_date(&query.as_of));
            for id in &query.linked_product_ids {
                pairs.append_pair("linked_product_id[]", id);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl SupplierProvider for HttpSupplierProvider {
    async fn suppliers_of_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<SupplierLink>, UpstreamError> {
        let url = self.suppliers_url(product_id)?;
        let links: Vec<SupplierLink> = self.client.get_json(url).await?;

        debug!(product_id = %product_id, suppliers = links.len(), "Fetched suppliers of product");
        Ok(links)
    }

    async fn group_price_adjustments(
        &self,
        query: &GroupAdjustmentQuery,
    ) -> Result<Vec<GroupPriceAdjustment>, UpstreamError> {
        let url = self.price_adjustments_url(query)?;
        let adjustments: Vec<GroupPriceAdjustment> = self.client.get_json(url).await?;

        debug!(
            supplier_id = %query.supplier_id,
            group_id = %query.price_adjustment_group_id,
            adjustments = adjustments.len(),
            "Fetched group price adjustments"
        );
        Ok(adjustments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn provider() -> HttpSupplierProvider {
        HttpSupplierProvider::new(EndpointConfig::new("http://localhost:3333").unwrap()).unwrap()
    }

    #[test]
    fn test_suppliers_url() {
        assert_eq!(
            provider().suppliers_url("p1").unwrap().as_str(),
            "http://localhost:3333/suppliers?supplies_product=p1"
        );
    }

    #[test]
    fn test_price_adjustments_url() {
        let query = GroupAdjustmentQuery {
            supplier_id: "1".to_string(),
            price_adjustment_group_id: "group1".to_string(),
            as_of: Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap(),
            linked_product_ids: vec!["groupoverriden".to_string(), "noadjustment".to_string()],
        };

        let url = provider().price_adjustments_url(&query).unwrap();

        assert_eq!(url.path(), "/suppliers/1/price_adjustments");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("price_adjustment_group_id".to_string(), "group1".to_string()),
                ("date".to_string(), "2024-01-31T10:00:00.000Z".to_string()),
                ("linked_product_id[]".to_string(), "groupoverriden".to_string()),
                ("linked_product_id[]".to_string(), "noadjustment".to_string()),
            ]
        );
    }
}
