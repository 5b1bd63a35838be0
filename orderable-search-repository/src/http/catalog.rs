//! HTTP catalog provider.

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::errors::UpstreamError;
use crate::http::client::JsonClient;
use crate::http::endpoint::EndpointConfig;
use crate::interfaces::CatalogProvider;
use orderable_search_shared::CatalogProduct;

/// Catalog provider backed by the products API.
pub struct HttpCatalogProvider {
    client: JsonClient,
}

impl HttpCatalogProvider {
    pub fn new(endpoint: EndpointConfig) -> Result<Self, UpstreamError> {
        let client = JsonClient::new(endpoint)?;
        info!(url = %client.endpoint().base_url, "Created catalog provider");
        Ok(Self { client })
    }

    /// `GET /products/{id}?expand[]=category`
    fn product_url(&self, product_id: &str) -> Result<Url, UpstreamError> {
        let mut url = self.client.url(&["products", product_id])?;
        url.query_pairs_mut().append_pair("expand[]", "category");
        Ok(url)
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn get_product(&self, product_id: &str) -> Result<CatalogProduct, UpstreamError> {
        let url = self.product_url(product_id)?;
        let product: CatalogProduct = self.client.get_json(url).await?;

        debug!(product_id = %product.id, "Fetched catalog product");
        Ok(product)
    }
}
