//! Dependency initialization and wiring for orderable search.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::consumer::LineConsumer;
use crate::dispatcher::JobDispatcher;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::search::SearchProxy;
use crate::synchronizer::{CatalogSynchronizer, OfferingSynchronizer};
use crate::IndexingError;
use orderable_search_repository::{
    EndpointConfig, HttpCatalogProvider, HttpCustomerProvider, HttpSearchIndexProvider,
    HttpSupplierProvider, SearchIndexService, SearchIndexServiceConfig, UpstreamError,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// Customer-priced search over the same index the orchestrator writes to.
    ///
    /// Handle for the HTTP routing layer that serves search requests. The job
    /// runner binary does not serve search and leaves it unused.
    pub search_proxy: Arc<SearchProxy>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`Settings::from_env`] for the variables read.
    pub async fn new() -> Result<Self, IndexingError> {
        Self::from_settings(&Settings::from_env())
    }

    /// Wire all components from already-read settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError::ConfigError)` - If a URL is invalid or an HTTP client cannot be built
    pub fn from_settings(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            search_api_url = %settings.search_api_url,
            products_api_url = %settings.products_api_url,
            suppliers_api_url = %settings.suppliers_api_url,
            customers_api_url = %settings.customers_api_url,
            search_index_name = %settings.search_index_name,
            upstream_timeout_secs = settings.upstream_timeout.as_secs(),
            max_batch_size = ?settings.max_batch_size,
            lookup_chunk_size = settings.lookup_chunk_size,
            "Initializing dependencies"
        );

        let search_endpoint = endpoint(
            "search index",
            &settings.search_api_url,
            settings.search_api_token.clone(),
            settings,
        )?;
        let search_provider =
            HttpSearchIndexProvider::new(search_endpoint, settings.search_index_name.clone())
                .map_err(|e| client_error("search index", e))?;

        let index_config = SearchIndexServiceConfig {
            max_batch_size: settings.max_batch_size,
        };
        let index = Arc::new(SearchIndexService::with_config(
            Box::new(search_provider),
            index_config,
        ));

        let catalog = HttpCatalogProvider::new(upstream_endpoint(
            "catalog",
            &settings.products_api_url,
            settings,
        )?)
        .map_err(|e| client_error("catalog", e))?;
        let suppliers = HttpSupplierProvider::new(upstream_endpoint(
            "supplier",
            &settings.suppliers_api_url,
            settings,
        )?)
        .map_err(|e| client_error("supplier", e))?;
        let customers = HttpCustomerProvider::new(upstream_endpoint(
            "customer",
            &settings.customers_api_url,
            settings,
        )?)
        .map_err(|e| client_error("customer", e))?;

        let suppliers = Arc::new(suppliers);

        let offerings = Arc::new(OfferingSynchronizer::new(Arc::new(catalog), index.clone()));
        let catalog_sync = Arc::new(
            CatalogSynchronizer::new(suppliers.clone(), index.clone())
                .with_lookup_chunk_size(settings.lookup_chunk_size),
        );
        let dispatcher = JobDispatcher::new(offerings, catalog_sync);

        let search_proxy = Arc::new(SearchProxy::new(index, Arc::new(customers), suppliers));

        let orchestrator = Orchestrator::with_config(
            Arc::new(LineConsumer::stdin()),
            dispatcher,
            OrchestratorConfig {
                channel_buffer_size: settings.job_channel_buffer_size,
                ..OrchestratorConfig::default()
            },
        );

        info!("Dependencies wired");

        Ok(Self {
            orchestrator,
            search_proxy,
        })
    }
}

fn upstream_endpoint(
    service: &str,
    url: &str,
    settings: &Settings,
) -> Result<EndpointConfig, IndexingError> {
    endpoint(service, url, settings.upstream_api_token.clone(), settings)
}

fn endpoint(
    service: &str,
    url: &str,
    token: Option<String>,
    settings: &Settings,
) -> Result<EndpointConfig, IndexingError> {
    let endpoint = EndpointConfig::new(url)
        .map_err(|e| IndexingError::config(format!("Invalid {} URL: {}", service, e)))?;

    Ok(endpoint
        .with_bearer_token(token)
        .with_timeout(settings.upstream_timeout))
}

fn client_error(service: &str, error: UpstreamError) -> IndexingError {
    IndexingError::config(format!("Failed to create {} client: {}", service, error))
}
