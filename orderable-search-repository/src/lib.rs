//! # Orderable Search Repository
//!
//! This crate provides traits and implementations for talking to the services
//! orderable search depends on: the search index, the catalog, the supplier
//! service, and the customer service. It includes the unified error type, the
//! collaborator interfaces, and reqwest-backed HTTP implementations of each.

pub mod config;
pub mod errors;
pub mod http;
pub mod interfaces;
pub mod service;
pub mod types;
pub mod utils;

pub use config::SearchIndexServiceConfig;
pub use errors::UpstreamError;
pub use http::{
    EndpointConfig, HttpCatalogProvider, HttpCustomerProvider, HttpSearchIndexProvider,
    HttpSupplierProvider,
};
pub use interfaces::{CatalogProvider, CustomerProvider, SearchIndexProvider, SupplierProvider};
pub use service::SearchIndexService;
pub use types::{BatchAction, BatchOperation, BatchOperationSummary, BatchRequest, GroupAdjustmentQuery};
pub use utils::format_as_of_date;
