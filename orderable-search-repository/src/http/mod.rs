//! HTTP implementations of the upstream collaborator interfaces.
//!
//! Every service speaks JSON over HTTP with bearer token auth. The shared request
//! and response handling lives in [`client`]; each service module only knows its
//! own paths and payloads.

mod catalog;
mod client;
mod customers;
mod endpoint;
mod search_index;
mod suppliers;

pub use catalog::HttpCatalogProvider;
pub use client::JsonClient;
pub use customers::HttpCustomerProvider;
pub use endpoint::{EndpointConfig, DEFAULT_TIMEOUT};
pub use search_index::{HttpSearchIndexProvider, DEFAULT_INDEX_NAME};
pub use suppliers::HttpSupplierProvider;
