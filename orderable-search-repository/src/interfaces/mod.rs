//! Interface definitions for the upstream collaborators.
//!
//! Each service orderable search talks to is abstracted behind a trait so the
//! synchronizers and the search proxy can be wired to HTTP clients in production
//! and to in-memory mocks in tests.

mod catalog_provider;
mod customer_provider;
mod search_index_provider;
mod supplier_provider;

pub use catalog_provider::CatalogProvider;
pub use customer_provider::CustomerProvider;
pub use search_index_provider::SearchIndexProvider;
pub use supplier_provider::SupplierProvider;
