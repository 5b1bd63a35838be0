//! This module defines the core data structures used across orderable search.
//! Every type here mirrors the snake_case JSON exchanged with the upstream services.

pub mod catalog_product;
pub mod decimal;
pub mod offering;
pub mod price_adjustment;
pub mod search_document;

pub use catalog_product::CatalogProduct;
pub use offering::{CommercialFields, Offering};
pub use price_adjustment::{CustomerPriceAdjustment, GroupPriceAdjustment, Membership};
pub use search_document::{SearchDocument, SearchHits};
