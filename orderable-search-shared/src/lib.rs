//! # Orderable Search Shared
//!
//! This crate defines the data structures shared across the orderable search crates:
//! catalog products as served by the catalog service, supplier offerings, the search
//! documents stored in the index, and the membership and price adjustment records
//! consulted when pricing search hits for a customer.

pub mod types;

pub use types::catalog_product::{CatalogProduct, Category, ProductMetadata, ProductTypeAttribute};
pub use types::decimal::{decimal_from_value, decimal_to_value};
pub use types::offering::{CommercialFields, Offering, SupplierLink};
pub use types::price_adjustment::{
    Adjustment, AdjustmentType, CustomerPriceAdjustment, GroupPriceAdjustment, Membership,
};
pub use types::search_document::{SearchDocument, SearchHits};
