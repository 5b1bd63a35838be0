//! Processor module for orderable search.
//!
//! Pure transformations shared by the synchronizers and the search proxy: building
//! index documents and resolving adjusted prices. Nothing here performs I/O.

mod document_builder;
mod price_resolver;

pub use document_builder::{build_document, DocumentBuilder, MergeStep, MERGE_ORDER};
pub use price_resolver::{resolve_price, PriceAdjustments};
