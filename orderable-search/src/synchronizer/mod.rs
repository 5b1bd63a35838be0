//! Synchronizers keeping index documents in step with their sources.
//!
//! - [`OfferingSynchronizer`] writes or deletes the single document of one offering.
//! - [`CatalogSynchronizer`] rebuilds every document of a changed catalog product.

mod catalog;
mod offering;

pub use catalog::{CatalogSynchronizer, PropagationSummary, DEFAULT_LOOKUP_CHUNK_SIZE};
pub use offering::OfferingSynchronizer;
