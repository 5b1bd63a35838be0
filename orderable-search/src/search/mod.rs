//! Customer-priced search.

mod proxy;

pub use proxy::SearchProxy;
