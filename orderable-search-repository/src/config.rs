//! Configuration types for the SearchIndexService.

/// Configuration for the SearchIndexService.
///
/// Bounds the size of a single batch upsert. A catalog product supplied by more
/// offerings than the limit is rejected as a whole rather than split, so a batch is
/// always either fully submitted or not submitted at all.
#[derive(Debug, Clone)]
pub struct SearchIndexServiceConfig {
    /// Maximum number of documents allowed in a single batch upsert.
    ///
    /// `None` disables the limit. Defaults to 1000.
    pub max_batch_size: Option<usize>,
}

impl Default for SearchIndexServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
        }
    }
}

impl SearchIndexServiceConfig {
    /// Create a config with no batch size limit.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
        }
    }

    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
        }
    }
}
