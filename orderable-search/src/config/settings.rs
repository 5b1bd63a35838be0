//! Runtime settings read from the environment.

use std::env;
use std::time::Duration;

use tracing::warn;

const SEARCH_API_URL: &str = "SEARCH_API_URL";
const PRODUCTS_API_URL: &str = "PRODUCTS_API_URL";
const SUPPLIERS_API_URL: &str = "SUPPLIERS_API_URL";
const CUSTOMERS_API_URL: &str = "CUSTOMERS_API_URL";
const SEARCH_API_TOKEN: &str = "SEARCH_API_TOKEN";
const UPSTREAM_API_TOKEN: &str = "UPSTREAM_API_TOKEN";
const SEARCH_INDEX_NAME: &str = "SEARCH_INDEX_NAME";
const UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
const MAX_BATCH_SIZE: &str = "MAX_BATCH_SIZE";
const LOOKUP_CHUNK_SIZE: &str = "LOOKUP_CHUNK_SIZE";
const JOB_CHANNEL_BUFFER_SIZE: &str = "JOB_CHANNEL_BUFFER_SIZE";

const DEFAULT_SEARCH_API_URL: &str = "http://localhost:1111";
const DEFAULT_PRODUCTS_API_URL: &str = "http://localhost:2222";
const DEFAULT_SUPPLIERS_API_URL: &str = "http://localhost:3333";
const DEFAULT_CUSTOMERS_API_URL: &str = "http://localhost:4444";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_BATCH_SIZE: usize = 1000;
const DEFAULT_JOB_CHANNEL_BUFFER_SIZE: usize = 1000;

/// Everything the service reads from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub search_api_url: String,
    pub products_api_url: String,
    pub suppliers_api_url: String,
    pub customers_api_url: String,
    pub search_api_token: Option<String>,
    pub upstream_api_token: Option<String>,
    pub search_index_name: String,
    pub upstream_timeout: Duration,
    /// `None` when the limit is disabled with `MAX_BATCH_SIZE=0`.
    pub max_batch_size: Option<usize>,
    pub lookup_chunk_size: usize,
    pub job_channel_buffer_size: usize,
}

impl Settings {
    /// Read settings from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_API_URL`: Search index base URL (default: http://localhost:1111)
    /// - `PRODUCTS_API_URL`: Catalog service base URL (default: http://localhost:2222)
    /// - `SUPPLIERS_API_URL`: Supplier service base URL (default: http://localhost:3333)
    /// - `CUSTOMERS_API_URL`: Customer service base URL (default: http://localhost:4444)
    /// - `SEARCH_API_TOKEN`: Bearer token for the search index (optional)
    /// - `UPSTREAM_API_TOKEN`: Bearer token for the other services (optional)
    /// - `SEARCH_INDEX_NAME`: Index name (default: orderable-products)
    /// - `UPSTREAM_TIMEOUT_SECS`: Per-call timeout (default: 10)
    /// - `MAX_BATCH_SIZE`: Batch upsert limit, 0 disables it (default: 1000)
    /// - `LOOKUP_CHUNK_SIZE`: Ids per document lookup (default: 50)
    /// - `JOB_CHANNEL_BUFFER_SIZE`: Job channel capacity (default: 1000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let max_batch_size = match parse_or(&lookup, MAX_BATCH_SIZE, DEFAULT_MAX_BATCH_SIZE) {
            0 => None,
            max => Some(max),
        };

        Self {
            search_api_url: string_or(SEARCH_API_URL, DEFAULT_SEARCH_API_URL),
            products_api_url: string_or(PRODUCTS_API_URL, DEFAULT_PRODUCTS_API_URL),
            suppliers_api_url: string_or(SUPPLIERS_API_URL, DEFAULT_SUPPLIERS_API_URL),
            customers_api_url: string_or(CUSTOMERS_API_URL, DEFAULT_CUSTOMERS_API_URL),
            search_api_token: lookup(SEARCH_API_TOKEN),
            upstream_api_token: lookup(UPSTREAM_API_TOKEN),
            search_index_name: string_or(
                SEARCH_INDEX_NAME,
                orderable_search_repository::http::DEFAULT_INDEX_NAME,
            ),
            upstream_timeout: Duration::from_secs(parse_or(
                &lookup,
                UPSTREAM_TIMEOUT_SECS,
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )),
            max_batch_size,
            lookup_chunk_size: parse_or(
                &lookup,
                LOOKUP_CHUNK_SIZE,
                crate::synchronizer::DEFAULT_LOOKUP_CHUNK_SIZE,
            )
            .max(1),
            job_channel_buffer_size: parse_or(
                &lookup,
                JOB_CHANNEL_BUFFER_SIZE,
                DEFAULT_JOB_CHANNEL_BUFFER_SIZE,
            )
            .max(1),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, default = %default, "Invalid setting, using default");
                default
            }
        },
    }
}
