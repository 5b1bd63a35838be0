//! Error types for the orderable search repository.
//!
//! This module provides a unified error type for every upstream call.

mod upstream_error;

pub use upstream_error::UpstreamError;
