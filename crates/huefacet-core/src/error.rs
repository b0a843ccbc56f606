//! Error types for huefacet-core.
//!
//! Selection and compilation are total and never fail. The only fallible
//! surface is reading bucket counts back out of an engine response.

use thiserror::Error;

/// Errors raised while reading label buckets from an engine response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    /// An aggregation expected at `path` is absent from the response.
    #[error("aggregation not found at {0}")]
    MissingAggregation(String),

    /// The aggregation at `path` has no `buckets` array.
    #[error("no buckets array at {0}")]
    MissingBuckets(String),

    /// A bucket lacks a usable key or count.
    #[error("malformed bucket {index} at {path}: {reason}")]
    MalformedBucket {
        path: String,
        index: usize,
        reason: &'static str,
    },
}
