//! huefacet-core — label / colour facet filtering core.
//!
//! This crate holds the only stateful piece of the facet ([`SelectionState`])
//! and the pure compiler that turns it into search-engine query fragments.
//!
//! # Architecture
//!
//! ```text
//! widget ──► SelectionState ──► query::build_filter_query ──► SearchQuery
//!                 FacetConfig ──► query::build_aggregation  ──┘
//!                                                               │
//!            response::parse_label_buckets ◄── engine response ◄┘
//! ```
//!
//! Everything here is synchronous and free of I/O apart from
//! [`config::FacetConfig::load`].

pub mod config;
pub mod error;
pub mod query;
pub mod request;
pub mod response;
pub mod selection;
pub mod types;

pub use config::{FacetConfig, FieldConfig, OrderDirection};
pub use error::ResponseError;
pub use query::{apply_aggregation, apply_filter, build_aggregation, build_filter_query, Aggregation, Aggregations, Query};
pub use request::{SearchQuery, SearchRequest};
pub use response::{parse_label_buckets, parse_response, LabelBucket};
pub use selection::{EditSession, SelectionState};
pub use types::{Hsl, PickerColor, SelectionPair};
