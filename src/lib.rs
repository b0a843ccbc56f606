//! huefacet — label / HSL colour facet filtering for document search.
//!
//! A user narrows a search by picking labels and, per label, an approximate
//! colour. The picks are compiled into a `terms` aggregation that counts
//! documents per label and a conjunctive `bool`/`must` filter that matches
//! the label and a ±20 % band around the picked hue, saturation and
//! lightness.
//!
//! # Architecture
//!
//! ```text
//! huefacet-widget ──► huefacet-core::SelectionState
//!                             │
//!                             ▼
//!                     huefacet-core::query ──► SearchQuery (engine client)
//! ```
//!
//! This crate re-exports both libraries and adds the command-line surface
//! used by the `huefacet` binary.

pub mod args;

pub use huefacet_core;
pub use huefacet_core::{
    build_aggregation, build_filter_query, FacetConfig, FieldConfig, Hsl, Query, SearchQuery,
    SearchRequest, SelectionState,
};
pub use huefacet_widget;

use args::SelectionArg;

/// Build a request body for `selections` under `config`.
pub fn compile_request(config: &FieldConfig, selections: &[SelectionArg], size: Option<usize>) -> SearchRequest {
    let state: SelectionState = selections.iter().cloned().map(SelectionArg::into_pair).collect();

    let mut request = SearchRequest::new();
    if let Some(size) = size {
        request = request.with_size(size);
    }
    let request = huefacet_core::apply_aggregation(request, config);
    huefacet_core::apply_filter(request, &state, config)
}
