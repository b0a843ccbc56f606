//! The search query the compiled fragments are handed to.
//!
//! The search client owns the real query object; the facet only needs the two
//! mutators captured by [`SearchQuery`]. [`SearchRequest`] is a plain
//! implementation that renders an engine request body.

use serde::Serialize;

use crate::query::{Aggregations, Query};

/// Mutators a search client's query builder exposes to facets.
pub trait SearchQuery: Sized {
    /// Merge `aggs` into the request's aggregations.
    fn set_aggregations(self, aggs: Aggregations) -> Self;

    /// AND `filter` into the request's query.
    fn add_filter(self, filter: Query) -> Self;
}

/// An engine request body under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    filters: Vec<Query>,
    aggs: Aggregations,
    size: Option<usize>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hits to return alongside the aggregations.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn filters(&self) -> &[Query] {
        &self.filters
    }

    pub fn aggregations(&self) -> &Aggregations {
        &self.aggs
    }

    /// The request's query: `None` with no filters, the single filter when
    /// there is one, otherwise a `bool`/`must` over all of them.
    pub fn query(&self) -> Option<Query> {
        match self.filters.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            many => Some(Query::must(many.to_vec())),
        }
    }

    /// Render the request body.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("search requests always serialize")
    }
}

#[derive(Serialize)]
struct MatchAll {
    match_all: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum QueryBody {
    MatchAll(MatchAll),
    Query(Query),
}

#[derive(Serialize)]
struct RequestBody<'a> {
    query: QueryBody,
    #[serde(skip_serializing_if = "Aggregations::is_empty")]
    aggs: &'a Aggregations,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
}

impl Serialize for SearchRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let query = match self.query() {
            Some(q) => QueryBody::Query(q),
            None => QueryBody::MatchAll(MatchAll {
                match_all: serde_json::Map::new(),
            }),
        };
        RequestBody {
            query,
            aggs: &self.aggs,
            size: self.size,
        }
        .serialize(serializer)
    }
}

impl SearchQuery for SearchRequest {
    fn set_aggregations(mut self, aggs: Aggregations) -> Self {
        self.aggs.extend(aggs);
        self
    }

    fn add_filter(mut self, filter: Query) -> Self {
        self.filters.push(filter);
        self
    }
}
