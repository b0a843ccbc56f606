//! Query compiler — turns a [`SelectionState`] and a [`FieldConfig`] into
//! search-engine fragments.
//!
//! Two fragments are produced:
//!
//! - [`build_aggregation`]: a `terms` aggregation on the label field, wrapped
//!   in `nested` (and `reverse_nested` for parent-level counts) according to
//!   the configuration.
//! - [`build_filter_query`]: a `bool`/`must` list with one clause per active
//!   pair. Pairs are conjunctive: a document must satisfy every selection.
//!
//! Colour matching uses a symmetric ±20 % band around each picked HSL
//! component. A component of `0` therefore matches only `0`.
//!
//! # Aggregation shapes
//!
//! | nested | label path | parent count | shape |
//! |--------|------------|--------------|-------|
//! | no     | any        | any          | `terms` |
//! | yes    | set        | no           | `nested → aggs.<key>: terms` |
//! | yes    | set        | yes          | `nested → aggs.labels: terms → aggs.files: reverse_nested` |
//! | yes    | unset      | any          | `terms` |

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::{FieldConfig, OrderDirection};
use crate::request::SearchQuery;
use crate::selection::SelectionState;
use crate::types::{Hsl, SelectionPair};

/// Relative half-width of the colour match band.
pub const TOLERANCE: f64 = 0.2;

/// Sub-aggregation key for the terms bucket in the reverse-nested shape.
pub const LABELS_KEY: &str = "labels";
/// Sub-aggregation key for the `reverse_nested` hop.
pub const FILES_KEY: &str = "files";

// ---------------------------------------------------------------------------
// Query DSL
// ---------------------------------------------------------------------------

/// The subset of the engine's query DSL the facet emits.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Term { field: String, value: String },
    Range { field: String, gte: f64, lte: f64 },
    Bool { must: Vec<Query> },
    Nested { path: String, query: Box<Query> },
}

impl Query {
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn range(field: impl Into<String>, gte: f64, lte: f64) -> Self {
        Query::Range {
            field: field.into(),
            gte,
            lte,
        }
    }

    pub fn must(clauses: Vec<Query>) -> Self {
        Query::Bool { must: clauses }
    }

    pub fn nested(path: impl Into<String>, query: Query) -> Self {
        Query::Nested {
            path: path.into(),
            query: Box::new(query),
        }
    }

    /// Engine JSON for this clause.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("query clauses always serialize")
    }
}

#[derive(Serialize)]
struct RangeBounds {
    gte: f64,
    lte: f64,
}

#[derive(Serialize)]
struct BoolBody<'a> {
    must: &'a [Query],
}

#[derive(Serialize)]
struct NestedQueryBody<'a> {
    path: &'a str,
    query: &'a Query,
}

/// A single-entry object `{ key: value }` keyed by a runtime field name.
struct Keyed<'a, V>(&'a str, V);

impl<V: Serialize> Serialize for Keyed<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, &self.1)?;
        map.end()
    }
}

/// `{}`
struct Empty;

impl Serialize for Empty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_map(Some(0))?.end()
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Query::Term { field, value } => {
                map.serialize_entry("term", &Keyed(field, value))?;
            }
            Query::Range { field, gte, lte } => {
                map.serialize_entry("range", &Keyed(field, RangeBounds { gte: *gte, lte: *lte }))?;
            }
            Query::Bool { must } => {
                map.serialize_entry("bool", &BoolBody { must })?;
            }
            Query::Nested { path, query } => {
                map.serialize_entry("nested", &NestedQueryBody { path, query })?;
            }
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Aggregation DSL
// ---------------------------------------------------------------------------

/// The subset of the engine's aggregation DSL the facet emits.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    Terms {
        field: String,
        size: usize,
        order: Option<(String, OrderDirection)>,
        aggs: Aggregations,
    },
    Nested {
        path: String,
        aggs: Aggregations,
    },
    ReverseNested,
}

impl Aggregation {
    /// The label terms aggregation described by `config`, without any
    /// sub-aggregations.
    pub fn label_terms(config: &FieldConfig) -> Self {
        let order = config
            .order_key
            .as_ref()
            .map(|key| (key.clone(), config.order_direction.unwrap_or_default()));
        Aggregation::Terms {
            field: config.label_field.clone(),
            size: config.aggregation_size,
            order,
            aggs: Aggregations::new(),
        }
    }

    pub fn nested(path: impl Into<String>, aggs: Aggregations) -> Self {
        Aggregation::Nested {
            path: path.into(),
            aggs,
        }
    }

    /// Attach a sub-aggregation under `key`. Only `terms` and `nested` carry
    /// children: on `ReverseNested` this does nothing and `sub` is dropped.
    pub fn with_sub(mut self, key: impl Into<String>, sub: Aggregation) -> Self {
        match &mut self {
            Aggregation::Terms { aggs, .. } | Aggregation::Nested { aggs, .. } => {
                aggs.insert(key, sub);
            }
            Aggregation::ReverseNested => {}
        }
        self
    }
}

#[derive(Serialize)]
struct TermsBody<'a> {
    field: &'a str,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<Keyed<'a, &'static str>>,
}

#[derive(Serialize)]
struct NestedAggBody<'a> {
    path: &'a str,
}

impl Serialize for Aggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Aggregation::Terms {
                field,
                size,
                order,
                aggs,
            } => {
                let order = order.as_ref().map(|(key, dir)| Keyed(key.as_str(), dir.as_str()));
                map.serialize_entry("terms", &TermsBody { field, size: *size, order })?;
                if !aggs.is_empty() {
                    map.serialize_entry("aggs", aggs)?;
                }
            }
            Aggregation::Nested { path, aggs } => {
                map.serialize_entry("nested", &NestedAggBody { path })?;
                if !aggs.is_empty() {
                    map.serialize_entry("aggs", aggs)?;
                }
            }
            Aggregation::ReverseNested => {
                map.serialize_entry("reverse_nested", &Empty)?;
            }
        }
        map.end()
    }
}

/// Named aggregations, as they appear under an `aggs` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Aggregations(BTreeMap<String, Aggregation>);

impl Aggregations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: impl Into<String>, agg: Aggregation) -> Self {
        let mut aggs = Self::new();
        aggs.insert(key, agg);
        aggs
    }

    pub fn insert(&mut self, key: impl Into<String>, agg: Aggregation) {
        self.0.insert(key.into(), agg);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn extend(&mut self, other: Aggregations) {
        self.0.extend(other.0);
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("aggregations always serialize")
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the label-count aggregation, keyed by `config.aggregation_key`.
pub fn build_aggregation(config: &FieldConfig) -> Aggregations {
    let terms = Aggregation::label_terms(config);
    let key = config.aggregation_key.as_str();

    let agg = match config.aggregation_scope() {
        Some(path) if config.parent_doc_count => Aggregation::nested(
            path,
            Aggregations::single(LABELS_KEY, terms.with_sub(FILES_KEY, Aggregation::ReverseNested)),
        ),
        Some(path) => Aggregation::nested(path, Aggregations::single(key, terms)),
        None => terms,
    };

    tracing::debug!(
        key,
        scope = ?config.aggregation_scope(),
        parent_doc_count = config.parent_doc_count,
        "query: aggregation built"
    );
    Aggregations::single(key, agg)
}

/// Build the filter fragment for the active selections.
///
/// Returns `None` when nothing is selected, in which case the search query
/// must be left untouched.
pub fn build_filter_query(state: &SelectionState, config: &FieldConfig) -> Option<Query> {
    if !state.has_selections() {
        return None;
    }

    let must: Vec<Query> = state.iter().map(|pair| pair_clause(pair, config)).collect();
    tracing::debug!(clauses = must.len(), "query: filter built");
    Some(Query::must(must))
}

/// `[value - value * 0.2, value + value * 0.2]`.
pub fn tolerance_band(value: f64) -> (f64, f64) {
    (value - value * TOLERANCE, value + value * TOLERANCE)
}

/// Range clauses for the hue, saturation and lightness sub-fields.
pub fn color_ranges(color: &Hsl, config: &FieldConfig) -> Vec<Query> {
    color
        .components()
        .into_iter()
        .map(|(component, value)| {
            let (gte, lte) = tolerance_band(value);
            Query::range(config.color_component_field(component), gte, lte)
        })
        .collect()
}

fn pair_clause(pair: &SelectionPair, config: &FieldConfig) -> Query {
    let term = Query::term(&config.label_field, &pair.label);

    let clause = match &pair.color {
        None => term,
        Some(color) => {
            let ranges = color_ranges(color, config);
            match config.color_scope() {
                Some(path) => Query::must(vec![term, Query::nested(path, Query::must(ranges))]),
                None => {
                    let mut must = Vec::with_capacity(4);
                    must.push(term);
                    must.extend(ranges);
                    Query::must(must)
                }
            }
        }
    };

    match config.label_field_path.as_deref() {
        Some(path) => Query::nested(path, clause),
        None => clause,
    }
}

// ---------------------------------------------------------------------------
// Handing fragments to the search query
// ---------------------------------------------------------------------------

/// Set the label aggregation on `query` unless `load_aggregations` is off.
pub fn apply_aggregation<Q: SearchQuery>(query: Q, config: &FieldConfig) -> Q {
    if !config.load_aggregations {
        return query;
    }
    query.set_aggregations(build_aggregation(config))
}

/// Add the selection filter to `query`. With no selections `query` is
/// returned unchanged.
pub fn apply_filter<Q: SearchQuery>(query: Q, state: &SelectionState, config: &FieldConfig) -> Q {
    match build_filter_query(state, config) {
        Some(filter) => query.add_filter(filter),
        None => query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn nested_cfg() -> FieldConfig {
        FieldConfig::new("lbl", "clr").with_label_path("items").nested(true)
    }

    #[test]
    fn flat_terms_aggregation() {
        let aggs = build_aggregation(&FieldConfig::new("lbl", "clr"));
        insta::assert_json_snapshot!(aggs, @r#"
        {
          "colorPickerTerms": {
            "terms": {
              "field": "lbl",
              "size": 10
            }
          }
        }
        "#);
    }

    #[test]
    fn nested_terms_aggregation() {
        let aggs = build_aggregation(&nested_cfg().aggregation_size(25));
        insta::assert_json_snapshot!(aggs, @r#"
        {
          "colorPickerTerms": {
            "nested": {
              "path": "items"
            },
            "aggs": {
              "colorPickerTerms": {
                "terms": {
                  "field": "lbl",
                  "size": 25
                }
              }
            }
          }
        }
        "#);
    }

    #[test]
    fn reverse_nested_aggregation() {
        let aggs = build_aggregation(&nested_cfg().parent_doc_count(true));
        assert_eq!(
            aggs.to_json(),
            json!({
                "colorPickerTerms": {
                    "nested": { "path": "items" },
                    "aggs": {
                        "labels": {
                            "terms": { "field": "lbl", "size": 10 },
                            "aggs": { "files": { "reverse_nested": {} } }
                        }
                    }
                }
            })
        );
    }

    #[rstest]
    #[case::not_nested(FieldConfig::new("lbl", "clr").with_label_path("items"))]
    #[case::nested_without_path(FieldConfig::new("lbl", "clr").nested(true))]
    #[case::nested_without_path_parent(FieldConfig::new("lbl", "clr").nested(true).parent_doc_count(true))]
    fn degrades_to_flat_terms(#[case] config: FieldConfig) {
        assert_eq!(
            build_aggregation(&config).to_json(),
            json!({ "colorPickerTerms": { "terms": { "field": "lbl", "size": 10 } } })
        );
    }

    #[test]
    fn terms_order_is_emitted_when_configured() {
        let cfg = FieldConfig::new("lbl", "clr").order_by("_count", Some(OrderDirection::Desc));
        assert_eq!(
            build_aggregation(&cfg).to_json(),
            json!({ "colorPickerTerms": { "terms": {
                "field": "lbl", "size": 10, "order": { "_count": "desc" }
            } } })
        );

        let cfg = FieldConfig::new("lbl", "clr").order_by("_key", None);
        assert_eq!(
            build_aggregation(&cfg).to_json()["colorPickerTerms"]["terms"]["order"],
            json!({ "_key": "asc" })
        );
    }

    #[test]
    fn empty_selection_builds_no_filter() {
        assert_eq!(build_filter_query(&SelectionState::new(), &nested_cfg()), None);
    }

    #[test]
    fn coloured_pair_shares_label_scope() {
        let mut state = SelectionState::new();
        state.add_pair("red-ish", Some(Hsl::new(0.0, 100.0, 50.0)));

        let filter = build_filter_query(&state, &nested_cfg()).unwrap();
        assert_eq!(
            filter.to_json(),
            json!({ "bool": { "must": [
                { "nested": { "path": "items", "query": { "bool": { "must": [
                    { "term": { "lbl": "red-ish" } },
                    { "range": { "clr.h": { "gte": 0.0, "lte": 0.0 } } },
                    { "range": { "clr.s": { "gte": 80.0, "lte": 120.0 } } },
                    { "range": { "clr.l": { "gte": 40.0, "lte": 60.0 } } }
                ] } } } }
            ] } })
        );
    }

    #[test]
    fn distinct_colour_path_double_nests() {
        let cfg = nested_cfg().with_color_path("items.colors");
        let mut state = SelectionState::new();
        state.add_pair("leaf", Some(Hsl::new(100.0, 50.0, 50.0)));

        let filter = build_filter_query(&state, &cfg).unwrap();
        assert_eq!(
            filter,
            Query::must(vec![Query::nested(
                "items",
                Query::must(vec![
                    Query::term("lbl", "leaf"),
                    Query::nested(
                        "items.colors",
                        Query::must(vec![
                            Query::range("clr.h", 80.0, 120.0),
                            Query::range("clr.s", 40.0, 60.0),
                            Query::range("clr.l", 40.0, 60.0),
                        ])
                    ),
                ])
            )])
        );
    }

    #[test]
    fn same_colour_path_is_not_double_nested() {
        let cfg = nested_cfg().with_color_path("items");
        let mut state = SelectionState::new();
        state.add_pair("leaf", Some(Hsl::new(100.0, 50.0, 50.0)));

        let Query::Bool { must } = build_filter_query(&state, &cfg).unwrap() else {
            panic!("expected outer bool");
        };
        let Query::Nested { path, query } = &must[0] else {
            panic!("expected nested clause");
        };
        assert_eq!(path, "items");
        assert!(matches!(query.as_ref(), Query::Bool { must } if must.len() == 4));
    }

    #[test]
    fn uncoloured_pairs_are_conjunctive_terms() {
        let mut state = SelectionState::new();
        state.add_pair("a", None);
        state.add_pair("b", None);

        assert_eq!(
            build_filter_query(&state, &nested_cfg()).unwrap().to_json(),
            json!({ "bool": { "must": [
                { "nested": { "path": "items", "query": { "term": { "lbl": "a" } } } },
                { "nested": { "path": "items", "query": { "term": { "lbl": "b" } } } }
            ] } })
        );
    }

    #[test]
    fn missing_label_path_degrades_to_unscoped_clauses() {
        let mut state = SelectionState::new();
        state.add_pair("a", None);
        state.add_pair("b", Some(Hsl::new(10.0, 10.0, 10.0)));

        let filter = build_filter_query(&state, &FieldConfig::new("lbl", "clr")).unwrap();
        let json = filter.to_json();
        assert_eq!(json["bool"]["must"][0], json!({ "term": { "lbl": "a" } }));
        assert_eq!(json["bool"]["must"][1]["bool"]["must"][0], json!({ "term": { "lbl": "b" } }));
        assert!(json.to_string().find("nested").is_none());
    }

    #[test]
    fn colour_path_without_label_path_nests_only_colours() {
        let cfg = FieldConfig::new("lbl", "clr").with_color_path("colors");
        let mut state = SelectionState::new();
        state.add_pair("a", None);
        state.add_pair("b", Some(Hsl::new(100.0, 50.0, 50.0)));

        let filter = build_filter_query(&state, &cfg).unwrap();
        assert_eq!(
            filter,
            Query::must(vec![
                Query::term("lbl", "a"),
                Query::must(vec![
                    Query::term("lbl", "b"),
                    Query::nested(
                        "colors",
                        Query::must(vec![
                            Query::range("clr.h", 80.0, 120.0),
                            Query::range("clr.s", 40.0, 60.0),
                            Query::range("clr.l", 40.0, 60.0),
                        ])
                    ),
                ]),
            ])
        );
    }

    #[test]
    fn with_sub_attaches_to_terms_and_nested_only() {
        let terms = Aggregation::label_terms(&FieldConfig::new("lbl", "clr"))
            .with_sub(FILES_KEY, Aggregation::ReverseNested);
        assert_eq!(
            serde_json::to_value(&terms).unwrap(),
            json!({
                "terms": { "field": "lbl", "size": 10 },
                "aggs": { "files": { "reverse_nested": {} } }
            })
        );

        let hop = Aggregation::ReverseNested.with_sub("ignored", Aggregation::ReverseNested);
        assert_eq!(hop, Aggregation::ReverseNested);
    }

    #[rstest]
    #[case(0.0, (0.0, 0.0))]
    #[case(100.0, (80.0, 120.0))]
    #[case(50.0, (40.0, 60.0))]
    #[case(-10.0, (-8.0, -12.0))]
    fn tolerance_band_is_twenty_percent(#[case] value: f64, #[case] expected: (f64, f64)) {
        let (gte, lte) = tolerance_band(value);
        assert!((gte - expected.0).abs() < 1e-9, "gte {gte} != {}", expected.0);
        assert!((lte - expected.1).abs() < 1e-9, "lte {lte} != {}", expected.1);
    }
}
