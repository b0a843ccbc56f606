//! Domain-specific assertions for huefacet harnesses.
//!
//! These make it clear *which* facet invariant was violated rather than just
//! printing two unequal JSON blobs.

use serde_json::Value;

/// Assert that the label and colour views of a `SelectionState` line up.
///
/// ```rust
/// assert_lockstep!(state);
/// ```
#[macro_export]
macro_rules! assert_lockstep {
    ($state:expr) => {{
        let state: &huefacet_core::SelectionState = &$state;
        let labels = state.labels();
        let colors = state.colors();
        assert_eq!(
            labels.len(),
            colors.len(),
            "assert_lockstep! failed: {} labels vs {} colours",
            labels.len(),
            colors.len()
        );
        assert_eq!(labels.len(), state.len());
    }};
}

/// Assert that a rendered `range` clause on `field` contains `value`.
#[macro_export]
macro_rules! assert_range_contains {
    ($clause:expr, $field:expr, $value:expr) => {{
        let (gte, lte) = $crate::common::range_bounds(&$clause, $field);
        let value: f64 = $value;
        assert!(
            gte <= value && value <= lte,
            "assert_range_contains! failed: {} = {} outside [{}, {}]",
            $field,
            value,
            gte,
            lte
        );
    }};
}

/// Extract `(gte, lte)` from `{ "range": { field: { gte, lte } } }`.
pub fn range_bounds(clause: &Value, field: &str) -> (f64, f64) {
    let bounds = &clause["range"][field];
    let gte = bounds["gte"]
        .as_f64()
        .unwrap_or_else(|| panic!("range clause on {field} has no gte: {clause}"));
    let lte = bounds["lte"]
        .as_f64()
        .unwrap_or_else(|| panic!("range clause on {field} has no lte: {clause}"));
    (gte, lte)
}

/// The outer `bool.must` list of a rendered filter fragment.
pub fn must_clauses(filter: &Value) -> &Vec<Value> {
    filter["bool"]["must"]
        .as_array()
        .unwrap_or_else(|| panic!("filter is not a bool/must: {filter}"))
}

/// Relative float comparison for tolerance-band checks.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
