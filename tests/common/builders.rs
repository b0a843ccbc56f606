//! Test builders — ergonomic constructors for selection states and field
//! configurations.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use huefacet_core::{FieldConfig, Hsl, SelectionState};

// ---------------------------------------------------------------------------
// SelectionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`SelectionState`] fixtures.
///
/// ```rust
/// let state = SelectionBuilder::new()
///     .label("sky")
///     .colored("leaf", 120.0, 60.0, 40.0)
///     .build();
/// ```
#[derive(Default)]
pub struct SelectionBuilder {
    state: SelectionState,
}

impl SelectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: &str) -> Self {
        self.state.add_pair(label, None);
        self
    }

    pub fn colored(mut self, label: &str, h: f64, s: f64, l: f64) -> Self {
        self.state.add_pair(label, Some(Hsl::new(h, s, l)));
        self
    }

    pub fn build(self) -> SelectionState {
        self.state
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

/// `lbl` / `clr` fields, no nesting.
pub fn flat_config() -> FieldConfig {
    FieldConfig::new("lbl", "clr")
}

/// `lbl` / `clr` fields nested under `items`.
pub fn nested_config() -> FieldConfig {
    flat_config().with_label_path("items").nested(true)
}

/// Nested under `items`, counting parent documents.
pub fn parent_count_config() -> FieldConfig {
    nested_config().parent_doc_count(true)
}

/// Nested under `items`, colours one level deeper under `items.colors`.
pub fn double_nested_config() -> FieldConfig {
    nested_config().with_color_path("items.colors")
}
