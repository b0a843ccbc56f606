//! huefacet-widget — headless model of the label / colour facet.
//!
//! [`FacetWidget`] owns the [`SelectionState`] for one facet instance plus
//! the presentation state the host renders from: which labels are checked,
//! which colour each label was given and which palette popover is open. The
//! host feeds [`WidgetEvent`]s in, reruns the search when told to, and draws
//! [`FacetWidget::rows`] from the returned buckets.

pub mod event;

use std::collections::{BTreeMap, BTreeSet};

use huefacet_core::{
    query, EditSession, FieldConfig, Hsl, LabelBucket, SearchQuery, SelectionState,
};
use serde::Serialize;

pub use event::{Outcome, WidgetEvent};

/// One renderable line of the facet list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub key: String,
    pub doc_count: u64,
    pub checked: bool,
    pub color: Option<Hsl>,
    pub picker_open: bool,
}

#[derive(Debug, Clone)]
pub struct FacetWidget {
    config: FieldConfig,
    state: SelectionState,
    checked: BTreeSet<String>,
    colors: BTreeMap<String, Hsl>,
    session: Option<EditSession>,
}

impl FacetWidget {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            state: SelectionState::new(),
            checked: BTreeSet::new(),
            colors: BTreeMap::new(),
            session: None,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn selections(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_checked(&self, label: &str) -> bool {
        self.checked.contains(label)
    }

    pub fn color_of(&self, label: &str) -> Option<Hsl> {
        self.colors.get(label).copied()
    }

    /// Label whose palette popover is open, if any.
    pub fn editing(&self) -> Option<&str> {
        self.session.as_ref().map(EditSession::label)
    }

    /// Handle a host event.
    pub fn handle(&mut self, event: WidgetEvent) -> Outcome {
        match event {
            WidgetEvent::LabelToggled { label, checked: true } => {
                if !self.checked.insert(label.clone()) {
                    return Outcome::Ignored;
                }
                tracing::debug!(label = %label, "widget: label checked");
                self.state.add_pair(label, None);
                Outcome::Search
            }
            WidgetEvent::LabelToggled { label, checked: false } => {
                if !self.checked.remove(&label) {
                    return Outcome::Ignored;
                }
                tracing::debug!(label = %label, "widget: label unchecked");
                self.colors.remove(&label);
                self.state.remove_label(&label);
                if self.editing() == Some(label.as_str()) {
                    self.session = None;
                }
                Outcome::Search
            }
            WidgetEvent::PaletteClicked(label) => {
                if self.editing() == Some(label.as_str()) {
                    self.session = None;
                } else {
                    tracing::debug!(label = %label, "widget: picker opened");
                    self.session = Some(EditSession::new(label));
                }
                Outcome::Redraw
            }
            WidgetEvent::ColorPicked(color) => {
                let Some(session) = self.session.take() else {
                    tracing::debug!("widget: colour picked with no open picker");
                    return Outcome::Ignored;
                };
                let label = session.label().to_string();
                let hsl = session.apply(color, &mut self.state);
                tracing::debug!(label = %label, color = %hsl, "widget: colour picked");
                self.checked.insert(label.clone());
                self.colors.insert(label, hsl);
                Outcome::Search
            }
            WidgetEvent::PickerClosed => match self.session.take() {
                Some(_) => Outcome::Redraw,
                None => Outcome::Ignored,
            },
            WidgetEvent::Reset => {
                self.state.reset();
                self.checked.clear();
                self.colors.clear();
                self.session = None;
                Outcome::Search
            }
        }
    }

    /// Apply this facet's aggregation and filter to `query`.
    pub fn compile<Q: SearchQuery>(&self, query: Q) -> Q {
        let query = query::apply_aggregation(query, &self.config);
        query::apply_filter(query, &self.state, &self.config)
    }

    /// Rows to render for the buckets returned by the last search.
    pub fn rows(&self, buckets: &[LabelBucket]) -> Vec<Row> {
        buckets
            .iter()
            .map(|b| Row {
                key: b.key.clone(),
                doc_count: b.doc_count,
                checked: self.is_checked(&b.key),
                color: self.color_of(&b.key),
                picker_open: self.editing() == Some(b.key.as_str()),
            })
            .collect()
    }
}
