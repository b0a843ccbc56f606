//! Selection state — the ordered set of active (label, colour) filters.
//!
//! Pairs are kept in a single ordered sequence, so the label and colour
//! views returned by [`SelectionState::labels`] and [`SelectionState::colors`]
//! always have equal length and share indices. All operations are total:
//! removing a label that is not present is a no-op.
//!
//! Labels are not deduplicated. [`SelectionState::remove_label`] removes the
//! first pair carrying the label; callers that add the same label twice must
//! remove it twice.

use crate::types::{Hsl, PickerColor, SelectionPair};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pairs: Vec<SelectionPair>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair. No uniqueness check.
    pub fn add_pair(&mut self, label: impl Into<String>, color: Option<Hsl>) {
        let pair = SelectionPair::new(label, color);
        tracing::debug!(label = %pair.label, color = ?pair.color, len = self.pairs.len() + 1, "selection: pair added");
        self.pairs.push(pair);
    }

    /// Remove the first pair whose label equals `label`.
    pub fn remove_label(&mut self, label: &str) {
        if let Some(i) = self.position(label) {
            self.pairs.remove(i);
            tracing::debug!(label, index = i, len = self.pairs.len(), "selection: label removed");
        }
    }

    /// Replace the colour of the first pair whose label equals `label`.
    /// Returns `false` if no such pair exists.
    pub fn set_color(&mut self, label: &str, color: Option<Hsl>) -> bool {
        match self.position(label) {
            Some(i) => {
                self.pairs[i].color = color;
                tracing::debug!(label, index = i, color = ?color, "selection: colour set");
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.pairs.clear();
        tracing::debug!("selection: reset");
    }

    pub fn has_selections(&self) -> bool {
        !self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[SelectionPair] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectionPair> {
        self.pairs.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.pairs.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn colors(&self) -> Vec<Option<Hsl>> {
        self.pairs.iter().map(|p| p.color).collect()
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.pairs.iter().position(|p| p.label == label)
    }
}

impl FromIterator<SelectionPair> for SelectionState {
    fn from_iter<I: IntoIterator<Item = SelectionPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Edit session
// ---------------------------------------------------------------------------

/// The label whose colour is currently being picked.
///
/// Opened when the user clicks a label's palette and consumed when a colour
/// is chosen, so the label being edited travels with the operation instead
/// of living on the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    label: String,
}

impl EditSession {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Record `color` for the session's label. Updates the existing pair if
    /// the label is already selected, otherwise appends a new pair. Returns
    /// the stored colour.
    pub fn apply(self, color: PickerColor, state: &mut SelectionState) -> Hsl {
        let hsl = Hsl::from_picker(color);
        if !state.set_color(&self.label, Some(hsl)) {
            state.add_pair(self.label, Some(hsl));
        }
        hsl
    }
}
