//! Command-line selection syntax.
//!
//! A selection is written `LABEL` for a label-only filter or `LABEL@H,S,L`
//! with hue in degrees and saturation / lightness in percent, e.g.
//! `sky@200,50,60`. The last `@` separates the colour, so a label containing
//! `@` must always be followed by a colour: `user@host@200,50,60` parses,
//! `user@host` is rejected as a malformed colour.
//!
//! Components must be finite numbers.

use std::str::FromStr;

use huefacet_core::{Hsl, SelectionPair};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionArgError {
    #[error("selection label is empty")]
    EmptyLabel,

    #[error("expected three colour components H,S,L, got {0}")]
    ComponentCount(usize),

    #[error("invalid colour component {0:?}")]
    Component(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionArg {
    pub label: String,
    pub color: Option<Hsl>,
}

impl SelectionArg {
    pub fn into_pair(self) -> SelectionPair {
        SelectionPair::new(self.label, self.color)
    }
}

impl FromStr for SelectionArg {
    type Err = SelectionArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, color) = match s.rsplit_once('@') {
            Some((label, color)) => (label, Some(parse_hsl(color)?)),
            None => (s, None),
        };
        if label.trim().is_empty() {
            return Err(SelectionArgError::EmptyLabel);
        }
        Ok(Self {
            label: label.to_string(),
            color,
        })
    }
}

fn parse_hsl(raw: &str) -> Result<Hsl, SelectionArgError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let &[h, s, l] = parts.as_slice() else {
        return Err(SelectionArgError::ComponentCount(parts.len()));
    };
    Ok(Hsl::new(component(h)?, component(s)?, component(l)?))
}

fn component(v: &str) -> Result<f64, SelectionArgError> {
    v.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| SelectionArgError::Component(v.to_string()))
}
