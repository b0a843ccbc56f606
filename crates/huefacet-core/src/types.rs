//! Core value types shared by the selection model, the compiler and the
//! widget: the stored [`Hsl`] colour, the raw [`PickerColor`] emitted by a
//! colour picker, and the [`SelectionPair`] that ties a label to a colour.

use serde::{Deserialize, Serialize};

/// A colour as stored in the selection model.
///
/// Hue is in degrees `[0, 360]`; saturation and lightness are percentages
/// `[0, 100]`. Values are not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Scale raw picker output into the stored representation: hue is kept,
    /// saturation and lightness are multiplied by 100.
    pub fn from_picker(color: PickerColor) -> Self {
        Self {
            h: color.h,
            s: color.s * 100.0,
            l: color.l * 100.0,
        }
    }

    /// The three components paired with their sub-field suffixes, in the
    /// order range clauses are emitted.
    pub fn components(&self) -> [(&'static str, f64); 3] {
        [("h", self.h), ("s", self.s), ("l", self.l)]
    }
}

impl From<PickerColor> for Hsl {
    fn from(color: PickerColor) -> Self {
        Self::from_picker(color)
    }
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// Colour as emitted by a swatch picker: hue in degrees, saturation and
/// lightness as fractions `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickerColor {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// One active filter: a label and, once picked, its colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPair {
    pub label: String,
    pub color: Option<Hsl>,
}

impl SelectionPair {
    pub fn new(label: impl Into<String>, color: Option<Hsl>) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}
