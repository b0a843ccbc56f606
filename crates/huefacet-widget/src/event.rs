//! Semantic widget events — the host UI maps its checkbox, palette and
//! swatch-picker callbacks onto this vocabulary so the widget model never
//! touches a UI framework directly.
//!
//! | Host interaction                 | Event                          |
//! |----------------------------------|--------------------------------|
//! | label checkbox checked/unchecked | `LabelToggled { label, checked }` |
//! | palette icon clicked             | `PaletteClicked(label)`        |
//! | swatch picker change complete    | `ColorPicked(color)`           |
//! | click outside the popover        | `PickerClosed`                 |
//! | "Reset Filters" button           | `Reset`                        |

use huefacet_core::PickerColor;

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    LabelToggled { label: String, checked: bool },
    PaletteClicked(String),
    /// Raw picker output; saturation and lightness are fractions.
    ColorPicked(PickerColor),
    PickerClosed,
    Reset,
}

/// What the host must do after an event has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Selections changed: recompile the query and run the search.
    Search,
    /// Only presentation state changed.
    Redraw,
    /// The event had no effect.
    Ignored,
}
