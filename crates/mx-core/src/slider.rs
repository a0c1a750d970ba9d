//! Year-slider bounds returned to the UI layer

use serde::{Deserialize, Serialize};

/// Selectable year range for a category: bounds, tick marks and the
/// initially selected value.
///
/// Returned directly as a value; the UI wires it into its slider widget
/// without any serialization round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: i64,
    pub max: i64,
    /// The most recent distinct years seen in the backing collection,
    /// ascending, at most [`SliderRange::MAX_MARKS`] of them.
    pub marks: Vec<i64>,
    /// Initial selection; the most recent year.
    pub value: i64,
}

impl SliderRange {
    /// Upper bound on slider tick marks.
    pub const MAX_MARKS: usize = 25;

    /// The fixed range used for categories without a time dimension.
    pub fn degenerate() -> Self {
        Self {
            min: 0,
            max: 0,
            marks: vec![0],
            value: 0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        *self == Self::degenerate()
    }
}
