//! Chart composition for the movie analytics engine
//!
//! Takes a category and its shaped [`ResultTable`](mx_core::ResultTable)
//! and produces the [`ChartSpec`] value the UI renders.

pub mod compose;
pub mod spec;

// Re-exports
pub use compose::compose;
pub use spec::{AxisLabels, ChartKind, ChartOption, ChartSpec, Series};
