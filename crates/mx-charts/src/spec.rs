//! Chart specification values
//!
//! The engine stops at these values; turning them into pixels is the
//! renderer's business.

use serde::{Deserialize, Serialize};

use mx_core::Scalar;

/// The chart form a category resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Bar,
    Line,
    GroupedBar,
    /// The fixed placeholder used whenever no rows satisfy a request
    NoData,
}

/// User choice between bar and line rendering for time-series categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartOption {
    #[default]
    Bar,
    Line,
}

/// One plotted series: aligned x/y sequences with an optional per-point
/// color channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Legend label; `None` for a chart's only series
    pub name: Option<String>,
    pub x: Vec<Scalar>,
    pub y: Vec<f64>,
    /// Continuous color values, aligned with `x`/`y`
    pub color: Option<Vec<f64>>,
}

/// Axis captions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

/// A complete chart description handed back to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub axes: AxisLabels,
    pub series: Vec<Series>,
    /// Continuous color scale name for charts with a color channel
    pub color_scale: Option<String>,
}

impl ChartSpec {
    /// The fixed no-data placeholder: empty series, neutral axes, no
    /// title. The only way an unfulfillable chart reaches the caller.
    pub fn no_data() -> Self {
        Self {
            kind: ChartKind::NoData,
            title: None,
            axes: AxisLabels::default(),
            series: Vec::new(),
            color_scale: None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.kind == ChartKind::NoData
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_spec_has_empty_series() {
        let spec = ChartSpec::no_data();
        assert!(spec.is_no_data());
        assert!(spec.series.is_empty());
        assert_eq!(spec.title, None);
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ChartKind::GroupedBar).unwrap(),
            "\"grouped-bar\""
        );
        assert_eq!(
            serde_json::to_string(&ChartKind::NoData).unwrap(),
            "\"no-data\""
        );
    }
}
