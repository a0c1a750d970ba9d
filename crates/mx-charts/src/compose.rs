//! Maps shaped tables to chart specifications
//!
//! One exhaustive dispatch over the category shape. The composer is
//! total: anything it cannot fulfil becomes the no-data placeholder, so a
//! partially built chart never reaches the caller.

use mx_core::{CategoryShape, CategorySpec, ResultTable};

use crate::spec::{AxisLabels, ChartKind, ChartOption, ChartSpec, Series};

/// Continuous scale applied to ranked charts' rating color channel.
const RATING_COLOR_SCALE: &str = "purples";

/// Compose the chart for one category and its shaped table.
///
/// `option` only matters for time-series shapes; `year` only feeds the
/// title of year-scoped shapes.
pub fn compose(
    spec: &CategorySpec,
    table: &ResultTable,
    option: ChartOption,
    year: Option<i64>,
) -> ChartSpec {
    if table.is_empty() {
        return ChartSpec::no_data();
    }

    match &spec.shape {
        CategoryShape::RankedEntities {
            entity,
            rating,
            relevance,
            ..
        } => {
            let (Some(x), Some(y), Some(color)) = (
                table.scalars(entity),
                table.numbers(relevance),
                table.numbers(rating),
            ) else {
                return ChartSpec::no_data();
            };
            ChartSpec {
                kind: ChartKind::Bar,
                title: Some(scoped_title(&spec.label, year)),
                axes: AxisLabels {
                    x: entity.clone(),
                    y: relevance.clone(),
                },
                series: vec![Series {
                    name: None,
                    x,
                    y,
                    color: Some(color),
                }],
                color_scale: Some(RATING_COLOR_SCALE.to_owned()),
            }
        }

        CategoryShape::DualMetricRanked {
            entity,
            first,
            second,
            ..
        } => {
            let (Some(x), Some(first_values), Some(second_values)) = (
                table.scalars(entity),
                table.numbers(first),
                table.numbers(second),
            ) else {
                return ChartSpec::no_data();
            };
            ChartSpec {
                kind: ChartKind::GroupedBar,
                title: Some(scoped_title(&spec.label, year)),
                axes: AxisLabels {
                    x: entity.clone(),
                    y: format!("{} / {}", first, second),
                },
                series: vec![
                    Series {
                        name: Some(first.clone()),
                        x: x.clone(),
                        y: first_values,
                        color: None,
                    },
                    Series {
                        name: Some(second.clone()),
                        x,
                        y: second_values,
                        color: None,
                    },
                ],
                color_scale: None,
            }
        }

        CategoryShape::TimeSeriesCount { year: year_field, count, .. } => {
            time_series(spec, table, option, year_field, count)
        }

        CategoryShape::TimeSeriesMax { year: year_field, metric } => {
            time_series(spec, table, option, year_field, metric)
        }
    }
}

fn time_series(
    spec: &CategorySpec,
    table: &ResultTable,
    option: ChartOption,
    year_field: &str,
    value_field: &str,
) -> ChartSpec {
    let (Some(x), Some(y)) = (table.scalars(year_field), table.numbers(value_field)) else {
        return ChartSpec::no_data();
    };
    ChartSpec {
        kind: match option {
            ChartOption::Bar => ChartKind::Bar,
            ChartOption::Line => ChartKind::Line,
        },
        // time series span all years, so no year in the title
        title: Some(spec.label.clone()),
        axes: AxisLabels {
            x: year_field.to_owned(),
            y: value_field.to_owned(),
        },
        series: vec![Series {
            name: None,
            x,
            y,
            color: None,
        }],
        color_scale: None,
    }
}

fn scoped_title(label: &str, year: Option<i64>) -> String {
    match year {
        Some(year) => format!("{} ({})", label, year),
        None => label.to_owned(),
    }
}
