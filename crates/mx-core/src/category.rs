//! Category metadata: what each selectable analytics view reads and shows

use serde::{Deserialize, Serialize};

/// Discriminant of a category's data shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryKind {
    RankedEntities,
    TimeSeriesCount,
    TimeSeriesMax,
    DualMetricRanked,
}

/// A category's data shape together with the backing field names it reads.
///
/// This is the closed dispatch point of the engine: each component does
/// one exhaustive `match` over it, and a kind's required fields exist by
/// construction instead of by lookup in a loose field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CategoryShape {
    /// Top-K entities for a selected year, ranked by one metric.
    RankedEntities {
        /// Entity label field (x-axis), e.g. `primaryTitle`
        entity: String,
        /// Average rating field (color channel, rating sort)
        rating: String,
        /// Vote count field (votes sort)
        votes: String,
        /// The category's primary ranked metric; the `relevance` sort
        /// target, distinct per category
        relevance: String,
        /// Year field the query filters on
        year: String,
    },

    /// Top-K entities for a selected year with two side-by-side metrics.
    DualMetricRanked {
        entity: String,
        rating: String,
        votes: String,
        /// First of the paired metrics, e.g. `budget`
        first: String,
        /// Second of the paired metrics, e.g. `revenue`
        second: String,
        /// Which of the pair is the `relevance` sort target
        relevance: String,
        year: String,
    },

    /// Pre-counted records per year, filtered to one title type.
    TimeSeriesCount {
        year: String,
        count: String,
        /// Field holding the title type tag
        title_type_field: String,
        /// Fixed equality value, e.g. `movie` or `tvSeries`
        title_type: String,
    },

    /// Yearly maximum of one metric, computed by aggregation.
    TimeSeriesMax { year: String, metric: String },
}

impl CategoryShape {
    pub fn kind(&self) -> CategoryKind {
        match self {
            CategoryShape::RankedEntities { .. } => CategoryKind::RankedEntities,
            CategoryShape::DualMetricRanked { .. } => CategoryKind::DualMetricRanked,
            CategoryShape::TimeSeriesCount { .. } => CategoryKind::TimeSeriesCount,
            CategoryShape::TimeSeriesMax { .. } => CategoryKind::TimeSeriesMax,
        }
    }

    /// Whether requests against this shape are scoped to one year.
    /// Time-series shapes span the whole axis instead.
    pub fn supports_year_filter(&self) -> bool {
        matches!(
            self,
            CategoryShape::RankedEntities { .. } | CategoryShape::DualMetricRanked { .. }
        )
    }

    /// Whether the sort-mode selector applies to this shape.
    pub fn supports_sort_mode(&self) -> bool {
        matches!(
            self,
            CategoryShape::RankedEntities { .. } | CategoryShape::DualMetricRanked { .. }
        )
    }

    /// The backing field holding the year dimension.
    pub fn year_field(&self) -> &str {
        match self {
            CategoryShape::RankedEntities { year, .. }
            | CategoryShape::DualMetricRanked { year, .. }
            | CategoryShape::TimeSeriesCount { year, .. }
            | CategoryShape::TimeSeriesMax { year, .. } => year,
        }
    }
}

/// Immutable descriptor of one selectable category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Unique key, e.g. `top_movies`
    pub key: String,
    /// Human-readable label, e.g. `Top Movies by Year`
    pub label: String,
    /// Backing collection the category reads
    pub collection: String,
    pub shape: CategoryShape,
}

impl CategorySpec {
    pub fn kind(&self) -> CategoryKind {
        self.shape.kind()
    }

    pub fn supports_year_filter(&self) -> bool {
        self.shape.supports_year_filter()
    }

    pub fn supports_sort_mode(&self) -> bool {
        self.shape.supports_sort_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_series_shapes_ignore_year_filter() {
        let shape = CategoryShape::TimeSeriesCount {
            year: "startYear".into(),
            count: "count".into(),
            title_type_field: "titleType".into(),
            title_type: "movie".into(),
        };
        assert!(!shape.supports_year_filter());
        assert!(!shape.supports_sort_mode());
        assert_eq!(shape.kind(), CategoryKind::TimeSeriesCount);
        assert_eq!(shape.year_field(), "startYear");
    }
}
