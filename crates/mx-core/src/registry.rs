//! The process-wide set of selectable categories

use indexmap::IndexMap;

use crate::category::{CategoryShape, CategorySpec};
use crate::error::EngineError;

/// Immutable category metadata, keyed by category key.
///
/// Built once at startup and passed into the engine; read-only afterwards,
/// so it is shared across concurrent evaluations without locking.
/// Iteration order is registration order, which is also dropdown order.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    specs: IndexMap<String, CategorySpec>,
}

impl CategoryRegistry {
    /// Build a registry from category descriptors.
    ///
    /// Panics on a duplicate key: the registry is startup configuration,
    /// and two specs under one key means the configuration itself is
    /// wrong.
    pub fn from_specs(specs: impl IntoIterator<Item = CategorySpec>) -> Self {
        let mut map = IndexMap::new();
        for spec in specs {
            let key = spec.key.clone();
            let previous = map.insert(key.clone(), spec);
            assert!(previous.is_none(), "duplicate category key '{}'", key);
        }
        Self { specs: map }
    }

    /// The built-in IMDB category set.
    pub fn imdb() -> Self {
        Self::from_specs([
            CategorySpec {
                key: "top_movies".into(),
                label: "Top Movies by Year".into(),
                collection: "top_movies".into(),
                shape: CategoryShape::RankedEntities {
                    entity: "primaryTitle".into(),
                    rating: "averageRating".into(),
                    votes: "numVotes".into(),
                    relevance: "totalRatings".into(),
                    year: "startYear".into(),
                },
            },
            CategorySpec {
                key: "top_tvshows".into(),
                label: "Top TV Shows by Year".into(),
                collection: "top_tvshows".into(),
                shape: CategoryShape::RankedEntities {
                    entity: "primaryTitle".into(),
                    rating: "averageRating".into(),
                    votes: "numVotes".into(),
                    relevance: "totalRatings".into(),
                    year: "startYear".into(),
                },
            },
            CategorySpec {
                key: "top_budgets".into(),
                label: "Top Movie Budgets by Year".into(),
                collection: "top_budgets".into(),
                shape: CategoryShape::DualMetricRanked {
                    entity: "primaryTitle".into(),
                    rating: "averageRating".into(),
                    votes: "numVotes".into(),
                    first: "budget".into(),
                    second: "revenue".into(),
                    relevance: "budget".into(),
                    year: "startYear".into(),
                },
            },
            CategorySpec {
                key: "top_revenues".into(),
                label: "Top Movie Revenues by Year".into(),
                collection: "top_revenues".into(),
                shape: CategoryShape::DualMetricRanked {
                    entity: "primaryTitle".into(),
                    rating: "averageRating".into(),
                    votes: "numVotes".into(),
                    first: "budget".into(),
                    second: "revenue".into(),
                    relevance: "revenue".into(),
                    year: "startYear".into(),
                },
            },
            CategorySpec {
                key: "movies_count".into(),
                label: "Number of Movies per Year".into(),
                collection: "titles_count".into(),
                shape: CategoryShape::TimeSeriesCount {
                    year: "startYear".into(),
                    count: "count".into(),
                    title_type_field: "titleType".into(),
                    title_type: "movie".into(),
                },
            },
            CategorySpec {
                key: "tvshows_count".into(),
                label: "Number of TV Shows per Year".into(),
                collection: "titles_count".into(),
                shape: CategoryShape::TimeSeriesCount {
                    year: "startYear".into(),
                    count: "count".into(),
                    title_type_field: "titleType".into(),
                    title_type: "tvSeries".into(),
                },
            },
            CategorySpec {
                key: "budgets_max".into(),
                label: "Highest Budget per Year".into(),
                collection: "top_budgets".into(),
                shape: CategoryShape::TimeSeriesMax {
                    year: "startYear".into(),
                    metric: "budget".into(),
                },
            },
            CategorySpec {
                key: "revenues_max".into(),
                label: "Highest Revenue per Year".into(),
                collection: "top_revenues".into(),
                shape: CategoryShape::TimeSeriesMax {
                    year: "startYear".into(),
                    metric: "revenue".into(),
                },
            },
        ])
    }

    /// Look up one category by key.
    pub fn lookup(&self, key: &str) -> Result<&CategorySpec, EngineError> {
        self.specs
            .get(key)
            .ok_or_else(|| EngineError::UnknownCategory(key.to_owned()))
    }

    /// All categories in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CategorySpec> {
        self.specs.values()
    }

    /// Category keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
