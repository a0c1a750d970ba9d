//! Turns user selections into concrete read operations
//!
//! The planner performs no I/O: it is a pure function of its inputs plus
//! the immutable category metadata, which is what makes it independently
//! testable.

use crate::category::{CategoryShape, CategorySpec};
use crate::error::EngineError;
use crate::query::{
    FilterClause, FindQuery, PipelineQuery, PipelineStage, QuerySpec, SortDirection, SortKey,
    SortMode,
};
use crate::value::Scalar;

/// Plan the read operation for one user selection tuple.
///
/// Time-series shapes span the whole year axis, so `sort`, `limit` and
/// `year` only influence ranked shapes; passing them for a time series is
/// allowed and ignored.
pub fn plan(
    spec: &CategorySpec,
    sort: SortMode,
    limit: Option<u64>,
    year: Option<i64>,
) -> Result<QuerySpec, EngineError> {
    match &spec.shape {
        CategoryShape::TimeSeriesCount {
            year: year_field,
            count,
            title_type_field,
            title_type,
        } => Ok(QuerySpec::Find(FindQuery {
            collection: spec.collection.clone(),
            filter: vec![FilterClause {
                field: title_type_field.clone(),
                value: Scalar::Text(title_type.clone()),
            }],
            projection: vec![year_field.clone(), count.clone()],
            sort: SortKey {
                field: year_field.clone(),
                direction: SortDirection::Ascending,
            },
            limit: None,
        })),

        CategoryShape::TimeSeriesMax {
            year: year_field,
            metric,
        } => Ok(QuerySpec::Pipeline(PipelineQuery {
            collection: spec.collection.clone(),
            stages: vec![
                PipelineStage::GroupMax {
                    by: year_field.clone(),
                    field: metric.clone(),
                },
                PipelineStage::Sort {
                    field: year_field.clone(),
                    direction: SortDirection::Ascending,
                },
            ],
        })),

        CategoryShape::RankedEntities {
            entity,
            rating,
            votes,
            relevance,
            year: year_field,
        } => {
            let filter = ranked_year_filter(spec, year_field, year)?;
            let sort_field = match sort {
                SortMode::Rating => rating.clone(),
                SortMode::Votes => votes.clone(),
                SortMode::Relevance => relevance.clone(),
            };
            Ok(QuerySpec::Find(FindQuery {
                collection: spec.collection.clone(),
                filter,
                projection: vec![
                    entity.clone(),
                    rating.clone(),
                    votes.clone(),
                    relevance.clone(),
                ],
                sort: SortKey {
                    field: sort_field,
                    direction: SortDirection::Descending,
                },
                limit,
            }))
        }

        CategoryShape::DualMetricRanked {
            entity,
            rating,
            votes,
            first,
            second,
            relevance,
            year: year_field,
        } => {
            let filter = ranked_year_filter(spec, year_field, year)?;
            let sort_field = match sort {
                SortMode::Rating => rating.clone(),
                SortMode::Votes => votes.clone(),
                SortMode::Relevance => relevance.clone(),
            };
            Ok(QuerySpec::Find(FindQuery {
                collection: spec.collection.clone(),
                filter,
                projection: vec![
                    entity.clone(),
                    rating.clone(),
                    votes.clone(),
                    first.clone(),
                    second.clone(),
                ],
                sort: SortKey {
                    field: sort_field,
                    direction: SortDirection::Descending,
                },
                limit,
            }))
        }
    }
}

/// Year filter for ranked shapes. A missing year is an error only when
/// the shape actually filters by year.
fn ranked_year_filter(
    spec: &CategorySpec,
    year_field: &str,
    year: Option<i64>,
) -> Result<Vec<FilterClause>, EngineError> {
    match year {
        Some(value) => Ok(vec![FilterClause {
            field: year_field.to_owned(),
            value: Scalar::Int(value),
        }]),
        None if spec.supports_year_filter() => {
            Err(EngineError::MissingYear(spec.key.clone()))
        }
        None => Ok(Vec::new()),
    }
}
