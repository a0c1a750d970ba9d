//! Query values produced by the planner and consumed by stores

use serde::{Deserialize, Serialize};

use crate::value::Scalar;

/// User-selectable sort mode for ranked categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// The category's own primary ranked metric
    #[default]
    Relevance,
    /// Average rating, high to low
    Rating,
    /// Vote count, high to low
    Votes,
}

/// Sort direction for a query or pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A single equality predicate on one backing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: String,
    pub value: Scalar,
}

/// Field + direction a result set is ordered by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// A plain filter + projection + sort + limit read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindQuery {
    pub collection: String,
    /// Equality predicates, all of which must match. May be empty.
    pub filter: Vec<FilterClause>,
    /// Backing field names to retrieve, in output order.
    pub projection: Vec<String>,
    pub sort: SortKey,
    /// `None` means unbounded.
    pub limit: Option<u64>,
}

/// One stage of an aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Group records by `by`, keeping the maximum of `field`. Output
    /// records carry exactly the `by` and `field` columns.
    GroupMax { by: String, field: String },
    /// Order the running record set.
    Sort {
        field: String,
        direction: SortDirection,
    },
}

/// An ordered sequence of aggregation stages over one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineQuery {
    pub collection: String,
    pub stages: Vec<PipelineStage>,
}

/// A fully planned read operation.
///
/// Exactly one shape is produced per request: a simple query or an
/// aggregation pipeline, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuerySpec {
    Find(FindQuery),
    Pipeline(PipelineQuery),
}

impl QuerySpec {
    /// The backing collection this operation reads.
    pub fn collection(&self) -> &str {
        match self {
            QuerySpec::Find(q) => &q.collection,
            QuerySpec::Pipeline(q) => &q.collection,
        }
    }

    /// Column names every shaped row is expected to carry.
    pub fn output_columns(&self) -> Vec<String> {
        match self {
            QuerySpec::Find(q) => q.projection.clone(),
            QuerySpec::Pipeline(q) => q
                .stages
                .iter()
                .find_map(|stage| match stage {
                    PipelineStage::GroupMax { by, field } => {
                        Some(vec![by.clone(), field.clone()])
                    }
                    PipelineStage::Sort { .. } => None,
                })
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_output_columns_come_from_group_stage() {
        let spec = QuerySpec::Pipeline(PipelineQuery {
            collection: "top_budgets".into(),
            stages: vec![
                PipelineStage::GroupMax {
                    by: "startYear".into(),
                    field: "budget".into(),
                },
                PipelineStage::Sort {
                    field: "startYear".into(),
                    direction: SortDirection::Ascending,
                },
            ],
        });
        assert_eq!(spec.output_columns(), vec!["startYear", "budget"]);
    }
}
