//! In-process data store
//!
//! Holds collections as plain record vectors. This is the fake-store seam
//! the engine is tested through, and it doubles as a zero-setup backend
//! for demos.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use ahash::AHashMap;

use mx_core::{
    DataStore, FindQuery, PipelineQuery, Record, Scalar, SortDirection, StoreError,
};

use super::interpret_stages;

/// Read-only store over in-memory collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: AHashMap<String, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style collection registration for fixtures.
    pub fn with_collection(mut self, name: &str, records: Vec<Record>) -> Self {
        self.insert_collection(name, records);
        self
    }

    pub fn insert_collection(&mut self, name: &str, records: Vec<Record>) {
        self.collections.insert(name.to_owned(), records);
    }

    fn collection(&self, name: &str) -> Result<&[Record], StoreError> {
        self.collections
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::UnknownCollection(name.to_owned()))
    }

    /// A field no record of the collection carries does not exist for
    /// this collection's shape.
    fn check_field(
        records: &[Record],
        collection: &str,
        field: &str,
    ) -> Result<(), StoreError> {
        if records.is_empty() || records.iter().any(|record| record.contains_key(field)) {
            Ok(())
        } else {
            Err(StoreError::UnknownField {
                collection: collection.to_owned(),
                field: field.to_owned(),
            })
        }
    }
}

#[async_trait::async_trait]
impl DataStore for MemoryStore {
    async fn run_query(&self, query: &FindQuery) -> Result<Vec<Record>, StoreError> {
        let records = self.collection(&query.collection)?;
        for clause in &query.filter {
            Self::check_field(records, &query.collection, &clause.field)?;
        }
        Self::check_field(records, &query.collection, &query.sort.field)?;

        let mut matched: Vec<&Record> = records
            .iter()
            .filter(|record| {
                query.filter.iter().all(|clause| {
                    record
                        .get(&clause.field)
                        .and_then(|value| value.compare(&clause.value))
                        == Some(Ordering::Equal)
                })
            })
            .collect();

        // Stable sort: ties and incomparable values keep insertion order,
        // records without the sort field go last.
        matched.sort_by(|a, b| {
            let ordering = match (a.get(&query.sort.field), b.get(&query.sort.field)) {
                (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            match query.sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        if let Some(limit) = query.limit {
            matched.truncate(limit as usize);
        }

        Ok(matched
            .into_iter()
            .map(|record| project(record, &query.projection))
            .collect())
    }

    async fn run_pipeline(&self, pipeline: &PipelineQuery) -> Result<Vec<Record>, StoreError> {
        let records = self.collection(&pipeline.collection)?;
        let (group, order) = interpret_stages(&pipeline.stages)?;
        Self::check_field(records, &pipeline.collection, group.by)?;
        Self::check_field(records, &pipeline.collection, group.field)?;

        // Integer group keys keep the map ordered by year out of the box.
        let mut maxima: BTreeMap<i64, Scalar> = BTreeMap::new();
        for record in records {
            let Some(key) = record.get(group.by).and_then(Scalar::as_i64) else {
                continue;
            };
            let Some(value) = record.get(group.field) else {
                continue;
            };
            match maxima.get(&key) {
                Some(current) if current.compare(value) != Some(Ordering::Less) => {}
                _ => {
                    maxima.insert(key, value.clone());
                }
            }
        }

        let mut output: Vec<Record> = maxima
            .into_iter()
            .map(|(key, value)| {
                let mut record = Record::new();
                record.insert(group.by.to_owned(), Scalar::Int(key));
                record.insert(group.field.to_owned(), value);
                record
            })
            .collect();

        if let Some(sort) = order {
            if sort.field != group.by && sort.field != group.field {
                return Err(StoreError::UnsupportedPipeline(format!(
                    "sort field '{}' is not produced by the group stage",
                    sort.field
                )));
            }
            output.sort_by(|a, b| {
                let ordering = match (a.get(sort.field), b.get(sort.field)) {
                    (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        Ok(output)
    }

    async fn distinct_values(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<Scalar>, StoreError> {
        let records = self.collection(collection)?;
        Self::check_field(records, collection, field)?;

        let mut values: Vec<Scalar> = Vec::new();
        for record in records {
            if let Some(value) = record.get(field) {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }
        Ok(values)
    }
}

fn project(record: &Record, projection: &[String]) -> Record {
    projection
        .iter()
        .filter_map(|field| {
            record
                .get(field)
                .map(|value| (field.clone(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_core::{FilterClause, PipelineStage, SortKey};

    fn movie(title: &str, rating: f64, votes: i64, total: i64, year: i64) -> Record {
        Record::from_iter([
            ("primaryTitle".to_owned(), Scalar::Text(title.to_owned())),
            ("averageRating".to_owned(), Scalar::Float(rating)),
            ("numVotes".to_owned(), Scalar::Int(votes)),
            ("totalRatings".to_owned(), Scalar::Int(total)),
            ("startYear".to_owned(), Scalar::Int(year)),
        ])
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_collection(
            "top_movies",
            vec![
                movie("Alpha", 8.1, 1200, 5000, 2020),
                movie("Beta", 7.4, 3400, 9000, 2020),
                movie("Gamma", 9.0, 800, 2000, 2020),
                movie("Delta", 6.5, 9100, 7000, 2019),
            ],
        )
    }

    fn ranked_query(sort_field: &str, limit: Option<u64>) -> FindQuery {
        FindQuery {
            collection: "top_movies".into(),
            filter: vec![FilterClause {
                field: "startYear".into(),
                value: Scalar::Int(2020),
            }],
            projection: vec!["primaryTitle".into(), sort_field.to_owned()],
            sort: SortKey {
                field: sort_field.to_owned(),
                direction: SortDirection::Descending,
            },
            limit,
        }
    }

    #[tokio::test]
    async fn test_filter_sort_limit() {
        let records = store()
            .run_query(&ranked_query("totalRatings", Some(2)))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["primaryTitle"], Scalar::Text("Beta".into()));
        assert_eq!(records[1]["primaryTitle"], Scalar::Text("Alpha".into()));
    }

    #[tokio::test]
    async fn test_sort_field_absent_from_collection() {
        let err = store()
            .run_query(&ranked_query("budget", None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownField { field, .. } if field == "budget"));
    }

    #[tokio::test]
    async fn test_unknown_collection() {
        let err = store()
            .distinct_values("top_podcasts", "startYear")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownCollection(_)));
    }

    #[tokio::test]
    async fn test_group_max_orders_by_year() {
        let pipeline = PipelineQuery {
            collection: "top_movies".into(),
            stages: vec![
                PipelineStage::GroupMax {
                    by: "startYear".into(),
                    field: "numVotes".into(),
                },
                PipelineStage::Sort {
                    field: "startYear".into(),
                    direction: SortDirection::Ascending,
                },
            ],
        };
        let records = store().run_pipeline(&pipeline).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["startYear"], Scalar::Int(2019));
        assert_eq!(records[0]["numVotes"], Scalar::Int(9100));
        assert_eq!(records[1]["startYear"], Scalar::Int(2020));
        assert_eq!(records[1]["numVotes"], Scalar::Int(3400));
    }

    #[tokio::test]
    async fn test_distinct_values_deduplicate() {
        let years = store()
            .distinct_values("top_movies", "startYear")
            .await
            .unwrap();
        assert_eq!(years.len(), 2);
        assert!(years.contains(&Scalar::Int(2020)));
        assert!(years.contains(&Scalar::Int(2019)));
    }
}
