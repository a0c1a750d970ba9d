//! Year-range resolution for the slider widget

use itertools::Itertools;

use mx_core::{CategorySpec, DataStore, EngineError, Scalar, SliderRange, StoreError};

/// Compute the selectable year range for a category from the distinct
/// year values present in its backing collection.
///
/// Categories without a time dimension get the degenerate range, as does
/// an empty distinct set or a collection whose shape has no year field.
/// Only an actual read failure is an error.
pub async fn resolve_range(
    spec: &CategorySpec,
    store: &dyn DataStore,
) -> Result<SliderRange, EngineError> {
    if !spec.supports_year_filter() {
        return Ok(SliderRange::degenerate());
    }

    let values = match store
        .distinct_values(&spec.collection, spec.shape.year_field())
        .await
    {
        Ok(values) => values,
        Err(StoreError::UnknownField { .. }) => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    let years: Vec<i64> = values
        .iter()
        .filter_map(Scalar::as_i64)
        .sorted_unstable()
        .dedup()
        .collect();
    if years.is_empty() {
        return Ok(SliderRange::degenerate());
    }

    // Keep only the most recent years; more marks than this are
    // unreadable on the widget.
    let start = years.len().saturating_sub(SliderRange::MAX_MARKS);
    let marks = years[start..].to_vec();
    let (min, max) = (marks[0], marks[marks.len() - 1]);
    Ok(SliderRange {
        min,
        max,
        marks,
        value: max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use mx_core::{CategoryRegistry, Record};

    fn year_record(year: i64) -> Record {
        Record::from_iter([
            ("primaryTitle".to_owned(), Scalar::Text(format!("Movie {}", year))),
            ("startYear".to_owned(), Scalar::Int(year)),
        ])
    }

    fn lookup(key: &str) -> CategorySpec {
        CategoryRegistry::imdb().lookup(key).unwrap().clone()
    }

    #[tokio::test]
    async fn test_range_from_distinct_years() {
        let store = MemoryStore::new().with_collection(
            "top_movies",
            vec![year_record(2004), year_record(2001), year_record(2007), year_record(2001)],
        );
        let range = resolve_range(&lookup("top_movies"), &store).await.unwrap();
        assert_eq!(range.marks, [2001, 2004, 2007]);
        assert_eq!(range.min, 2001);
        assert_eq!(range.max, 2007);
        assert_eq!(range.value, 2007);
    }

    #[tokio::test]
    async fn test_marks_cap_at_most_recent_25() {
        let records: Vec<Record> = (1970..2021).map(year_record).collect();
        let store = MemoryStore::new().with_collection("top_movies", records);
        let range = resolve_range(&lookup("top_movies"), &store).await.unwrap();

        assert_eq!(range.marks.len(), SliderRange::MAX_MARKS);
        assert_eq!(range.min, 1996);
        assert_eq!(range.max, 2020);
        assert!(range.marks.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn test_time_series_category_is_degenerate() {
        let store = MemoryStore::new();
        let range = resolve_range(&lookup("movies_count"), &store).await.unwrap();
        assert!(range.is_degenerate());
    }

    #[tokio::test]
    async fn test_empty_collection_is_degenerate() {
        let store = MemoryStore::new().with_collection("top_movies", Vec::new());
        let range = resolve_range(&lookup("top_movies"), &store).await.unwrap();
        assert!(range.is_degenerate());
    }

    #[tokio::test]
    async fn test_missing_collection_is_store_failure() {
        let store = MemoryStore::new();
        let err = resolve_range(&lookup("top_movies"), &store).await.unwrap_err();
        assert!(matches!(err, EngineError::StoreUnavailable(_)));
    }
}
