//! The category-driven dispatch engine
//!
//! The facade the UI layer talks to: each user interaction becomes one
//! independent `plan → run → shape` evaluation plus a chart composition,
//! against an injected read-only store and an immutable category registry.
//! There is no shared mutable state between evaluations, so concurrent
//! sessions need no locking.

use std::sync::Arc;

use mx_charts::{compose, ChartOption, ChartSpec};
use mx_core::{
    planner, CategoryRegistry, DataStore, EngineError, ResultTable, SliderRange, SortMode,
};
use mx_data::{resolve_range, shape};

/// One engine instance per process is typical, but nothing here is
/// global: every capability is passed in.
pub struct Engine {
    registry: CategoryRegistry,
    store: Arc<dyn DataStore>,
}

impl Engine {
    pub fn new(registry: CategoryRegistry, store: Arc<dyn DataStore>) -> Self {
        Self { registry, store }
    }

    /// The category metadata, e.g. for populating the category dropdown.
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Resolve a selection tuple to a shaped table: plan the read, run it,
    /// normalize the records.
    pub async fn plan_and_run(
        &self,
        category: &str,
        sort: SortMode,
        limit: Option<u64>,
        year: Option<i64>,
    ) -> Result<ResultTable, EngineError> {
        let spec = self.registry.lookup(category)?;
        let query = planner::plan(spec, sort, limit, year)?;
        shape(self.store.as_ref(), &query).await
    }

    /// Compose the chart for a previously shaped table. Fails only on an
    /// unknown category key; everything else resolves to a chart, possibly
    /// the no-data placeholder.
    pub fn compose(
        &self,
        category: &str,
        table: &ResultTable,
        option: ChartOption,
        year: Option<i64>,
    ) -> Result<ChartSpec, EngineError> {
        let spec = self.registry.lookup(category)?;
        Ok(compose(spec, table, option, year))
    }

    /// Recompute the year-slider bounds for a category.
    pub async fn resolve_range(&self, category: &str) -> Result<SliderRange, EngineError> {
        let spec = self.registry.lookup(category)?;
        resolve_range(spec, self.store.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_charts::ChartKind;
    use mx_core::{Record, Scalar};
    use mx_data::MemoryStore;

    fn title(
        name: &str,
        rating: f64,
        votes: i64,
        extra: &[(&str, Scalar)],
        year: i64,
    ) -> Record {
        let mut record = Record::from_iter([
            ("primaryTitle".to_owned(), Scalar::Text(name.to_owned())),
            ("averageRating".to_owned(), Scalar::Float(rating)),
            ("numVotes".to_owned(), Scalar::Int(votes)),
        ]);
        for (field, value) in extra {
            record.insert((*field).to_owned(), value.clone());
        }
        record.insert("startYear".to_owned(), Scalar::Int(year));
        record
    }

    fn count_record(title_type: &str, year: i64, count: i64) -> Record {
        Record::from_iter([
            ("titleType".to_owned(), Scalar::Text(title_type.to_owned())),
            ("startYear".to_owned(), Scalar::Int(year)),
            ("count".to_owned(), Scalar::Int(count)),
        ])
    }

    fn sample_engine() -> Engine {
        let total = |v: i64| [("totalRatings", Scalar::Int(v))];
        let money = |budget: f64, revenue: f64| {
            [
                ("budget", Scalar::Float(budget)),
                ("revenue", Scalar::Float(revenue)),
            ]
        };
        let store = MemoryStore::new()
            .with_collection(
                "top_movies",
                vec![
                    title("Alpha", 8.1, 1200, &total(5000), 2020),
                    title("Beta", 7.4, 3400, &total(9000), 2020),
                    title("Gamma", 9.0, 800, &total(2000), 2020),
                    title("Delta", 6.5, 9100, &total(7000), 2019),
                ],
            )
            .with_collection(
                "top_budgets",
                vec![
                    title("Alpha", 8.1, 1200, &money(150.0, 400.0), 2020),
                    title("Beta", 7.4, 3400, &money(220.0, 310.0), 2020),
                    title("Delta", 6.5, 9100, &money(180.0, 260.0), 2019),
                ],
            )
            .with_collection(
                "top_revenues",
                vec![
                    title("Alpha", 8.1, 1200, &money(150.0, 400.0), 2020),
                    title("Beta", 7.4, 3400, &money(220.0, 310.0), 2020),
                ],
            )
            .with_collection(
                "titles_count",
                vec![
                    count_record("movie", 2019, 410),
                    count_record("movie", 2020, 385),
                    count_record("tvSeries", 2019, 120),
                    count_record("tvSeries", 2020, 140),
                ],
            );
        Engine::new(CategoryRegistry::imdb(), Arc::new(store))
    }

    #[tokio::test]
    async fn test_top_budgets_by_rating_scenario() {
        let engine = sample_engine();
        let table = engine
            .plan_and_run("top_budgets", SortMode::Rating, Some(10), Some(2020))
            .await
            .unwrap();

        assert!(table.len() <= 10);
        assert_eq!(
            table.columns(),
            ["primaryTitle", "averageRating", "numVotes", "budget", "revenue"]
        );
        let ratings = table.numbers("averageRating").unwrap();
        assert!(ratings.windows(2).all(|pair| pair[0] >= pair[1]));

        let chart = engine
            .compose("top_budgets", &table, ChartOption::Bar, Some(2020))
            .unwrap();
        assert_eq!(chart.kind, ChartKind::GroupedBar);
        assert_eq!(chart.series.len(), 2);
    }

    #[tokio::test]
    async fn test_movies_count_scenario() {
        let engine = sample_engine();
        // year and limit are irrelevant for a count series
        let table = engine
            .plan_and_run("movies_count", SortMode::Votes, Some(3), None)
            .await
            .unwrap();

        assert_eq!(table.columns(), ["startYear", "count"]);
        let years = table.numbers("startYear").unwrap();
        assert!(years.windows(2).all(|pair| pair[0] <= pair[1]));

        let bar = engine
            .compose("movies_count", &table, ChartOption::Bar, None)
            .unwrap();
        let line = engine
            .compose("movies_count", &table, ChartOption::Line, None)
            .unwrap();
        assert_eq!(bar.kind, ChartKind::Bar);
        assert_eq!(line.kind, ChartKind::Line);
    }

    #[tokio::test]
    async fn test_count_series_invariant_under_irrelevant_parameters() {
        let engine = sample_engine();
        let a = engine
            .plan_and_run("tvshows_count", SortMode::Relevance, None, None)
            .await
            .unwrap();
        let b = engine
            .plan_and_run("tvshows_count", SortMode::Rating, Some(1), Some(2019))
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_budgets_max_groups_per_year() {
        let engine = sample_engine();
        let table = engine
            .plan_and_run("budgets_max", SortMode::Relevance, None, None)
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.numbers("startYear").unwrap(), [2019.0, 2020.0]);
        assert_eq!(table.numbers("budget").unwrap(), [180.0, 220.0]);
    }

    #[tokio::test]
    async fn test_empty_year_resolves_to_no_data_chart() {
        let engine = sample_engine();
        let table = engine
            .plan_and_run("top_revenues", SortMode::Relevance, Some(10), Some(1963))
            .await
            .unwrap();
        assert!(table.is_empty());

        let chart = engine
            .compose("top_revenues", &table, ChartOption::Bar, Some(1963))
            .unwrap();
        assert_eq!(chart.kind, ChartKind::NoData);
        assert!(chart.series.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_category_fails_everywhere() {
        let engine = sample_engine();
        let run = engine
            .plan_and_run("top_podcasts", SortMode::Relevance, Some(10), Some(2020))
            .await;
        assert!(matches!(run, Err(EngineError::UnknownCategory(_))));

        let compose = engine.compose(
            "top_podcasts",
            &ResultTable::empty(),
            ChartOption::Bar,
            None,
        );
        assert!(matches!(compose, Err(EngineError::UnknownCategory(_))));

        let range = engine.resolve_range("top_podcasts").await;
        assert!(matches!(range, Err(EngineError::UnknownCategory(_))));
    }

    #[tokio::test]
    async fn test_plan_and_run_is_idempotent() {
        let engine = sample_engine();
        let first = engine
            .plan_and_run("top_movies", SortMode::Votes, Some(2), Some(2020))
            .await
            .unwrap();
        let second = engine
            .plan_and_run("top_movies", SortMode::Votes, Some(2), Some(2020))
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.labels("primaryTitle").unwrap(), vec!["Beta", "Alpha"]);
    }

    #[tokio::test]
    async fn test_resolve_range_per_category() {
        let engine = sample_engine();

        let ranked = engine.resolve_range("top_movies").await.unwrap();
        assert_eq!(ranked.marks, [2019, 2020]);
        assert_eq!(ranked.value, 2020);

        let series = engine.resolve_range("movies_count").await.unwrap();
        assert!(series.is_degenerate());
    }

    #[tokio::test]
    async fn test_missing_year_surfaces_typed() {
        let engine = sample_engine();
        let err = engine
            .plan_and_run("top_movies", SortMode::Relevance, Some(10), None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingYear(_)));
    }
}
