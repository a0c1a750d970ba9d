//! Demo entry point
//!
//! Builds a sample SQLite movie database, wires the engine to it and runs
//! every registered category once, printing the resulting chart
//! specifications as JSON. This is the whole UI contract exercised end to
//! end without a UI.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use mx_charts::ChartOption;
use mx_core::{CategoryRegistry, SortMode};
use mx_data::SqliteStore;
use mx_engine::Engine;

mod sample_db;

const DEFAULT_DB_PATH: &str = "data/movie_explorer.db";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_owned());
    if let Some(parent) = std::path::Path::new(&path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    sample_db::create_sample_database(&path)?;
    info!(path = %path, "sample database ready");

    let engine = Engine::new(
        CategoryRegistry::imdb(),
        Arc::new(SqliteStore::open(&path)),
    );

    let keys: Vec<String> = engine.registry().keys().map(str::to_owned).collect();
    for key in keys {
        let range = engine.resolve_range(&key).await?;
        let year = (!range.is_degenerate()).then_some(range.value);

        let table = engine
            .plan_and_run(&key, SortMode::Relevance, Some(10), year)
            .await?;
        let chart = engine.compose(&key, &table, ChartOption::Bar, year)?;
        info!(category = %key, rows = table.len(), kind = ?chart.kind, "composed chart");

        println!("{}", serde_json::to_string_pretty(&chart)?);
    }

    Ok(())
}
