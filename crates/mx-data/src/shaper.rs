//! Executes planned queries and normalizes records into tables

use mx_core::{DataStore, EngineError, QuerySpec, ResultTable, Row, StoreError};

/// Run a planned operation against the store and shape the records.
///
/// Distinguishes three outcomes the caller must not confuse:
/// - zero matching records: a valid empty [`ResultTable`];
/// - a sort or filter field the collection's shape legitimately lacks:
///   also an empty table, so the composer's no-data chart is the single
///   downstream fallback for both;
/// - everything else: a typed failure, surfaced untouched.
pub async fn shape(store: &dyn DataStore, query: &QuerySpec) -> Result<ResultTable, EngineError> {
    let outcome = match query {
        QuerySpec::Find(find) => store.run_query(find).await,
        QuerySpec::Pipeline(pipeline) => store.run_pipeline(pipeline).await,
    };

    let columns = query.output_columns();
    let raw = match outcome {
        Ok(records) => records,
        Err(StoreError::UnknownField { .. }) => {
            return Ok(ResultTable::with_columns(columns));
        }
        Err(StoreError::UnknownCollection(name)) => {
            return Err(EngineError::MalformedResult(format!(
                "collection '{}' is registered but missing from the store",
                name
            )));
        }
        Err(err) => return Err(EngineError::StoreUnavailable(err)),
    };

    let mut rows = Vec::with_capacity(raw.len());
    for record in raw {
        let mut row = Row::new();
        for column in &columns {
            if let Some(value) = record.get(column) {
                row.insert(column.clone(), value.clone());
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Ok(ResultTable::with_columns(columns));
    }
    // Heterogeneous column sets across rows signal upstream schema drift
    // and surface as MalformedResult from the table constructor.
    ResultTable::from_rows(rows)
}
