//! SQLite-backed data store
//!
//! Collections map to tables. Connections are opened per operation and
//! table schemas are discovered once via `PRAGMA table_info` and cached.

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use parking_lot::RwLock;
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use mx_core::{
    DataStore, FindQuery, PipelineQuery, Record, Scalar, SortDirection, StoreError,
};

use super::interpret_stages;

/// Read-only SQLite store.
pub struct SqliteStore {
    path: PathBuf,
    /// Discovered column names per table
    schemas: RwLock<AHashMap<String, Vec<String>>>,
}

impl SqliteStore {
    /// Create a store over a database file. The file is not touched until
    /// the first read.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            schemas: RwLock::new(AHashMap::new()),
        }
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.path)
            .map_err(|e| StoreError::Backend(format!("failed to open database: {}", e)))
    }

    /// Column names of one table, cached after the first lookup.
    fn table_columns(
        &self,
        conn: &Connection,
        collection: &str,
    ) -> Result<Vec<String>, StoreError> {
        if let Some(columns) = self.schemas.read().get(collection) {
            return Ok(columns.clone());
        }

        check_identifier(collection)?;
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({})", collection))
            .map_err(|e| StoreError::Backend(format!("failed to get table info: {}", e)))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .map_err(|e| StoreError::Backend(format!("failed to query table info: {}", e)))?;

        let mut columns = Vec::new();
        for name in names {
            columns.push(
                name.map_err(|e| StoreError::Backend(format!("failed to read column info: {}", e)))?,
            );
        }
        if columns.is_empty() {
            return Err(StoreError::UnknownCollection(collection.to_owned()));
        }

        self.schemas
            .write()
            .insert(collection.to_owned(), columns.clone());
        Ok(columns)
    }

    fn fetch_records(
        &self,
        conn: &Connection,
        sql: &str,
        params: &[rusqlite::types::Value],
        columns: &[String],
    ) -> Result<Vec<Record>, StoreError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Backend(format!("failed to prepare query: {}", e)))?;
        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(|e| StoreError::Backend(format!("failed to execute query: {}", e)))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| StoreError::Backend(format!("failed to fetch row: {}", e)))?
        {
            let mut record = Record::new();
            for (idx, name) in columns.iter().enumerate() {
                let value = row
                    .get_ref(idx)
                    .map_err(|e| StoreError::Backend(format!("failed to get column value: {}", e)))?;
                match value {
                    ValueRef::Integer(v) => {
                        record.insert(name.clone(), Scalar::Int(v));
                    }
                    ValueRef::Real(v) => {
                        record.insert(name.clone(), Scalar::Float(v));
                    }
                    ValueRef::Text(bytes) => {
                        let text = std::str::from_utf8(bytes).unwrap_or("");
                        record.insert(name.clone(), Scalar::Text(text.to_owned()));
                    }
                    // NULL and blob fields are simply absent from the record
                    ValueRef::Null | ValueRef::Blob(_) => {}
                }
            }
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait::async_trait]
impl DataStore for SqliteStore {
    async fn run_query(&self, query: &FindQuery) -> Result<Vec<Record>, StoreError> {
        let conn = self.connect()?;
        let columns = self.table_columns(&conn, &query.collection)?;

        for clause in &query.filter {
            if !columns.contains(&clause.field) {
                return Err(StoreError::UnknownField {
                    collection: query.collection.clone(),
                    field: clause.field.clone(),
                });
            }
        }
        if !columns.contains(&query.sort.field) {
            return Err(StoreError::UnknownField {
                collection: query.collection.clone(),
                field: query.sort.field.clone(),
            });
        }

        // Project only the fields the table actually has; a field the
        // whole collection lacks is shape variance, not an error.
        let kept: Vec<String> = query
            .projection
            .iter()
            .filter(|field| columns.contains(field))
            .cloned()
            .collect();
        if kept.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = format!("SELECT {} FROM {}", kept.join(", "), query.collection);
        let mut params = Vec::new();
        if !query.filter.is_empty() {
            let predicates: Vec<String> = query
                .filter
                .iter()
                .enumerate()
                .map(|(idx, clause)| format!("{} = ?{}", clause.field, idx + 1))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
            params.extend(query.filter.iter().map(|clause| to_sql_value(&clause.value)));
        }
        sql.push_str(&format!(
            " ORDER BY {} {}",
            query.sort.field,
            sql_direction(query.sort.direction)
        ));
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let records = self.fetch_records(&conn, &sql, &params, &kept)?;
        tracing::debug!(
            collection = %query.collection,
            rows = records.len(),
            "ran query"
        );
        Ok(records)
    }

    async fn run_pipeline(&self, pipeline: &PipelineQuery) -> Result<Vec<Record>, StoreError> {
        let conn = self.connect()?;
        let columns = self.table_columns(&conn, &pipeline.collection)?;

        let (group, order) = interpret_stages(&pipeline.stages)?;
        for field in [group.by, group.field] {
            if !columns.iter().any(|c| c == field) {
                return Err(StoreError::UnknownField {
                    collection: pipeline.collection.clone(),
                    field: field.to_owned(),
                });
            }
        }

        let mut sql = format!(
            "SELECT {by}, MAX({field}) AS {field} FROM {table} GROUP BY {by}",
            by = group.by,
            field = group.field,
            table = pipeline.collection,
        );
        if let Some(sort) = order {
            if sort.field != group.by && sort.field != group.field {
                return Err(StoreError::UnsupportedPipeline(format!(
                    "sort field '{}' is not produced by the group stage",
                    sort.field
                )));
            }
            sql.push_str(&format!(
                " ORDER BY {} {}",
                sort.field,
                sql_direction(sort.direction)
            ));
        }

        let output = [group.by.to_owned(), group.field.to_owned()];
        let records = self.fetch_records(&conn, &sql, &[], &output)?;
        tracing::debug!(
            collection = %pipeline.collection,
            rows = records.len(),
            "ran pipeline"
        );
        Ok(records)
    }

    async fn distinct_values(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<Scalar>, StoreError> {
        let conn = self.connect()?;
        let columns = self.table_columns(&conn, collection)?;
        if !columns.iter().any(|c| c == field) {
            return Err(StoreError::UnknownField {
                collection: collection.to_owned(),
                field: field.to_owned(),
            });
        }

        let sql = format!(
            "SELECT DISTINCT {field} FROM {table} WHERE {field} IS NOT NULL",
            field = field,
            table = collection,
        );
        let output = [field.to_owned()];
        let records = self.fetch_records(&conn, &sql, &[], &output)?;
        Ok(records
            .into_iter()
            .filter_map(|mut record| record.shift_remove(field))
            .collect())
    }
}

/// Collection names reach SQL as identifiers; only plain names are
/// accepted.
fn check_identifier(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Backend(format!("invalid collection name '{}'", name)))
    }
}

fn sql_direction(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    }
}

fn to_sql_value(value: &Scalar) -> rusqlite::types::Value {
    match value {
        Scalar::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Scalar::Int(v) => rusqlite::types::Value::Integer(*v),
        Scalar::Float(v) => rusqlite::types::Value::Real(*v),
    }
}
