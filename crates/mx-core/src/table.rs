//! Uniform tabular result shape

use indexmap::IndexMap;

use crate::error::EngineError;
use crate::value::Scalar;

/// One shaped row: logical column name to value, in column order.
pub type Row = IndexMap<String, Scalar>;

/// An ordered sequence of rows sharing one column set.
///
/// An empty table (zero rows) is a valid, distinguished state and the
/// normal way "no data" travels through the engine, not an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultTable {
    /// An empty table with no declared columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An empty table that still declares the columns a query would have
    /// produced.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from shaped rows, taking the column set from the
    /// first row.
    ///
    /// Fails with [`EngineError::MalformedResult`] if the rows do not all
    /// share one column set; that is upstream schema drift, not a state
    /// this type will silently repair.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, EngineError> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };
        let columns: Vec<String> = first.keys().cloned().collect();
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() || !columns.iter().all(|c| row.contains_key(c)) {
                let got: Vec<&String> = row.keys().collect();
                return Err(EngineError::MalformedResult(format!(
                    "row {} has columns {:?}, expected {:?}",
                    idx, got, columns
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Clone one column's values, in row order. `None` if the column is
    /// not part of the table.
    pub fn scalars(&self, column: &str) -> Option<Vec<Scalar>> {
        if !self.has_column(column) {
            return None;
        }
        self.rows.iter().map(|row| row.get(column).cloned()).collect()
    }

    /// One column rendered as display labels, in row order.
    pub fn labels(&self, column: &str) -> Option<Vec<String>> {
        let values = self.scalars(column)?;
        Some(values.iter().map(Scalar::to_string).collect())
    }

    /// One column as numbers, in row order. `None` if the column is
    /// missing or any cell is non-numeric, so chart construction never
    /// sees a partially numeric series.
    pub fn numbers(&self, column: &str) -> Option<Vec<f64>> {
        let values = self.scalars(column)?;
        values.iter().map(Scalar::as_f64).collect()
    }
}
