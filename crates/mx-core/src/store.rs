//! Read-only data store capability

use indexmap::IndexMap;
use thiserror::Error;

use crate::query::{FindQuery, PipelineQuery};
use crate::value::Scalar;

/// A raw record as returned by a store: backing field name to value, in
/// field order. Fields the backing record does not have are simply absent.
pub type Record = IndexMap<String, Scalar>;

/// Failures a store implementation can report.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The named collection does not exist in the store.
    #[error("collection '{0}' does not exist")]
    UnknownCollection(String),

    /// A field the operation sorts or filters on does not exist in the
    /// collection. The shaper treats this as expected shape variance and
    /// degrades to an empty table.
    #[error("field '{field}' does not exist in collection '{collection}'")]
    UnknownField { collection: String, field: String },

    /// The store cannot execute the requested pipeline stages.
    #[error("unsupported pipeline: {0}")]
    UnsupportedPipeline(String),

    /// Backend-specific execution failure.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to the backing collections.
///
/// Implementations are injected into the engine; the core never reaches
/// for an ambient connection. All operations are reads and may fail, but
/// must not retry or block indefinitely: timeouts are owned by the
/// implementation.
#[async_trait::async_trait]
pub trait DataStore: Send + Sync {
    /// Execute a simple filter + projection + sort + limit query.
    async fn run_query(&self, query: &FindQuery) -> Result<Vec<Record>, StoreError>;

    /// Execute an aggregation pipeline.
    async fn run_pipeline(&self, pipeline: &PipelineQuery) -> Result<Vec<Record>, StoreError>;

    /// Distinct values of one field across a collection, in no particular
    /// order.
    async fn distinct_values(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<Scalar>, StoreError>;
}
