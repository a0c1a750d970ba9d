//! Engine-level error taxonomy

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the dispatch engine.
///
/// Every failure reaches the caller typed; the only silent degradation in
/// the engine is the shaper's empty-table fallback for a sort or filter
/// field the backing collection legitimately lacks.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The requested category key is not registered.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// A year-scoped category was queried without a year selection.
    #[error("category '{0}' requires a year selection")]
    MissingYear(String),

    /// The backing store failed to execute a read.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// The records returned by the store do not match the shape the
    /// registry promised. Indicates drift to fix upstream, never repaired
    /// here.
    #[error("malformed result: {0}")]
    MalformedResult(String),
}
