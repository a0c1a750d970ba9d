//! Data access for the movie analytics engine
//!
//! Concrete [`DataStore`](mx_core::DataStore) implementations plus the two
//! components that touch the store: the result shaper and the year-range
//! resolver.

pub mod range;
pub mod shaper;
pub mod stores;

// Re-exports
pub use range::resolve_range;
pub use shaper::shape;
pub use stores::{MemoryStore, SqliteStore};
