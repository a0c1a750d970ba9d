//! Concrete store implementations

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

use mx_core::{PipelineStage, SortDirection, StoreError};

/// The group stage of an interpreted pipeline.
pub(crate) struct GroupStage<'a> {
    pub by: &'a str,
    pub field: &'a str,
}

/// The trailing order stage of an interpreted pipeline.
pub(crate) struct OrderStage<'a> {
    pub field: &'a str,
    pub direction: SortDirection,
}

/// Interpret the stage sequence both stores support: exactly one
/// group-max, optionally followed by a sort over its output.
pub(crate) fn interpret_stages(
    stages: &[PipelineStage],
) -> Result<(GroupStage<'_>, Option<OrderStage<'_>>), StoreError> {
    let mut group = None;
    let mut order = None;
    for stage in stages {
        match stage {
            PipelineStage::GroupMax { by, field } => {
                if group.is_some() {
                    return Err(StoreError::UnsupportedPipeline(
                        "more than one group stage".into(),
                    ));
                }
                if order.is_some() {
                    return Err(StoreError::UnsupportedPipeline(
                        "group stage after sort stage".into(),
                    ));
                }
                group = Some(GroupStage { by, field });
            }
            PipelineStage::Sort { field, direction } => {
                order = Some(OrderStage {
                    field,
                    direction: *direction,
                });
            }
        }
    }
    let Some(group) = group else {
        return Err(StoreError::UnsupportedPipeline(
            "pipeline has no group stage".into(),
        ));
    };
    Ok((group, order))
}
