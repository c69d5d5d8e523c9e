use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type EntryId = u32;
pub type PartitionId = String;

/// Position on the ring in degrees, within [0, 360).
pub type Angle = f64;

pub const FULL_CIRCLE: Angle = 360.0;

/// Virtual entry ids are `parent_id * VIRTUAL_ID_STRIDE + index`
pub const VIRTUAL_ID_STRIDE: EntryId = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RingEntry {
    pub id: EntryId,
    pub position: Angle,
    pub partition_id: PartitionId,
    pub is_virtual: bool,
    /// Physical node a virtual entry belongs to
    pub parent_id: Option<EntryId>,
    /// Display color of the physical node (shared by its virtual entries)
    pub color: String,
}

impl RingEntry {
    /// Short index of a virtual entry within its physical node (1 or 2).
    pub fn virtual_index(&self) -> EntryId {
        self.id % VIRTUAL_ID_STRIDE
    }

    #[cfg(test)]
    pub fn example(id: EntryId, position: Angle) -> Self {
        Self {
            id,
            position,
            partition_id: format!("partition-{id}"),
            is_virtual: false,
            parent_id: None,
            color: "#FF0000".to_string(),
        }
    }
}
