//! Consistent hashing ring used by the visualizer.
//!
//! Each entry owns the range (previous_position, own_position] walking the ring clockwise.
//! Its partition is also replicated onto the next REPLICATION_FACTOR - 1 entries.
//!
//! Adding a node creates one physical entry and two virtual entries. Every entry lands near the
//! middle of the largest free gap, with some jitter so consecutive entries don't line up.
//!
//! Entries are ordered by position. Ties keep insertion order (stable sort).

mod assignment;
mod colors;
mod entry;
mod session;

#[cfg(test)]
pub use assignment::assign;
pub use assignment::{OwnershipRange, REPLICATION_FACTOR, RingAssignment};
pub use colors::{PRIMARY_COLORS, PartitionColors};
pub use entry::{Angle, EntryId, PartitionId, RingEntry};
pub use session::{MAX_PHYSICAL_NODES, RingFull, RingSession};
