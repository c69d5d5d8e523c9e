use crate::ring::entry::{Angle, EntryId, FULL_CIRCLE, PartitionId, RingEntry};
use anyhow::{Context, Result, bail};
use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use utoipa::ToSchema;

/// Number of entries hosting each partition: the owner plus its clockwise successors.
pub const REPLICATION_FACTOR: usize = 3;

/// Represents the range of the ring owned by one entry, (start, end].
///
/// The range is exclusive of `start` and inclusive of `end`.
/// When `end < start`, the range wraps around 360°.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OwnershipRange {
    pub owner_id: EntryId,
    pub start: Angle,
    pub end: Angle,
    pub wraps: bool,
    /// Set only when the owner is alone on the ring, where `start == end` means everything
    pub full_circle: bool,
}

impl OwnershipRange {
    /// Angular size of the range in degrees.
    pub fn span(&self) -> Angle {
        if self.full_circle {
            FULL_CIRCLE
        } else if self.wraps {
            FULL_CIRCLE - self.start + self.end
        } else {
            self.end - self.start
        }
    }

    /// Expects an angle within [0, 360).
    pub fn contains(&self, angle: Angle) -> bool {
        if self.full_circle {
            true
        } else if self.wraps {
            angle > self.start || angle <= self.end
        } else {
            angle > self.start && angle <= self.end
        }
    }
}

impl Display for OwnershipRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{}]", self.start, self.end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RingAssignment {
    /// One range per entry, in clockwise order
    pub ownership: Vec<OwnershipRange>,
    /// Entries hosting replicas of other entries' partitions
    pub replicas: BTreeMap<EntryId, Vec<PartitionId>>,
}

impl RingAssignment {
    pub fn owner_of(&self, angle: Angle) -> Option<EntryId> {
        let angle = angle.rem_euclid(FULL_CIRCLE);

        self.ownership
            .iter()
            .find(|range| range.contains(angle))
            .map(|range| range.owner_id)
    }

    pub fn range_of(&self, entry_id: EntryId) -> Option<&OwnershipRange> {
        self.ownership
            .iter()
            .find(|range| range.owner_id == entry_id)
    }

    pub fn replicas_of(&self, entry_id: EntryId) -> &[PartitionId] {
        self.replicas
            .get(&entry_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Computes the range owned by every entry and the replicas each entry hosts.
///
/// Entries are walked clockwise by position (stable, so equal positions keep the input order).
/// Each entry owns (previous, self] and its partition is copied onto the next
/// `REPLICATION_FACTOR - 1` distinct entries.
pub fn assign(entries: &[RingEntry]) -> RingAssignment {
    let sorted: Vec<&RingEntry> = entries
        .iter()
        .sorted_by(|a, b| a.position.total_cmp(&b.position))
        .collect();
    let count = sorted.len();

    let mut assignment = RingAssignment::default();

    if count == 0 {
        return assignment;
    }

    for (idx, current) in sorted.iter().enumerate() {
        let previous = sorted[(idx + count - 1) % count];

        assignment.ownership.push(OwnershipRange {
            owner_id: current.id,
            start: previous.position,
            end: current.position,
            wraps: current.position < previous.position,
            full_circle: count == 1,
        });
    }

    for (idx, current) in sorted.iter().enumerate() {
        for offset in 1..REPLICATION_FACTOR {
            let target = sorted[(idx + offset) % count];

            // With fewer entries than the replication factor we wrap back onto ourselves
            if target.id == current.id || target.partition_id == current.partition_id {
                continue;
            }

            let hosted = assignment.replicas.entry(target.id).or_default();
            if !hosted.contains(&current.partition_id) {
                hosted.push(current.partition_id.clone());
            }
        }
    }

    assignment
}

/// Chooses a position for a new entry given the positions already on the ring.
//
// Implementation
// The ring is split into the gaps between consecutive positions, the last one wrapping past 360°.
// The new entry goes to the middle of the first largest gap, moved by a uniform jitter of up to
// JITTER_RATIO of the gap size in either direction.
// Jitter keeps entries added back to back from lining up at exact halves.
//
pub fn choose_new_entry_position<R: Rng + ?Sized>(
    positions: &[Angle],
    rng: &mut R,
) -> Result<Angle> {
    /// Maximum distance from the middle of the gap, relative to the gap size
    const JITTER_RATIO: f64 = 0.2;

    if positions.is_empty() {
        return Ok(0.0);
    }

    for position in positions {
        if !(0.0..FULL_CIRCLE).contains(position) {
            bail!("invalid entry position: {position}");
        }
    }

    let sorted: Vec<Angle> = positions
        .iter()
        .copied()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect();
    let count = sorted.len();

    // (gap start, gap size)
    let (gap_start, gap_size) = sorted
        .iter()
        .zip(sorted.iter().cycle().skip(1))
        .enumerate()
        .map(|(idx, (current, next))| {
            let gap = if idx + 1 == count {
                FULL_CIRCLE - current + next
            } else {
                next - current
            };

            (*current, gap)
        })
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .context("ring without gaps")?;

    let jitter = Uniform::new(-JITTER_RATIO, JITTER_RATIO)?;
    let offset = jitter.sample(rng) * gap_size;

    let position = (gap_start + gap_size / 2.0 + offset) % FULL_CIRCLE;

    Ok(position.clamp(0.0, FULL_CIRCLE - 1.0))
}
