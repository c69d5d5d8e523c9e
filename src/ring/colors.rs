use crate::ring::entry::PartitionId;
use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashMap;
use strum::Display;

/// Partition ids containing this marker are colored from the replica palette
const REPLICA_MARKER: &str = "replica";

pub const PRIMARY_COLORS: [&str; 15] = [
    "#3F51B5", // Indigo
    "#2196F3", // Blue
    "#009688", // Teal
    "#4CAF50", // Green
    "#8BC34A", // Light Green
    "#CDDC39", // Lime
    "#FFEB3B", // Yellow
    "#FFC107", // Amber
    "#FF9800", // Orange
    "#FF5722", // Deep Orange
    "#795548", // Brown
    "#9C27B0", // Purple
    "#673AB7", // Deep Purple
    "#E91E63", // Pink
    "#F44336", // Red
];

/// Lighter versions of the primary palette
pub const REPLICA_COLORS: [&str; 15] = [
    "#7986CB", "#64B5F6", "#4DB6AC", "#81C784", "#AED581", "#DCE775", "#FFF176", "#FFD54F",
    "#FFB74D", "#FF8A65", "#A1887F", "#BA68C8", "#9575CD", "#F06292", "#E57373",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
enum Palette {
    Primary,
    Replica,
}

impl Palette {
    fn for_partition(partition_id: &str) -> Self {
        if partition_id.contains(REPLICA_MARKER) {
            Palette::Replica
        } else {
            Palette::Primary
        }
    }

    fn colors(self) -> &'static [&'static str] {
        match self {
            Palette::Primary => &PRIMARY_COLORS,
            Palette::Replica => &REPLICA_COLORS,
        }
    }
}

/// Lazily assigned partition colors.
///
/// A partition keeps its color until [`PartitionColors::reset`]. Palettes are reused cyclically
/// once exhausted, so two partitions can share a color.
#[derive(Debug, Default)]
pub struct PartitionColors {
    assigned: HashMap<PartitionId, &'static str>,
    next_primary: usize,
    next_replica: usize,
}

impl PartitionColors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, partition_id: &str) -> &'static str {
        if let Some(color) = self.assigned.get(partition_id) {
            return *color;
        }

        let palette = Palette::for_partition(partition_id);
        let next = match palette {
            Palette::Primary => &mut self.next_primary,
            Palette::Replica => &mut self.next_replica,
        };

        let colors = palette.colors();
        let color = colors[*next % colors.len()];
        *next += 1;

        debug!("assigned {palette} color {color} to {partition_id}");
        self.assigned.insert(partition_id.to_string(), color);

        color
    }

    /// Assigns colors in the given order so that rendering order doesn't affect them.
    pub fn preassign<'a>(&mut self, partition_ids: impl IntoIterator<Item = &'a str>) {
        for partition_id in partition_ids {
            self.color_for(partition_id);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    pub fn reset(&mut self) {
        self.assigned.clear();
        self.next_primary = 0;
        self.next_replica = 0;
    }
}

const NODE_COLORS: [&str; 108] = [
    // Vibrant
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF", "#FF8000", "#FF0080",
    "#80FF00", "#00FF80", "#8000FF", "#0080FF",
    // Pastel
    "#FFB6C1", "#FFD700", "#98FB98", "#ADD8E6", "#DDA0DD", "#F0E68C", "#E6E6FA", "#FFA07A",
    "#20B2AA", "#87CEFA", "#778899", "#B0C4DE",
    // Dark
    "#800000", "#008000", "#000080", "#808000", "#800080", "#008080", "#A52A2A", "#2E8B57",
    "#4B0082", "#696969", "#556B2F", "#8B4513",
    // Vivid
    "#FF1493", "#00BFFF", "#32CD32", "#BA55D3", "#1E90FF", "#FF6347", "#7CFC00", "#DC143C",
    "#00CED1", "#9370DB", "#FF4500", "#3CB371",
    // Muted
    "#D2B48C", "#BC8F8F", "#A0522D", "#6B8E23", "#708090", "#CD853F", "#4682B4", "#BDB76B",
    "#DAA520", "#808080", "#F4A460", "#2F4F4F",
    // Light
    "#F0FFFF", "#F5F5DC", "#FAEBD7", "#E0FFFF", "#FAFAD2", "#FFF0F5", "#F0F8FF", "#F8F8FF",
    "#FFFAFA", "#F5FFFA", "#FFFFF0", "#F0FFF0",
    // Vibrant (extra)
    "#FF00AA", "#AA00FF", "#00AAFF", "#00FFAA", "#AAFF00", "#FFAA00", "#CC0000", "#00CC00",
    "#0000CC", "#CCCC00", "#CC00CC", "#00CCCC",
    // Pastel (extra)
    "#FFD1DC", "#FFECB3", "#E6FFB3", "#B3FFD9", "#B3ECFF", "#D1B3FF", "#FFB3E6", "#FFCCB3",
    "#E6FFE6", "#B3FFFF", "#E6E6FF", "#FFE6E6",
    // Dark (extra)
    "#330000", "#003300", "#000033", "#333300", "#330033", "#003333", "#663300", "#336600",
    "#006633", "#330066", "#660033", "#003366",
];

/// Picks display colors for physical nodes.
#[derive(Debug, Default)]
pub struct NodeColorPicker {
    /// Colors handed out since the last refill
    used: Vec<String>,
}

impl NodeColorPicker {
    /// Below this many free palette colors the used-color memory is forgotten
    const MIN_AVAILABLE_COLORS: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    /// Picks a random palette color not used by an `active` node nor handed out recently.
    ///
    /// Falls back to a random hex color once the palette is exhausted.
    pub fn pick<R: Rng + ?Sized>(&mut self, active: &[&str], rng: &mut R) -> String {
        let available = NODE_COLORS
            .iter()
            .filter(|color| !active.contains(*color))
            .count();

        if available < Self::MIN_AVAILABLE_COLORS {
            self.used = active.iter().map(|color| color.to_string()).collect();
        }

        let candidates: Vec<&str> = NODE_COLORS
            .iter()
            .copied()
            .filter(|color| !active.contains(color))
            .filter(|color| !self.used.iter().any(|used| used == color))
            .collect();

        let Some(color) = candidates.choose(rng) else {
            return format!("#{:06X}", rng.random_range(0..=0xFF_FFFF_u32));
        };

        self.used.push(color.to_string());

        color.to_string()
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_partition_color_is_stable() {
        let mut colors = PartitionColors::new();

        let first = colors.color_for("partition-a");
        let second = colors.color_for("partition-b");

        assert_eq!(first, PRIMARY_COLORS[0]);
        assert_eq!(second, PRIMARY_COLORS[1]);
        assert_eq!(colors.color_for("partition-a"), first);
        assert_eq!(colors.color_for("partition-b"), second);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_replica_palette() {
        let mut colors = PartitionColors::new();

        assert_eq!(colors.color_for("replica-of-a"), REPLICA_COLORS[0]);
        // The primary counter is independent from the replica one
        assert_eq!(colors.color_for("partition-a"), PRIMARY_COLORS[0]);
        assert_eq!(colors.color_for("partition-a-replica"), REPLICA_COLORS[1]);
    }

    #[test]
    fn test_palette_cycles() {
        let mut colors = PartitionColors::new();

        for idx in 0..PRIMARY_COLORS.len() {
            colors.color_for(&format!("partition-{idx}"));
        }

        assert_eq!(colors.color_for("partition-overflow"), PRIMARY_COLORS[0]);
    }

    #[test]
    fn test_reset_clears_assignments() {
        let mut colors = PartitionColors::new();

        colors.color_for("partition-a");
        let before = colors.color_for("partition-b");
        assert_eq!(before, PRIMARY_COLORS[1]);

        colors.reset();
        assert!(colors.is_empty());

        // After reset, assignment restarts from the first color
        assert_eq!(colors.color_for("partition-b"), PRIMARY_COLORS[0]);
    }

    #[test]
    fn test_preassign_follows_order() {
        let mut colors = PartitionColors::new();

        colors.preassign(["partition-z", "partition-y", "partition-z"]);

        assert_eq!(colors.len(), 2);
        assert_eq!(colors.color_for("partition-y"), PRIMARY_COLORS[1]);
        assert_eq!(colors.color_for("partition-z"), PRIMARY_COLORS[0]);
    }

    #[test]
    fn test_independent_caches() {
        let mut first = PartitionColors::new();
        let mut second = PartitionColors::new();

        first.color_for("partition-a");

        assert_eq!(second.color_for("partition-b"), PRIMARY_COLORS[0]);
    }

    #[test]
    fn test_node_colors_avoid_active_ones() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut picker = NodeColorPicker::new();

        let mut active: Vec<String> = Vec::new();
        for _ in 0..50 {
            let active_refs: Vec<&str> = active.iter().map(String::as_str).collect();
            let color = picker.pick(&active_refs, &mut rng);

            assert!(!active.contains(&color), "{color} is already in use");
            assert!(NODE_COLORS.contains(&color.as_str()));

            active.push(color);
        }
    }

    #[test]
    fn test_node_colors_are_not_repeated_until_refill() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut picker = NodeColorPicker::new();

        // No active nodes, but recently used colors are still skipped
        let mut seen: Vec<String> = Vec::new();
        for _ in 0..100 {
            let color = picker.pick(&[], &mut rng);
            assert!(!seen.contains(&color));
            seen.push(color);
        }
    }

    #[test]
    fn test_node_color_falls_back_to_random_hex() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut picker = NodeColorPicker::new();

        let color = picker.pick(&NODE_COLORS, &mut rng);

        assert_eq!(color.len(), 7);
        assert!(color.starts_with('#'));
        assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_node_color_reset() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut picker = NodeColorPicker::new();

        for _ in 0..NODE_COLORS.len() {
            picker.pick(&[], &mut rng);
        }
        picker.reset();

        let color = picker.pick(&[], &mut rng);
        assert!(NODE_COLORS.contains(&color.as_str()));
    }
}
