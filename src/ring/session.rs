use crate::render::{
    CanvasSize, DrawCommand, Point, RenderOptions, RenderOptionsUpdate, Renderer, Viewport,
    ViewportUpdate,
};
use crate::ring::assignment::{RingAssignment, assign, choose_new_entry_position};
use crate::ring::colors::{NodeColorPicker, PartitionColors};
use crate::ring::entry::{Angle, EntryId, RingEntry, VIRTUAL_ID_STRIDE};
use anyhow::Result;
use itertools::Itertools;
use log::info;
use rand::Rng;
use std::fmt::Display;
use uuid::Uuid;

/// Virtual ids are derived from the node id, past this they would collide
pub const MAX_PHYSICAL_NODES: EntryId = VIRTUAL_ID_STRIDE - 1;

const VIRTUAL_ENTRIES_PER_NODE: EntryId = 2;

/// Returned when adding a node past [`MAX_PHYSICAL_NODES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingFull;

impl Display for RingFull {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ring is full, at most {MAX_PHYSICAL_NODES} physical nodes are supported"
        )
    }
}

impl std::error::Error for RingFull {}

/// State of one visualizer: the ring, its colors, display options and viewport.
#[derive(Debug)]
pub struct RingSession {
    /// Sorted by position
    entries: Vec<RingEntry>,
    next_node_id: EntryId,
    partition_colors: PartitionColors,
    node_colors: NodeColorPicker,
    options: RenderOptions,
    viewport: Viewport,
}

impl Default for RingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RingSession {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_node_id: 1,
            partition_colors: PartitionColors::new(),
            node_colors: NodeColorPicker::new(),
            options: RenderOptions::default(),
            viewport: Viewport::IDENTITY,
        }
    }

    pub fn entries(&self) -> &[RingEntry] {
        &self.entries
    }

    pub fn physical_node_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.is_virtual).count()
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn update_options(&mut self, update: RenderOptionsUpdate) -> RenderOptions {
        self.options.apply(update);
        self.options
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn update_viewport(&mut self, update: ViewportUpdate) -> Result<Viewport> {
        self.viewport = self.viewport.updated(update)?;
        Ok(self.viewport)
    }

    /// Zooms by `factor` toward `focus`, a point on a canvas of the given size.
    pub fn zoom_viewport(
        &mut self,
        factor: f64,
        focus: Point,
        canvas: CanvasSize,
    ) -> Result<Viewport> {
        self.viewport = self.viewport.zoom_towards(factor, focus, canvas)?;
        info!(
            "Zoomed to {:.2} (offset {:.1}, {:.1})",
            self.viewport.zoom, self.viewport.offset_x, self.viewport.offset_y
        );
        Ok(self.viewport)
    }

    pub fn reset_viewport(&mut self) -> Viewport {
        self.viewport = Viewport::IDENTITY;
        self.viewport
    }

    pub fn assignment(&self) -> RingAssignment {
        assign(&self.entries)
    }

    /// Adds a physical node and its virtual entries, returning the created entries.
    pub fn add_node(&mut self) -> Result<Vec<RingEntry>> {
        self.add_node_with_rng(&mut rand::rng())
    }

    pub fn add_node_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<RingEntry>> {
        let node_id = self.next_node_id;

        if node_id > MAX_PHYSICAL_NODES {
            return Err(RingFull.into());
        }

        let active_colors: Vec<&str> = self
            .entries
            .iter()
            .filter(|entry| !entry.is_virtual)
            .map(|entry| entry.color.as_str())
            .collect();
        let color = self.node_colors.pick(&active_colors, rng);

        // Each new entry sees the ones created before it
        let mut positions: Vec<Angle> = self.entries.iter().map(|entry| entry.position).collect();
        let mut created = Vec::with_capacity(1 + VIRTUAL_ENTRIES_PER_NODE as usize);

        for index in 0..=VIRTUAL_ENTRIES_PER_NODE {
            let position = choose_new_entry_position(&positions, rng)?;
            positions.push(position);

            let is_virtual = index > 0;

            created.push(RingEntry {
                id: if is_virtual {
                    node_id * VIRTUAL_ID_STRIDE + index
                } else {
                    node_id
                },
                position,
                partition_id: format!("partition-{}", Uuid::new_v4()),
                is_virtual,
                parent_id: is_virtual.then_some(node_id),
                color: color.clone(),
            });
        }

        self.next_node_id += 1;
        self.entries.extend(created.iter().cloned());
        self.entries.sort_by(|a, b| a.position.total_cmp(&b.position));

        info!(
            "Added node {node_id} ({color}) at {}",
            created
                .iter()
                .map(|entry| format!("{:.2}°", entry.position))
                .join(", ")
        );

        Ok(created)
    }

    /// Removes every entry and forgets all assigned colors. Options and viewport are kept.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.next_node_id = 1;
        self.node_colors.reset();
        self.partition_colors.reset();

        info!("Ring reset");
    }

    /// Draws the ring seen through `viewport`, which may differ from the stored one.
    pub fn render(&mut self, canvas: CanvasSize, viewport: Viewport) -> Vec<DrawCommand> {
        let assignment = self.assignment();

        // Colors follow ring order, not drawing order
        self.partition_colors
            .preassign(self.entries.iter().map(|entry| entry.partition_id.as_str()));

        Renderer::new(canvas, self.options)
            .with_viewport(viewport)
            .render(
            &self.entries,
            &assignment,
            &mut self.partition_colors,
        )
    }
}
