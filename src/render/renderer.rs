use crate::render::commands::{DrawCommand, Point, Stroke, TextAnchor};
use crate::render::layout::{CanvasSize, Layout, rect_edge_point};
use crate::render::options::RenderOptions;
use crate::render::viewport::Viewport;
use crate::ring::{
    EntryId, OwnershipRange, PRIMARY_COLORS, PartitionColors, PartitionId, REPLICATION_FACTOR,
    RingAssignment, RingEntry,
};
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, TAU};

/// Partition arcs are drawn this far inside the ring
const ARC_INSET: f64 = 40.0;
const ARC_WIDTH: f64 = 15.0;
const ARROW_LENGTH: f64 = 6.0;
const ARROW_HEAD_SIZE: f64 = 3.0;

const NODE_SIZE: f64 = 22.0;
const OUTER_RING_GAP: f64 = 5.0;
const PRIMARY_SQUARE: f64 = 14.0;
const REPLICA_SQUARE: f64 = 8.0;

/// Title and legend are only drawn below this (unboosted) scale
const TITLE_MAX_SCALE: f64 = 1.5;
const COMPACT_TITLE_MAX_SCALE: f64 = 1.2;
/// Virtual entries are labeled only above this scale
const LABEL_ALL_MIN_SCALE: f64 = 0.65;
/// Average glyph width relative to the font size
const GLYPH_WIDTH_RATIO: f64 = 0.55;

const INK: &str = "#000";
const DARK_INK: &str = "#333";
const MUTED_INK: &str = "#666";
const NEUTRAL_FILL: &str = "#f0f0f0";
const NEUTRAL_ACCENT: &str = "#888";
const LABEL_FILL: &str = "rgba(255, 255, 255, 0.95)";
const PANEL_FILL: &str = "rgba(245, 245, 245, 0.9)";
const PANEL_BORDER: &str = "#e0e0e0";

/// Turns a ring and its assignment into draw commands for one canvas.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    layout: Layout,
    options: RenderOptions,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(canvas: CanvasSize, options: RenderOptions) -> Self {
        Self {
            layout: Layout::new(canvas),
            options,
            viewport: Viewport::IDENTITY,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Draws the ring. `entries` must be sorted by position.
    ///
    /// Partitions without a color yet get one from `colors`.
    pub fn render(
        &self,
        entries: &[RingEntry],
        assignment: &RingAssignment,
        colors: &mut PartitionColors,
    ) -> Vec<DrawCommand> {
        let mut frame = vec![DrawCommand::Clear {
            width: self.layout.width,
            height: self.layout.height,
        }];

        self.draw_main_ring(&mut frame);
        self.draw_partition_ranges(&mut frame, entries, assignment, colors);
        self.draw_entries(&mut frame, entries, assignment, colors);
        self.draw_labels(&mut frame, entries);

        if self.layout.scale < TITLE_MAX_SCALE {
            self.draw_title_and_legend(&mut frame);
        }

        if self.viewport.is_identity() {
            return frame;
        }

        frame
            .into_iter()
            .map(|command| self.viewport.transform(command))
            .collect()
    }

    fn node_accent(&self, entry: &RingEntry) -> String {
        if self.options.show_node_colors {
            entry.color.clone()
        } else {
            NEUTRAL_ACCENT.to_string()
        }
    }

    fn draw_main_ring(&self, frame: &mut Vec<DrawCommand>) {
        let center = self.layout.center;

        frame.push(DrawCommand::Circle {
            center,
            radius: self.layout.radius,
            fill: None,
            stroke: Some(Stroke::new("#222", 3.0)),
        });
        // Glow
        frame.push(DrawCommand::Circle {
            center,
            radius: self.layout.radius + 2.0,
            fill: None,
            stroke: Some(Stroke::new("rgba(0,0,0,0.1)", 5.0)),
        });
    }

    fn draw_partition_ranges(
        &self,
        frame: &mut Vec<DrawCommand>,
        entries: &[RingEntry],
        assignment: &RingAssignment,
        colors: &mut PartitionColors,
    ) {
        let by_id: HashMap<EntryId, &RingEntry> =
            entries.iter().map(|entry| (entry.id, entry)).collect();
        let arc_radius = self.layout.radius - ARC_INSET;

        for range in &assignment.ownership {
            let Some(owner) = by_id.get(&range.owner_id) else {
                continue;
            };

            // Entries sharing a position own nothing
            if range.span() <= 0.0 {
                continue;
            }

            let color = colors.color_for(&owner.partition_id);
            let start = range.start.to_radians();
            let end = range.end.to_radians();

            if range.wraps || range.full_circle {
                self.push_arc(frame, arc_radius, start, TAU, color);
                self.push_arc(frame, arc_radius, 0.0, end, color);
            } else {
                self.push_arc(frame, arc_radius, start, end, color);
            }

            self.draw_direction_arrow(frame, arc_radius, range);
        }
    }

    fn push_arc(
        &self,
        frame: &mut Vec<DrawCommand>,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: &str,
    ) {
        if end_angle <= start_angle {
            return;
        }

        frame.push(DrawCommand::Arc {
            center: self.layout.center,
            radius,
            start_angle,
            end_angle,
            stroke: Stroke::new(color, ARC_WIDTH),
        });
    }

    /// Small clockwise tick in the middle of the range.
    fn draw_direction_arrow(
        &self,
        frame: &mut Vec<DrawCommand>,
        arc_radius: f64,
        range: &OwnershipRange,
    ) {
        let start = range.start.to_radians();
        let end = range.end.to_radians();

        let mut middle = if range.wraps || range.full_circle {
            (start + end + TAU) / 2.0
        } else {
            (start + end) / 2.0
        };
        if middle > TAU {
            middle -= TAU;
        }

        // Perpendicular to the radius
        let direction = middle + FRAC_PI_2;
        let tail = self.layout.polar(middle, arc_radius);
        let tip = tail.towards(direction, ARROW_LENGTH);

        frame.push(DrawCommand::Line {
            from: tail,
            to: tip,
            stroke: Stroke::new(DARK_INK, 1.5),
        });
        frame.push(DrawCommand::Polygon {
            points: vec![
                tip,
                tip.towards(direction - FRAC_PI_6, -ARROW_HEAD_SIZE),
                tip.towards(direction + FRAC_PI_6, -ARROW_HEAD_SIZE),
            ],
            fill: DARK_INK.to_string(),
        });
    }

    fn draw_entries(
        &self,
        frame: &mut Vec<DrawCommand>,
        entries: &[RingEntry],
        assignment: &RingAssignment,
        colors: &mut PartitionColors,
    ) {
        let scale = self.layout.adjusted_scale;
        let node_size = NODE_SIZE * scale;

        for entry in entries {
            let center = self.layout.point_at(entry.position, self.layout.radius);

            let (fill, border) = if self.options.show_node_colors {
                (entry.color.clone(), INK)
            } else {
                (NEUTRAL_FILL.to_string(), MUTED_INK)
            };

            frame.push(DrawCommand::Circle {
                center,
                radius: node_size,
                fill: Some(fill),
                stroke: Some(Stroke::new(border, 2.0 * scale)),
            });

            if !entry.is_virtual {
                frame.push(DrawCommand::Circle {
                    center,
                    radius: node_size + OUTER_RING_GAP * scale,
                    fill: None,
                    stroke: Some(Stroke::new(self.node_accent(entry), 2.0 * scale)),
                });
            }

            self.draw_partition_squares(
                frame,
                center,
                entry,
                assignment.replicas_of(entry.id),
                colors,
            );
        }
    }

    /// Primary partition on top, one smaller square per replica below it.
    fn draw_partition_squares(
        &self,
        frame: &mut Vec<DrawCommand>,
        center: Point,
        entry: &RingEntry,
        replicas: &[PartitionId],
        colors: &mut PartitionColors,
    ) {
        let scale = self.layout.adjusted_scale;
        let primary_size = PRIMARY_SQUARE * scale;
        let replica_size = REPLICA_SQUARE * scale;
        let horizontal_spacing = 4.0 * scale;
        let vertical_spacing = 10.0 * scale;
        let vertical_offset = -3.0 * scale;

        frame.push(DrawCommand::Rect {
            origin: Point::new(
                center.x - primary_size / 2.0,
                center.y - primary_size / 2.0 - 4.0 * scale + vertical_offset,
            ),
            width: primary_size,
            height: primary_size,
            corner_radius: 0.0,
            fill: Some(colors.color_for(&entry.partition_id).to_string()),
            stroke: Some(Stroke::new(INK, 1.5 * scale)),
        });

        if replicas.is_empty() {
            return;
        }

        let count = replicas.len() as f64;
        let replicas_width = replica_size * count + horizontal_spacing * (count - 1.0);

        let separator_width = replicas_width.max(primary_size) * 0.7;
        let separator_y = center.y + 2.0 * scale + vertical_offset;
        frame.push(DrawCommand::Line {
            from: Point::new(center.x - separator_width / 2.0, separator_y),
            to: Point::new(center.x + separator_width / 2.0, separator_y),
            stroke: Stroke::new("rgba(0,0,0,0.15)", 0.5 * scale),
        });

        let mut x = center.x - replicas_width / 2.0;
        for replica in replicas {
            frame.push(DrawCommand::Rect {
                origin: Point::new(x, center.y + vertical_spacing + vertical_offset),
                width: replica_size,
                height: replica_size,
                corner_radius: 0.0,
                fill: Some(colors.color_for(replica).to_string()),
                stroke: Some(Stroke::new(DARK_INK, 0.75 * scale)),
            });

            x += replica_size + horizontal_spacing;
        }
    }

    fn draw_labels(&self, frame: &mut Vec<DrawCommand>, entries: &[RingEntry]) {
        let scale = self.layout.adjusted_scale;
        let compact = self.layout.compact;
        let label_all = !compact && scale > LABEL_ALL_MIN_SCALE;

        for entry in entries.iter().filter(|entry| label_all || !entry.is_virtual) {
            // Smaller canvases keep labels closer to the ring
            let multiplier = if compact {
                1.1
            } else if scale < 0.7 {
                1.12
            } else if entry.is_virtual {
                1.25
            } else {
                1.4
            };

            let node = self.layout.point_at(entry.position, self.layout.radius);
            let label = self
                .layout
                .point_at(entry.position, self.layout.radius * multiplier);

            self.draw_label(frame, entry, node, label);
        }
    }

    fn draw_label(
        &self,
        frame: &mut Vec<DrawCommand>,
        entry: &RingEntry,
        node: Point,
        label: Point,
    ) {
        let scale = self.layout.adjusted_scale;
        let width = if entry.is_virtual { 100.0 } else { 120.0 } * scale;
        let height = 40.0 * scale;
        let accent = self.node_accent(entry);

        frame.push(DrawCommand::Rect {
            origin: Point::new(label.x - width / 2.0, label.y - height / 2.0),
            width,
            height,
            corner_radius: 10.0 * scale,
            fill: Some(LABEL_FILL.to_string()),
            stroke: Some(Stroke::new(accent.clone(), 2.0 * scale)),
        });

        // From the edge of the marker to the border of the label
        let marker_radius = if entry.is_virtual {
            NODE_SIZE
        } else {
            NODE_SIZE + OUTER_RING_GAP
        } * scale;
        let toward_label = (label.y - node.y).atan2(label.x - node.x);

        frame.push(DrawCommand::Line {
            from: node.towards(toward_label, marker_radius),
            to: rect_edge_point(label, width / 2.0, height / 2.0, node),
            stroke: Stroke::new(accent, 1.5 * scale),
        });

        if entry.is_virtual {
            frame.push(DrawCommand::Text {
                position: Point::new(label.x, label.y - 10.0 * scale),
                content: format!("V-Node {}", entry.virtual_index()),
                font_size: 12.0 * scale,
                bold: false,
                color: INK.to_string(),
                anchor: TextAnchor::Middle,
            });

            if let Some(parent_id) = entry.parent_id {
                frame.push(DrawCommand::Text {
                    position: Point::new(label.x, label.y + 10.0 * scale),
                    content: format!("(Node {parent_id})"),
                    font_size: 10.0 * scale,
                    bold: false,
                    color: MUTED_INK.to_string(),
                    anchor: TextAnchor::Middle,
                });
            }
        } else {
            frame.push(DrawCommand::Text {
                position: label,
                content: format!("Node {}", entry.id),
                font_size: 16.0 * scale,
                bold: true,
                color: INK.to_string(),
                anchor: TextAnchor::Middle,
            });
        }
    }

    fn draw_title_and_legend(&self, frame: &mut Vec<DrawCommand>) {
        let scale = self.layout.adjusted_scale;
        let compact = self.layout.compact;

        if compact && scale > COMPACT_TITLE_MAX_SCALE {
            return;
        }

        let title = if compact {
            "Consistent Hashing".to_string()
        } else {
            format!("Consistent Hashing Visualization (RF={REPLICATION_FACTOR})")
        };

        let font_size = 18.0 * scale;
        let title_width = text_width(&title, font_size);
        let title_height = 30.0 * scale;
        let padding = 15.0 * scale;
        let title_y = 30.0 * scale;
        let center_x = self.layout.center.x;

        frame.push(DrawCommand::Rect {
            origin: Point::new(
                center_x - title_width / 2.0 - padding,
                title_y - title_height / 2.0,
            ),
            width: title_width + padding * 2.0,
            height: title_height,
            corner_radius: 6.0 * scale,
            fill: Some(PANEL_FILL.to_string()),
            stroke: Some(Stroke::new(PANEL_BORDER, scale)),
        });
        frame.push(DrawCommand::Text {
            position: Point::new(center_x, title_y),
            content: title,
            font_size,
            bold: true,
            color: DARK_INK.to_string(),
            anchor: TextAnchor::Middle,
        });

        if compact {
            return;
        }

        let legend = Point::new(120.0 * scale, 80.0 * scale);
        let spacing = 25.0 * scale;

        self.draw_legend_item(
            frame,
            legend,
            PRIMARY_SQUARE * scale,
            PRIMARY_COLORS[0],
            "Primary Partition",
            1.5 * scale,
        );
        self.draw_legend_item(
            frame,
            Point::new(legend.x, legend.y + spacing),
            REPLICA_SQUARE * scale,
            PRIMARY_COLORS[9],
            "Replica Partitions",
            0.75 * scale,
        );
    }

    fn draw_legend_item(
        &self,
        frame: &mut Vec<DrawCommand>,
        at: Point,
        size: f64,
        color: &str,
        label: &str,
        border_width: f64,
    ) {
        let scale = self.layout.adjusted_scale;
        let font_size = 14.0 * scale;
        let padding = 10.0 * scale;
        let background_height = 30.0 * scale;

        frame.push(DrawCommand::Rect {
            origin: Point::new(at.x - size / 2.0 - padding, at.y - background_height / 2.0),
            width: size + padding + text_width(label, font_size) + 15.0 * scale,
            height: background_height,
            corner_radius: 6.0 * scale,
            fill: Some(PANEL_FILL.to_string()),
            stroke: Some(Stroke::new(PANEL_BORDER, scale)),
        });
        frame.push(DrawCommand::Text {
            position: Point::new(at.x + size + 10.0 * scale, at.y),
            content: label.to_string(),
            font_size,
            bold: false,
            color: DARK_INK.to_string(),
            anchor: TextAnchor::Start,
        });
        frame.push(DrawCommand::Rect {
            origin: Point::new(at.x - size / 2.0, at.y - size / 2.0),
            width: size,
            height: size,
            corner_radius: 0.0,
            fill: Some(color.to_string()),
            stroke: Some(Stroke::new(INK, border_width)),
        });
    }
}

/// Approximate rendered width of `text`, there is no font metrics source when rendering headless.
fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_WIDTH_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::assign;

    fn sample_entries() -> Vec<RingEntry> {
        vec![
            RingEntry {
                id: 1,
                position: 10.0,
                partition_id: "partition-a".to_string(),
                is_virtual: false,
                parent_id: None,
                color: "#FF0000".to_string(),
            },
            RingEntry {
                id: 101,
                position: 120.0,
                partition_id: "partition-b".to_string(),
                is_virtual: true,
                parent_id: Some(1),
                color: "#FF0000".to_string(),
            },
            RingEntry {
                id: 2,
                position: 250.0,
                partition_id: "partition-c".to_string(),
                is_virtual: false,
                parent_id: None,
                color: "#0000FF".to_string(),
            },
        ]
    }

    fn render(
        canvas: CanvasSize,
        options: RenderOptions,
        entries: &[RingEntry],
    ) -> Vec<DrawCommand> {
        let assignment = assign(entries);
        let mut colors = PartitionColors::new();

        Renderer::new(canvas, options).render(entries, &assignment, &mut colors)
    }

    fn arcs(frame: &[DrawCommand]) -> Vec<(f64, f64, f64, String)> {
        frame
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Arc {
                    radius,
                    start_angle,
                    end_angle,
                    stroke,
                    ..
                } => Some((*radius, *start_angle, *end_angle, stroke.color.clone())),
                _ => None,
            })
            .collect()
    }

    fn texts(frame: &[DrawCommand]) -> Vec<String> {
        frame
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    fn squares(frame: &[DrawCommand], size: f64) -> usize {
        frame
            .iter()
            .filter(|command| {
                matches!(command, DrawCommand::Rect { width, corner_radius, .. }
                    if (*width - size).abs() < 1e-9 && *corner_radius == 0.0)
            })
            .count()
    }

    #[test]
    fn test_empty_ring() {
        let frame = render(CanvasSize::DEFAULT, RenderOptions::default(), &[]);

        assert_eq!(
            frame[0],
            DrawCommand::Clear {
                width: 1000.0,
                height: 1000.0
            }
        );
        assert!(arcs(&frame).is_empty());
        assert_eq!(
            texts(&frame),
            vec![
                "Consistent Hashing Visualization (RF=3)".to_string(),
                "Primary Partition".to_string(),
                "Replica Partitions".to_string(),
            ]
        );
        // clear + ring + glow + title (2) + legend (2 x 3)
        assert_eq!(frame.len(), 11);
    }

    #[test]
    fn test_one_arc_per_range() {
        let entries = sample_entries();
        let frame = render(CanvasSize::DEFAULT, RenderOptions::default(), &entries);

        let arcs = arcs(&frame);
        // The wrapping range of the entry at 10° is split in two
        assert_eq!(arcs.len(), 4);
        assert!(arcs.iter().all(|arc| arc.0 == 300.0 - ARC_INSET));

        // Colors are assigned in ring order, the first range belongs to the entry at 10°
        assert_eq!(arcs[0].1, 250f64.to_radians());
        assert_eq!(arcs[0].2, TAU);
        assert_eq!(arcs[1].1, 0.0);
        assert_eq!(arcs[1].2, 10f64.to_radians());
        assert_eq!(arcs[0].3, PRIMARY_COLORS[0]);
        assert_eq!(arcs[1].3, PRIMARY_COLORS[0]);
        assert_eq!(arcs[2].3, PRIMARY_COLORS[1]);
        assert_eq!(arcs[3].3, PRIMARY_COLORS[2]);

        let arrows = frame
            .iter()
            .filter(|command| matches!(command, DrawCommand::Polygon { .. }))
            .count();
        assert_eq!(arrows, 3);
    }

    #[test]
    fn test_single_entry_draws_full_circle() {
        let mut entries = sample_entries();
        entries.truncate(1);

        entries[0].position = 0.0;
        let frame = render(CanvasSize::DEFAULT, RenderOptions::default(), &entries);
        let full = arcs(&frame);
        assert_eq!(full.len(), 1);
        assert_eq!((full[0].1, full[0].2), (0.0, TAU));

        entries[0].position = 90.0;
        let frame = render(CanvasSize::DEFAULT, RenderOptions::default(), &entries);
        let split = arcs(&frame);
        assert_eq!(split.len(), 2);
        let sweep: f64 = split.iter().map(|arc| arc.2 - arc.1).sum();
        assert!((sweep - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_zero_width_range_draws_nothing() {
        let mut entries = sample_entries();
        entries[1].position = entries[0].position;

        let frame = render(CanvasSize::DEFAULT, RenderOptions::default(), &entries);

        // Entry 1 wraps (two arcs), entry 101 owns nothing, entry 2 one arc
        assert_eq!(arcs(&frame).len(), 3);
    }

    #[test]
    fn test_partition_squares() {
        // Large canvas: no title nor legend
        let canvas = CanvasSize::new(1600, 1600).unwrap();
        let scale = 1.6;
        let frame = render(canvas, RenderOptions::default(), &sample_entries());

        assert_eq!(squares(&frame, PRIMARY_SQUARE * scale), 3);
        // Three entries, each replicating onto the other two
        assert_eq!(squares(&frame, REPLICA_SQUARE * scale), 6);
        assert!(!texts(&frame).iter().any(|text| text.contains("Partition")));
    }

    #[test]
    fn test_desktop_labels() {
        let frame = render(CanvasSize::DEFAULT, RenderOptions::default(), &sample_entries());
        let texts = texts(&frame);

        assert!(texts.contains(&"Node 1".to_string()));
        assert!(texts.contains(&"Node 2".to_string()));
        assert!(texts.contains(&"V-Node 1".to_string()));
        assert!(texts.contains(&"(Node 1)".to_string()));
    }

    #[test]
    fn test_compact_canvas_labels_physical_nodes_only() {
        let canvas = CanvasSize::new(600, 600).unwrap();
        let frame = render(canvas, RenderOptions::default(), &sample_entries());

        assert_eq!(
            texts(&frame),
            vec![
                "Node 1".to_string(),
                "Node 2".to_string(),
                "Consistent Hashing".to_string(),
            ]
        );
    }

    #[test]
    fn test_connectors_end_on_label_border() {
        let frame = render(CanvasSize::DEFAULT, RenderOptions::default(), &sample_entries());

        let mut checked = 0;
        for pair in frame.windows(2) {
            let (
                DrawCommand::Rect {
                    origin,
                    width,
                    height,
                    fill: Some(fill),
                    ..
                },
                DrawCommand::Line { to, .. },
            ) = (&pair[0], &pair[1])
            else {
                continue;
            };

            if fill != LABEL_FILL {
                continue;
            }

            let on_vertical = (to.x - origin.x).abs() < 1e-6
                || (to.x - (origin.x + width)).abs() < 1e-6;
            let on_horizontal = (to.y - origin.y).abs() < 1e-6
                || (to.y - (origin.y + height)).abs() < 1e-6;
            let inside = to.x >= origin.x - 1e-6
                && to.x <= origin.x + width + 1e-6
                && to.y >= origin.y - 1e-6
                && to.y <= origin.y + height + 1e-6;

            assert!((on_vertical || on_horizontal) && inside, "{to:?} not on label border");
            checked += 1;
        }

        assert_eq!(checked, 3);
    }

    #[test]
    fn test_neutral_colors() {
        let options = RenderOptions {
            show_node_colors: false,
        };
        let frame = render(CanvasSize::DEFAULT, options, &sample_entries());

        let node_colors = ["#FF0000", "#0000FF"];
        for command in &frame {
            let (fill, stroke) = match command {
                DrawCommand::Circle { fill, stroke, .. } => (fill.clone(), stroke.clone()),
                DrawCommand::Rect { fill, stroke, .. } => (fill.clone(), stroke.clone()),
                DrawCommand::Line { stroke, .. } => (None, Some(stroke.clone())),
                _ => continue,
            };

            assert!(!fill.is_some_and(|fill| node_colors.contains(&fill.as_str())));
            assert!(!stroke.is_some_and(|stroke| node_colors.contains(&stroke.color.as_str())));
        }

        let neutral_markers = frame
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    DrawCommand::Circle { fill: Some(fill), .. } if fill == NEUTRAL_FILL
                )
            })
            .count();
        assert_eq!(neutral_markers, 3);
    }

    #[test]
    fn test_render_is_idempotent() {
        let entries = sample_entries();
        let assignment = assign(&entries);
        let mut colors = PartitionColors::new();
        let renderer = Renderer::new(CanvasSize::DEFAULT, RenderOptions::default());

        let first = renderer.render(&entries, &assignment, &mut colors);
        let second = renderer.render(&entries, &assignment, &mut colors);

        assert_eq!(first, second);
    }

    #[test]
    fn test_viewport_moves_everything_but_the_background() {
        let entries = sample_entries();
        let assignment = assign(&entries);
        let viewport = Viewport::new(2.0, -500.0, -500.0).unwrap();

        let plain = render(CanvasSize::DEFAULT, RenderOptions::default(), &entries);
        let zoomed = Renderer::new(CanvasSize::DEFAULT, RenderOptions::default())
            .with_viewport(viewport)
            .render(&entries, &assignment, &mut PartitionColors::new());

        assert_eq!(zoomed.len(), plain.len());
        assert_eq!(zoomed[0], plain[0]);
        assert!(matches!(zoomed[0], DrawCommand::Clear { .. }));

        for (before, after) in plain.into_iter().zip(zoomed) {
            assert_eq!(viewport.transform(before), after);
        }

        // Ring center stays put when zooming around it
        let center = Layout::new(CanvasSize::DEFAULT).center;
        assert_eq!(viewport.apply(center), center);
    }
}
