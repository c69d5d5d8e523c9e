use crate::render::commands::{DrawCommand, Point, Stroke};
use crate::render::layout::CanvasSize;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Zoom and pan applied on top of the drawing: a point `p` ends up at `offset + zoom * p`.
///
/// The canvas clear is never transformed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Viewport {
    /// Within [`Viewport::MIN_ZOOM`, `Viewport::MAX_ZOOM`]
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Partial update of a [`Viewport`], missing fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ViewportUpdate {
    #[serde(default)]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub offset_x: Option<f64>,
    #[serde(default)]
    pub offset_y: Option<f64>,
}

impl Viewport {
    pub const MIN_ZOOM: f64 = 0.5;
    pub const MAX_ZOOM: f64 = 3.0;

    /// Share of the focus distance the offset moves per unit of zoom change
    const FOCUS_PULL: f64 = 0.1;

    pub const IDENTITY: Viewport = Viewport {
        zoom: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Clamps the zoom, rejects non finite values.
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> Result<Self> {
        if !(zoom.is_finite() && offset_x.is_finite() && offset_y.is_finite()) {
            bail!("viewport must be finite, got zoom={zoom} offset=({offset_x}, {offset_y})");
        }

        Ok(Self {
            zoom: zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM),
            offset_x,
            offset_y,
        })
    }

    pub fn updated(self, update: ViewportUpdate) -> Result<Self> {
        Self::new(
            update.zoom.unwrap_or(self.zoom),
            update.offset_x.unwrap_or(self.offset_x),
            update.offset_y.unwrap_or(self.offset_y),
        )
    }

    /// Multiplies the zoom by `factor`, pulling the view toward `focus` (canvas pixels).
    pub fn zoom_towards(self, factor: f64, focus: Point, canvas: CanvasSize) -> Result<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            bail!("zoom factor must be a positive number, got {factor}");
        }

        let change = Self::FOCUS_PULL * (factor - 1.0);

        Self::new(
            self.zoom * factor,
            self.offset_x - (focus.x - canvas.width as f64 / 2.0) * change,
            self.offset_y - (focus.y - canvas.height as f64 / 2.0) * change,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.offset_x + self.zoom * point.x,
            self.offset_y + self.zoom * point.y,
        )
    }

    fn scale_stroke(&self, stroke: Stroke) -> Stroke {
        Stroke::new(stroke.color, stroke.width * self.zoom)
    }

    /// Moves and scales a command. Angles are kept, the zoom is uniform.
    pub fn transform(&self, command: DrawCommand) -> DrawCommand {
        let zoom = self.zoom;

        match command {
            DrawCommand::Clear { .. } => command,
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => DrawCommand::Circle {
                center: self.apply(center),
                radius: radius * zoom,
                fill,
                stroke: stroke.map(|stroke| self.scale_stroke(stroke)),
            },
            DrawCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                stroke,
            } => DrawCommand::Arc {
                center: self.apply(center),
                radius: radius * zoom,
                start_angle,
                end_angle,
                stroke: self.scale_stroke(stroke),
            },
            DrawCommand::Line { from, to, stroke } => DrawCommand::Line {
                from: self.apply(from),
                to: self.apply(to),
                stroke: self.scale_stroke(stroke),
            },
            DrawCommand::Polygon { points, fill } => DrawCommand::Polygon {
                points: points.into_iter().map(|point| self.apply(point)).collect(),
                fill,
            },
            DrawCommand::Rect {
                origin,
                width,
                height,
                corner_radius,
                fill,
                stroke,
            } => DrawCommand::Rect {
                origin: self.apply(origin),
                width: width * zoom,
                height: height * zoom,
                corner_radius: corner_radius * zoom,
                fill,
                stroke: stroke.map(|stroke| self.scale_stroke(stroke)),
            },
            DrawCommand::Text {
                position,
                content,
                font_size,
                bold,
                color,
                anchor,
            } => DrawCommand::Text {
                position: self.apply(position),
                content,
                font_size: font_size * zoom,
                bold,
                color,
                anchor,
            },
        }
    }
}
