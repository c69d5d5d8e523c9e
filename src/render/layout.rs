use crate::render::commands::Point;
use crate::ring::Angle;
use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const MAX_DIMENSION: u32 = 8192;

    pub const DEFAULT: CanvasSize = CanvasSize {
        width: 1000,
        height: 1000,
    };

    pub fn new(width: u32, height: u32) -> Result<Self> {
        for dimension in [width, height] {
            if dimension == 0 || dimension > Self::MAX_DIMENSION {
                bail!(
                    "canvas dimensions must be within 1..={}, got {width}x{height}",
                    Self::MAX_DIMENSION
                );
            }
        }

        Ok(Self { width, height })
    }
}

impl FromStr for CanvasSize {
    type Err = anyhow::Error;

    /// Parses `WIDTHxHEIGHT`, e.g. `1000x800`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once('x')
            .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got '{s}'"))?;

        let width = width.trim().parse().context("invalid canvas width")?;
        let height = height.trim().parse().context("invalid canvas height")?;

        Self::new(width, height)
    }
}

impl Display for CanvasSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel geometry derived from the canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub center: Point,
    /// Radius of the ring itself
    pub radius: f64,
    /// min(width, height) / 1000
    pub scale: f64,
    /// `scale`, boosted on compact canvases
    pub adjusted_scale: f64,
    /// Narrow canvases (phones) get bigger elements and fewer labels
    pub compact: bool,
}

impl Layout {
    const RADIUS_RATIO: f64 = 0.3;
    const REFERENCE_SIZE: f64 = 1000.0;
    const COMPACT_MAX_WIDTH: f64 = 768.0;
    const COMPACT_BOOST: f64 = 1.5;

    pub fn new(canvas: CanvasSize) -> Self {
        let width = canvas.width as f64;
        let height = canvas.height as f64;
        let smaller = width.min(height);

        let scale = smaller / Self::REFERENCE_SIZE;
        let compact = width <= Self::COMPACT_MAX_WIDTH;
        let adjusted_scale = if compact {
            scale * Self::COMPACT_BOOST
        } else {
            scale
        };

        Self {
            width,
            height,
            center: Point::new(width / 2.0, height / 2.0),
            radius: smaller * Self::RADIUS_RATIO,
            scale,
            adjusted_scale,
            compact,
        }
    }

    /// Point at `radius` from the center, `radians` clockwise from the positive x axis.
    pub fn polar(&self, radians: f64, radius: f64) -> Point {
        Point::new(
            self.center.x + radius * radians.cos(),
            self.center.y + radius * radians.sin(),
        )
    }

    /// Point at a ring position given in degrees.
    pub fn point_at(&self, position: Angle, radius: f64) -> Point {
        self.polar(position.to_radians(), radius)
    }
}

/// Point where the segment from the center of a rectangle toward `target` crosses its border.
pub fn rect_edge_point(center: Point, half_width: f64, half_height: f64, target: Point) -> Point {
    let angle = (target.y - center.y).atan2(target.x - center.x);
    let tan = angle.tan();

    if tan.abs() < (half_height / half_width).abs() {
        // Left or right side
        let x_sign = sign(angle.cos());
        Point::new(
            center.x + x_sign * half_width,
            center.y + tan * x_sign * half_width,
        )
    } else {
        // Top or bottom side
        let y_sign = sign(angle.sin());
        Point::new(
            center.x + (1.0 / tan) * y_sign * half_height,
            center.y + y_sign * half_height,
        )
    }
}

/// Like `f64::signum`, but zero for zero.
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
