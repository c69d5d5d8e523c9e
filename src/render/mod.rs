//! Headless drawing of the ring.
//!
//! The renderer produces a list of [`DrawCommand`]s in painting order: ring, partition arcs,
//! nodes with their partition squares, labels, then title and legend.
//! A [`Viewport`] zooms and pans everything but the background.
//! Clients can replay the commands on a canvas, or fetch them already serialized as SVG.

mod commands;
mod layout;
mod options;
mod renderer;
mod svg;
mod viewport;

pub use commands::{DrawCommand, Point};
pub use layout::CanvasSize;
pub use options::{RenderOptions, RenderOptionsUpdate};
pub use renderer::Renderer;
pub use svg::to_svg;
pub use viewport::{Viewport, ViewportUpdate};
