use crate::render::commands::{DrawCommand, Point, Stroke};
use crate::render::layout::CanvasSize;
use anyhow::Result;
use std::f64::consts::TAU;
use std::fmt::Write;

const FONT_FAMILY: &str = "Arial, sans-serif";
const BACKGROUND: &str = "#ffffff";

/// Sweeps this close to a full turn are drawn as circles, a path arc can't close on itself
const FULL_SWEEP_EPSILON: f64 = 1e-9;

/// Serializes a frame of draw commands into a standalone SVG document.
pub fn to_svg(commands: &[DrawCommand], canvas: CanvasSize) -> Result<String> {
    let CanvasSize { width, height } = canvas;
    let mut out = String::with_capacity(commands.len() * 120);

    write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" \
         width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">"
    )?;

    for command in commands {
        write_command(&mut out, command)?;
    }

    out.push_str("</svg>");

    Ok(out)
}

fn write_command(out: &mut String, command: &DrawCommand) -> Result<()> {
    match command {
        DrawCommand::Clear { width, height } => {
            write!(
                out,
                "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"{BACKGROUND}\"/>"
            )?;
        }
        DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            write_circle(out, *center, *radius, fill.as_deref(), stroke.as_ref())?;
        }
        DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            stroke,
        } => {
            let sweep = end_angle - start_angle;

            if sweep <= 0.0 {
                return Ok(());
            }

            if sweep >= TAU - FULL_SWEEP_EPSILON {
                return write_circle(out, *center, *radius, None, Some(stroke));
            }

            let from = center.towards(*start_angle, *radius);
            let to = center.towards(*end_angle, *radius);
            let large_arc = u8::from(sweep > TAU / 2.0);

            write!(
                out,
                "<path d=\"M {:.3} {:.3} A {radius:.3} {radius:.3} 0 {large_arc} 1 {:.3} {:.3}\" fill=\"none\"",
                from.x, from.y, to.x, to.y
            )?;
            write_stroke(out, Some(stroke))?;
            out.push_str("/>");
        }
        DrawCommand::Line { from, to, stroke } => {
            write!(
                out,
                "<line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\"",
                from.x, from.y, to.x, to.y
            )?;
            write_stroke(out, Some(stroke))?;
            out.push_str("/>");
        }
        DrawCommand::Polygon { points, fill } => {
            out.push_str("<polygon points=\"");
            for (idx, point) in points.iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                write!(out, "{:.3},{:.3}", point.x, point.y)?;
            }
            out.push_str("\" fill=\"");
            svg_escape_into(out, fill);
            out.push('"');
            out.push_str("/>");
        }
        DrawCommand::Rect {
            origin,
            width,
            height,
            corner_radius,
            fill,
            stroke,
        } => {
            write!(
                out,
                "<rect x=\"{:.3}\" y=\"{:.3}\" width=\"{width:.3}\" height=\"{height:.3}\"",
                origin.x, origin.y
            )?;
            if *corner_radius > 0.0 {
                write!(out, " rx=\"{corner_radius:.3}\"")?;
            }
            write_fill(out, fill.as_deref());
            write_stroke(out, stroke.as_ref())?;
            out.push_str("/>");
        }
        DrawCommand::Text {
            position,
            content,
            font_size,
            bold,
            color,
            anchor,
        } => {
            let anchor = serde_plain::to_string(anchor)?;

            write!(
                out,
                "<text x=\"{:.3}\" y=\"{:.3}\" font-family=\"{FONT_FAMILY}\" font-size=\"{font_size:.3}\" \
                 text-anchor=\"{anchor}\" dominant-baseline=\"middle\"",
                position.x, position.y
            )?;
            if *bold {
                out.push_str(" font-weight=\"bold\"");
            }
            write_fill(out, Some(color));
            out.push('>');
            svg_escape_into(out, content);
            out.push_str("</text>");
        }
    }

    Ok(())
}

fn write_circle(
    out: &mut String,
    center: Point,
    radius: f64,
    fill: Option<&str>,
    stroke: Option<&Stroke>,
) -> Result<()> {
    write!(
        out,
        "<circle cx=\"{:.3}\" cy=\"{:.3}\" r=\"{radius:.3}\"",
        center.x, center.y
    )?;
    write_fill(out, fill);
    write_stroke(out, stroke)?;
    out.push_str("/>");

    Ok(())
}

fn write_fill(out: &mut String, fill: Option<&str>) {
    out.push_str(" fill=\"");
    svg_escape_into(out, fill.unwrap_or("none"));
    out.push('"');
}

fn write_stroke(out: &mut String, stroke: Option<&Stroke>) -> Result<()> {
    let Some(stroke) = stroke else {
        return Ok(());
    };

    out.push_str(" stroke=\"");
    svg_escape_into(out, &stroke.color);
    write!(out, "\" stroke-width=\"{:.3}\"", stroke.width)?;

    Ok(())
}

fn svg_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::commands::TextAnchor;

    fn export(commands: &[DrawCommand]) -> String {
        to_svg(commands, CanvasSize::DEFAULT).unwrap()
    }

    fn arc(start_angle: f64, end_angle: f64) -> DrawCommand {
        DrawCommand::Arc {
            center: Point::new(500.0, 500.0),
            radius: 100.0,
            start_angle,
            end_angle,
            stroke: Stroke::new("#3F51B5", 15.0),
        }
    }

    #[test]
    fn test_document_structure() {
        let svg = export(&[DrawCommand::Clear {
            width: 1000.0,
            height: 1000.0,
        }]);

        assert!(svg.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1000\" height=\"1000\""
        ));
        assert!(svg.contains("viewBox=\"0 0 1000 1000\""));
        assert!(svg.contains("fill=\"#ffffff\""));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_partial_arc_is_a_path() {
        let svg = export(&[arc(0.0, TAU / 4.0)]);

        assert!(svg.contains(
            "<path d=\"M 600.000 500.000 A 100.000 100.000 0 0 1 500.000 600.000\""
        ));
        assert!(svg.contains("fill=\"none\" stroke=\"#3F51B5\" stroke-width=\"15.000\""));

        let large = export(&[arc(0.0, TAU * 0.75)]);
        assert!(large.contains(" 0 1 1 "));
    }

    #[test]
    fn test_full_arc_is_a_circle() {
        let svg = export(&[arc(0.0, TAU)]);

        assert!(!svg.contains("<path"));
        assert!(svg.contains(
            "<circle cx=\"500.000\" cy=\"500.000\" r=\"100.000\" fill=\"none\" stroke=\"#3F51B5\""
        ));
    }

    #[test]
    fn test_empty_arc_is_skipped() {
        let svg = export(&[arc(1.0, 1.0)]);

        assert!(!svg.contains("<path"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_text() {
        let svg = export(&[DrawCommand::Text {
            position: Point::new(10.0, 20.0),
            content: "Node <1> & \"2\"".to_string(),
            font_size: 16.0,
            bold: true,
            color: "#000".to_string(),
            anchor: TextAnchor::Middle,
        }]);

        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("font-weight=\"bold\""));
        assert!(svg.contains(">Node &lt;1&gt; &amp; &quot;2&quot;</text>"));
    }

    #[test]
    fn test_rect_and_polygon() {
        let svg = export(&[
            DrawCommand::Rect {
                origin: Point::new(1.0, 2.0),
                width: 3.0,
                height: 4.0,
                corner_radius: 5.0,
                fill: None,
                stroke: None,
            },
            DrawCommand::Polygon {
                points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
                fill: "#333".to_string(),
            },
        ]);

        assert!(svg.contains(
            "<rect x=\"1.000\" y=\"2.000\" width=\"3.000\" height=\"4.000\" rx=\"5.000\" fill=\"none\"/>"
        ));
        assert!(
            svg.contains("<polygon points=\"0.000,0.000 1.000,0.000 0.000,1.000\" fill=\"#333\"/>")
        );
    }
}
