//! The drawing capability the renderer is written against.
//!
//! A [`DrawingSurface`] is anything that can stroke lines, fill polygons and
//! place text at pixel coordinates. The renderer never looks a canvas up on
//! its own; the host hands one in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chart::geometry::PixelPoint;

/// A CSS colour string (`"red"`, `"#BBB"`, `"rgb(0, 0, 0)"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    pub fn black() -> Self {
        Self::new("black")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    /// Round joins between consecutive segments of a polyline.
    pub round_join: bool,
}

impl LineStyle {
    /// One pixel wide, mitred.
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            width: 1.0,
            round_join: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: Color,
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Self { color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size_px: f64,
    pub bold: bool,
}

impl Font {
    pub fn regular(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
            bold: false,
        }
    }

    pub fn bold(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            bold: true,
            ..Self::regular(family, size_px)
        }
    }
}

impl fmt::Display for Font {
    /// CSS shorthand, e.g. `bold 14px Times New Roman`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bold {
            f.write_str("bold ")?;
        }
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

/// A 2D canvas-like target.
///
/// Implementors provide the three primitives; polylines and font metrics have
/// defaults that are good enough for surfaces without native support.
pub trait DrawingSurface {
    fn draw_line(&mut self, start: PixelPoint, end: PixelPoint, style: &LineStyle);

    /// Fills the closed polygon through `vertices`.
    fn draw_polygon(&mut self, vertices: &[PixelPoint], fill: &Fill);

    /// Draws `text` with its left baseline at `position`.
    fn draw_text(&mut self, text: &str, position: PixelPoint, font: &Font);

    /// Strokes a connected path. Fewer than two points draws nothing.
    fn draw_polyline(&mut self, points: &[PixelPoint], style: &LineStyle) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], style);
        }
    }

    /// Height of a line of text (ascent + descent) in `font`.
    fn font_height(&self, font: &Font) -> f64 {
        font.size_px
    }
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        start: PixelPoint,
        end: PixelPoint,
        style: LineStyle,
    },
    Polygon {
        vertices: Vec<PixelPoint>,
        fill: Fill,
    },
    Text {
        text: String,
        position: PixelPoint,
        font: Font,
    },
    Polyline {
        points: Vec<PixelPoint>,
        style: LineStyle,
    },
}

/// A surface that remembers what was drawn, in order.
///
/// Useful to inspect a render pass, or to render once and [`replay`](Self::replay)
/// onto several real surfaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text strings in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = (&[PixelPoint], &LineStyle)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline { points, style } => Some((points.as_slice(), style)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (PixelPoint, PixelPoint, &LineStyle)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { start, end, style } => Some((*start, *end, style)),
            _ => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = &[PixelPoint]> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polygon { vertices, .. } => Some(vertices.as_slice()),
            _ => None,
        })
    }

    /// Re-issues every recorded command onto `target`.
    pub fn replay<S: DrawingSurface + ?Sized>(&self, target: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::Line { start, end, style } => target.draw_line(*start, *end, style),
                DrawCommand::Polygon { vertices, fill } => target.draw_polygon(vertices, fill),
                DrawCommand::Text {
                    text,
                    position,
                    font,
                } => target.draw_text(text, *position, font),
                DrawCommand::Polyline { points, style } => target.draw_polyline(points, style),
            }
        }
    }
}

impl DrawingSurface for DisplayList {
    fn draw_line(&mut self, start: PixelPoint, end: PixelPoint, style: &LineStyle) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            style: style.clone(),
        });
    }

    fn draw_polygon(&mut self, vertices: &[PixelPoint], fill: &Fill) {
        self.commands.push(DrawCommand::Polygon {
            vertices: vertices.to_vec(),
            fill: fill.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, position: PixelPoint, font: &Font) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            font: font.clone(),
        });
    }

    fn draw_polyline(&mut self, points: &[PixelPoint], style: &LineStyle) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            style: style.clone(),
        });
    }
}
