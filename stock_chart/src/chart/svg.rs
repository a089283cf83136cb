//! A [`DrawingSurface`] that serializes to a standalone SVG document.

use std::fmt::Write;

use crate::chart::{
    geometry::PixelPoint,
    surface::{DrawingSurface, Fill, Font, LineStyle},
};

pub struct SvgSurface {
    width: u32,
    height: u32,
    body: String,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// Closes the document and returns it.
    pub fn finish(self) -> String {
        let mut doc = String::with_capacity(self.body.len() + 256);
        let _ = writeln!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );
        let _ = writeln!(doc, r#"<rect width="100%" height="100%" fill="white"/>"#);
        doc.push_str(&self.body);
        doc.push_str("</svg>\n");
        doc
    }
}

fn points_attr(points: &[PixelPoint]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", p.x, p.y);
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl DrawingSurface for SvgSurface {
    fn draw_line(&mut self, start: PixelPoint, end: PixelPoint, style: &LineStyle) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            start.x,
            start.y,
            end.x,
            end.y,
            escape(style.color.as_str()),
            style.width,
        );
    }

    fn draw_polygon(&mut self, vertices: &[PixelPoint], fill: &Fill) {
        let _ = writeln!(
            self.body,
            r#"<polygon points="{}" fill="{}"/>"#,
            points_attr(vertices),
            escape(fill.color.as_str()),
        );
    }

    fn draw_text(&mut self, text: &str, position: PixelPoint, font: &Font) {
        let weight = if font.bold { "bold" } else { "normal" };
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}">{}</text>"#,
            position.x,
            position.y,
            escape(&font.family),
            font.size_px,
            weight,
            escape(text),
        );
    }

    fn draw_polyline(&mut self, points: &[PixelPoint], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }
        let join = if style.round_join { "round" } else { "miter" };
        let _ = writeln!(
            self.body,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="{}"/>"#,
            points_attr(points),
            escape(style.color.as_str()),
            style.width,
            join,
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::chart::surface::Color;

    use super::*;

    #[test]
    fn document_has_requested_size() {
        let doc = SvgSurface::new(1100, 650).finish();
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains(r#"width="1100" height="650""#));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut svg = SvgSurface::new(10, 10);
        svg.draw_text("S&P <500>", PixelPoint::new(1.0, 2.0), &Font::bold("serif", 14.0));
        let doc = svg.finish();
        assert!(doc.contains(">S&amp;P &lt;500&gt;</text>"), "{doc}");
        assert!(doc.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn polyline_uses_round_joins_when_asked() {
        let mut svg = SvgSurface::new(10, 10);
        let style = LineStyle {
            color: Color::from("green"),
            width: 3.0,
            round_join: true,
        };
        svg.draw_polyline(&[(0.0, 1.0), (2.5, 3.0)].map(PixelPoint::from), &style);
        let doc = svg.finish();
        assert!(doc.contains(r#"points="0,1 2.5,3""#), "{doc}");
        assert!(doc.contains(r#"stroke-linejoin="round""#));
    }
}
