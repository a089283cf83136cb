//! Draws a [`ChartLayout`] onto a [`DrawingSurface`].
//!
//! The pass is fixed: axes with arrowheads, axis titles and hour ticks, then,
//! only when the layout has a value scale, value ticks with gridlines, one
//! polyline per series and a legend along the top edge.

use crate::{
    chart::{
        geometry::{Frame, PixelPoint, Viewport},
        projector::{ChartLayout, Polyline, ValueScale},
        surface::{Color, DrawingSurface, Fill, Font, LineStyle},
    },
    config::ChartConfig,
};

const ARROW_HALF_WIDTH: f64 = 15.0;
const ARROW_LENGTH: f64 = 15.0;
/// How far each axis runs past the frame before its arrowhead.
const AXIS_OVERHANG: f64 = 15.0;
const X_TICK_LABEL_OFFSET: f64 = 25.0;
const X_TITLE_OFFSET: f64 = 50.0;
const Y_TICK_LABEL_OFFSET: f64 = 25.0;
const Y_TITLE_OFFSET: f64 = 85.0;
const LEGEND_SWATCH_LENGTH: f64 = 20.0;
const LEGEND_TEXT_GAP: f64 = 25.0;
const LEGEND_RAISE: f64 = 15.0;
/// Past this many value ticks the step widens to a multiple of the gridline step.
const MAX_VALUE_TICKS: u64 = 1_000;

const X_AXIS_TITLE: &str = "Time (Hours Ago)";
const Y_AXIS_TITLE: &str = "Price ($)";
const FONT_FAMILY: &str = "Times New Roman";
const FONT_SIZE_PX: f64 = 14.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub palette: Vec<Color>,
    pub line_width: f64,
    /// Value distance between gridlines.
    pub gridline_step: f64,
    pub axis_color: Color,
    pub gridline_color: Color,
    pub label_font: Font,
    pub title_font: Font,
}

impl ChartStyle {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            palette: config.palette.clone(),
            line_width: config.line_width,
            gridline_step: config.gridline_step,
            axis_color: Color::black(),
            gridline_color: Color::from("#BBB"),
            label_font: Font::regular(FONT_FAMILY, FONT_SIZE_PX),
            title_font: Font::bold(FONT_FAMILY, FONT_SIZE_PX),
        }
    }

    /// Palette colour for a slot; black if the palette is empty.
    pub fn color(&self, color_index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::black();
        }
        self.palette[color_index % self.palette.len()].clone()
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

pub struct Renderer {
    style: ChartStyle,
}

impl Renderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn render<S: DrawingSurface + ?Sized>(&self, layout: &ChartLayout, surface: &mut S) {
        let frame = layout.viewport.frame;
        self.draw_axes(&frame, surface);
        self.draw_axis_labels(&layout.viewport, surface);

        let Some(scale) = layout.scale else {
            return;
        };

        self.draw_value_ticks(&frame, scale, surface);

        let count = layout.polylines.len();
        for polyline in &layout.polylines {
            let line = LineStyle {
                color: self.style.color(polyline.color_index),
                width: self.style.line_width,
                round_join: true,
            };
            surface.draw_polyline(&polyline.points, &line);
            self.draw_legend_entry(&frame, polyline, count, surface);
        }
    }

    fn draw_axes<S: DrawingSurface + ?Sized>(&self, frame: &Frame, surface: &mut S) {
        let axis = LineStyle::solid(self.style.axis_color.clone());
        let fill = Fill::solid(self.style.axis_color.clone());

        // y axis, arrow pointing up
        let y_tip = frame.top - AXIS_OVERHANG;
        surface.draw_line(
            PixelPoint::new(frame.left, y_tip),
            PixelPoint::new(frame.left, frame.bottom),
            &axis,
        );
        surface.draw_polygon(
            &[
                PixelPoint::new(frame.left - ARROW_HALF_WIDTH, y_tip),
                PixelPoint::new(frame.left + ARROW_HALF_WIDTH, y_tip),
                PixelPoint::new(frame.left, y_tip - ARROW_LENGTH),
            ],
            &fill,
        );

        // x axis, arrow pointing right
        let x_tip = frame.right + AXIS_OVERHANG;
        surface.draw_line(
            PixelPoint::new(frame.left, frame.bottom),
            PixelPoint::new(x_tip, frame.bottom),
            &axis,
        );
        surface.draw_polygon(
            &[
                PixelPoint::new(x_tip, frame.bottom - ARROW_HALF_WIDTH),
                PixelPoint::new(x_tip, frame.bottom + ARROW_HALF_WIDTH),
                PixelPoint::new(x_tip + ARROW_LENGTH, frame.bottom),
            ],
            &fill,
        );
    }

    fn draw_axis_labels<S: DrawingSurface + ?Sized>(&self, viewport: &Viewport, surface: &mut S) {
        let frame = viewport.frame;
        let title = &self.style.title_font;
        surface.draw_text(
            X_AXIS_TITLE,
            PixelPoint::new(frame.width() / 2.0 + frame.left, frame.bottom + X_TITLE_OFFSET),
            title,
        );
        surface.draw_text(
            Y_AXIS_TITLE,
            PixelPoint::new(frame.left - Y_TITLE_OFFSET, frame.height() / 2.0 + frame.top),
            title,
        );

        // Hours ago: the window boundary at the origin, then counting down to 0 at the right edge.
        let font = &self.style.label_font;
        let y = frame.bottom + X_TICK_LABEL_OFFSET;
        let hours = viewport.window_hours;
        surface.draw_text(&hours.to_string(), PixelPoint::new(frame.left, y), font);
        for i in 0..hours {
            let x = f64::from(hours - i) / f64::from(hours) * frame.width() + frame.left;
            surface.draw_text(&i.to_string(), PixelPoint::new(x, y), font);
        }
    }

    fn draw_value_ticks<S: DrawingSurface + ?Sized>(
        &self,
        frame: &Frame,
        scale: ValueScale,
        surface: &mut S,
    ) {
        let step = self.style.gridline_step;
        if !(step.is_finite() && step > 0.0) {
            return;
        }
        let grid = LineStyle::solid(self.style.gridline_color.clone());

        // n * step < max for n in 0..ticks; the extra slot absorbs rounding in the division.
        let ticks = (scale.max_value / step).ceil() + 1.0;
        let stride = if ticks > MAX_VALUE_TICKS as f64 {
            (ticks / MAX_VALUE_TICKS as f64).ceil() as u64
        } else {
            1
        };

        for n in (0..ticks as u64).step_by(stride as usize) {
            let value = n as f64 * step;
            if value >= scale.max_value {
                break;
            }
            let y = scale.y(value, frame);
            surface.draw_text(
                &value.to_string(),
                PixelPoint::new(frame.left - Y_TICK_LABEL_OFFSET, y),
                &self.style.label_font,
            );
            if n > 0 {
                surface.draw_line(
                    PixelPoint::new(frame.left, y),
                    PixelPoint::new(frame.right, y),
                    &grid,
                );
            }
        }
    }

    /// Swatch + symbol, centred in the series' share of the top edge.
    fn draw_legend_entry<S: DrawingSurface + ?Sized>(
        &self,
        frame: &Frame,
        polyline: &Polyline,
        count: usize,
        surface: &mut S,
    ) {
        let font = &self.style.title_font;
        let font_height = surface.font_height(font);
        let count = count.max(1) as f64;
        let share = frame.width() / count;

        let x = polyline.index as f64 * share + frame.left + share / 2.0;
        let y = frame.top - font_height / 3.0 - LEGEND_RAISE;

        surface.draw_line(
            PixelPoint::new(x, y),
            PixelPoint::new(x + LEGEND_SWATCH_LENGTH, y),
            &LineStyle::solid(self.style.color(polyline.color_index)),
        );
        surface.draw_text(
            polyline.symbol.as_str(),
            PixelPoint::new(x + LEGEND_TEXT_GAP, y + font_height / 3.0),
            font,
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::{
        chart::{projector::ChartProjector, surface::DisplayList},
        models::{Point, Series},
    };

    use super::*;

    fn viewport() -> Viewport {
        let as_of = Utc.with_ymd_and_hms(2025, 4, 1, 20, 0, 0).unwrap();
        Viewport::new(ChartConfig::default().frame(), as_of, 9)
    }

    fn series(symbol: &str, values: &[f64]) -> Series {
        let start = viewport().window.start;
        Series::new(
            symbol.into(),
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Point::new(start + Duration::minutes(30 * i as i64), *v))
                .collect(),
        )
    }

    fn render(series: &[Series]) -> DisplayList {
        let style = ChartStyle::default();
        let layout = ChartProjector::new(style.palette.len()).project(series, viewport());
        let mut surface = DisplayList::new();
        Renderer::new(style).render(&layout, &mut surface);
        surface
    }

    #[test]
    fn axes_end_in_arrowheads() {
        let surface = render(&[]);
        let polygons: Vec<&[PixelPoint]> = surface.polygons().collect();
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0][2], PixelPoint::new(100.0, 20.0));
        assert_eq!(polygons[1][2], PixelPoint::new(1030.0, 550.0));
    }

    #[test]
    fn empty_layout_draws_only_axes_and_labels() {
        let surface = render(&[]);

        assert_eq!(surface.lines().count(), 2);
        assert_eq!(surface.polylines().count(), 0);

        let texts: Vec<&str> = surface.texts().collect();
        assert_eq!(
            texts,
            [
                "Time (Hours Ago)",
                "Price ($)",
                "9",
                "0",
                "1",
                "2",
                "3",
                "4",
                "5",
                "6",
                "7",
                "8"
            ]
        );
    }

    #[test]
    fn hour_ticks_count_down_left_to_right() {
        let surface = render(&[]);
        let zero = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                crate::chart::DrawCommand::Text { text, position, .. } if text == "0" => {
                    Some(*position)
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(zero, PixelPoint::new(1000.0, 575.0));
    }

    #[test]
    fn huge_values_thin_out_value_ticks() {
        let surface = render(&[series("AAA", &[1.0, 5e10])]);

        let value_labels: Vec<f64> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                crate::chart::DrawCommand::Text { text, position, .. } if position.x == 75.0 => {
                    text.parse().ok()
                }
                _ => None,
            })
            .collect();

        assert!(!value_labels.is_empty());
        assert!(value_labels.len() as u64 <= MAX_VALUE_TICKS);
        assert_eq!(value_labels[0], 0.0);
        for value in &value_labels {
            assert_eq!(value % 10.0, 0.0, "{value}");
            assert!(*value < 5e10);
        }
        assert_eq!(surface.polylines().count(), 1);
    }

    #[test]
    fn gridlines_every_step_below_max() {
        let surface = render(&[series("AAA", &[12.0, 35.0])]);

        let value_labels: Vec<&str> = surface
            .texts()
            .filter(|t| ["0", "10", "20", "30"].contains(t))
            .collect();
        // "0" also appears among the hour ticks
        assert_eq!(value_labels, ["0", "0", "10", "20", "30"]);

        let gridlines: Vec<_> = surface
            .lines()
            .filter(|(_, _, style)| style.color == Color::from("#BBB"))
            .collect();
        assert_eq!(gridlines.len(), 3);
        let (start, end, _) = gridlines[0];
        // 10 of 35 over a 500px frame
        let y = 550.0 - 10.0 / 35.0 * 500.0;
        assert_eq!(start, PixelPoint::new(100.0, y));
        assert_eq!(end, PixelPoint::new(1000.0, y));
    }

    #[test]
    fn one_polyline_and_legend_entry_per_series() {
        let surface = render(&[series("AAA", &[10.0, 20.0]), series("BBB", &[5.0, 15.0])]);

        let polylines: Vec<_> = surface.polylines().collect();
        assert_eq!(polylines.len(), 2);
        assert_eq!(polylines[0].1.color, Color::from("red"));
        assert_eq!(polylines[1].1.color, Color::from("orange"));
        assert_eq!(polylines[0].1.width, 3.0);
        assert!(polylines[0].1.round_join);

        let legend: Vec<_> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                crate::chart::DrawCommand::Text { text, position, .. }
                    if text == "AAA" || text == "BBB" =>
                {
                    Some((text.as_str(), *position))
                }
                _ => None,
            })
            .collect();
        assert_eq!(legend.len(), 2);
        // halves of a 900px top edge, centred: 325 and 775, text 25px right of the swatch
        assert_eq!(legend[0].0, "AAA");
        assert_eq!(legend[0].1.x, 350.0);
        assert_eq!(legend[1].0, "BBB");
        assert_eq!(legend[1].1.x, 800.0);
        // text baseline sits h/3 below the swatch, which is raised 15px + h/3 above the frame
        assert!((legend[0].1.y - 35.0).abs() < 1e-9);
    }
}
