//! Turning aggregated series into pixels.
//!
//! [`projector::ChartProjector`] maps `(timestamp, value)` pairs into the plot
//! rectangle of a [`geometry::Viewport`]; [`renderer::Renderer`] issues the
//! drawing primitives for axes, labels, gridlines, lines and legend onto any
//! [`surface::DrawingSurface`].

pub mod dataset;
pub mod geometry;
pub mod projector;
pub mod renderer;
pub mod surface;
pub mod svg;

pub use dataset::ChartDataset;
pub use geometry::{Frame, PixelPoint, TimeWindow, Viewport};
pub use projector::{ChartLayout, ChartProjector, Polyline, ValueScale};
pub use renderer::{ChartStyle, Renderer};
pub use surface::{Color, DisplayList, DrawCommand, DrawingSurface, Fill, Font, LineStyle};
pub use svg::SvgSurface;
