//! Numeric-to-pixel mapping for a set of series.

use crate::{
    chart::{
        dataset::ChartDataset,
        geometry::{Frame, PixelPoint, Viewport},
    },
    models::{Series, Symbol},
};

/// Vertical scale: `0` sits on the frame's bottom edge, `max_value` on its top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub max_value: f64,
}

impl ValueScale {
    /// `None` unless `max_value` is a positive, finite number.
    pub fn new(max_value: f64) -> Option<Self> {
        (max_value.is_finite() && max_value > 0.0).then_some(Self { max_value })
    }

    pub fn y(&self, value: f64, frame: &Frame) -> f64 {
        frame.bottom - value / self.max_value * frame.height()
    }
}

/// One series in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub symbol: Symbol,
    /// Position of the series in the projected input.
    pub index: usize,
    /// Palette slot: `index % palette_size`.
    pub color_index: usize,
    /// One pixel per input point, same order.
    pub points: Vec<PixelPoint>,
}

/// Everything the renderer needs for one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub viewport: Viewport,
    /// `None` means there is nothing to scale: draw axes and labels only.
    pub scale: Option<ValueScale>,
    pub polylines: Vec<Polyline>,
}

impl ChartLayout {
    pub fn axes_only(viewport: Viewport) -> Self {
        Self {
            viewport,
            scale: None,
            polylines: Vec::new(),
        }
    }

    pub fn is_axes_only(&self) -> bool {
        self.scale.is_none()
    }
}

pub struct ChartProjector {
    palette_size: usize,
}

impl ChartProjector {
    pub fn new(palette_size: usize) -> Self {
        Self {
            palette_size: palette_size.max(1),
        }
    }

    /// Projects `series` into `viewport`.
    ///
    /// The maximum value across every point of every series pins the top of the
    /// frame. When there is no positive maximum (no series, no points, or all
    /// values zero or negative) the layout is axes-only. Points are not clipped
    /// to the time window.
    pub fn project(&self, series: &[Series], viewport: Viewport) -> ChartLayout {
        let datasets: Vec<ChartDataset> = series.iter().map(ChartDataset::from_series).collect();
        self.project_datasets(&datasets, viewport)
    }

    pub fn project_datasets(&self, datasets: &[ChartDataset], viewport: Viewport) -> ChartLayout {
        let max_value = datasets
            .iter()
            .filter_map(ChartDataset::max_value)
            .reduce(f64::max);

        let Some(scale) = max_value.and_then(ValueScale::new) else {
            return ChartLayout::axes_only(viewport);
        };

        let polylines = datasets
            .iter()
            .enumerate()
            .map(|(index, ds)| Polyline {
                symbol: ds.symbol.clone(),
                index,
                color_index: index % self.palette_size,
                points: ds
                    .timestamps
                    .iter()
                    .zip(&ds.values)
                    .map(|(t, v)| PixelPoint::new(viewport.x(*t), scale.y(*v, &viewport.frame)))
                    .collect(),
            })
            .collect();

        ChartLayout {
            viewport,
            scale: Some(scale),
            polylines,
        }
    }
}
