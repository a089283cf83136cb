use chrono::{DateTime, Duration, Utc};

/// A position on the canvas, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for PixelPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// The plot rectangle. Y grows downwards, so `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Frame {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// The time range mapped onto the frame's horizontal extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// `[as_of - hours, as_of]`.
    pub fn trailing_hours(as_of: DateTime<Utc>, hours: u32) -> Self {
        Self {
            start: as_of - Duration::hours(i64::from(hours)),
            end: as_of,
        }
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

/// Frame plus time window for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub frame: Frame,
    pub window: TimeWindow,
    /// Whole hours covered by `window`, used for the x-axis tick labels.
    pub window_hours: u32,
}

impl Viewport {
    pub fn new(frame: Frame, as_of: DateTime<Utc>, window_hours: u32) -> Self {
        Self {
            frame,
            window: TimeWindow::trailing_hours(as_of, window_hours),
            window_hours,
        }
    }

    /// Horizontal pixel for `t`. Times outside the window land outside the frame.
    pub fn x(&self, t: DateTime<Utc>) -> f64 {
        let span = self.window.span().num_milliseconds() as f64;
        if span <= 0.0 {
            return self.frame.left;
        }
        let offset = (t - self.window.start).num_milliseconds() as f64;
        offset / span * self.frame.width() + self.frame.left
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn reference() -> Viewport {
        let frame = Frame {
            left: 100.0,
            right: 1000.0,
            top: 50.0,
            bottom: 550.0,
        };
        Viewport::new(frame, Utc.with_ymd_and_hms(2025, 1, 6, 18, 0, 0).unwrap(), 9)
    }

    #[test]
    fn window_ends_at_as_of() {
        let vp = reference();
        assert_eq!(vp.window.end, Utc.with_ymd_and_hms(2025, 1, 6, 18, 0, 0).unwrap());
        assert_eq!(vp.window.start, Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap());
    }

    #[test]
    fn x_maps_window_edges_to_frame_edges() {
        let vp = reference();
        assert_eq!(vp.x(vp.window.start), 100.0);
        assert_eq!(vp.x(vp.window.end), 1000.0);
        let midpoint = vp.window.start + Duration::minutes(270);
        assert_eq!(vp.x(midpoint), 550.0);
    }

    #[test]
    fn x_passes_through_outside_window() {
        let vp = reference();
        assert!(vp.x(vp.window.start - Duration::hours(1)) < vp.frame.left);
        assert!(vp.x(vp.window.end + Duration::hours(1)) > vp.frame.right);
    }
}
