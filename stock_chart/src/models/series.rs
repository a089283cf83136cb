//! One symbol's time series.

use crate::models::{point::Point, symbol::Symbol};

/// The points fetched for a single symbol.
///
/// Points arrive ordered by non-decreasing timestamp from the provider and are
/// kept in that order; nothing in this crate re-sorts them.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// The symbol this data represents.
    pub symbol: Symbol,
    /// Observations in provider order.
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(symbol: Symbol, points: Vec<Point>) -> Self {
        Self { symbol, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
