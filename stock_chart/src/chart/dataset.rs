use chrono::{DateTime, Utc};

use crate::models::{Series, Symbol};

/// Column-oriented view of a [`Series`] for drawing.
///
/// `values[i]` and `timestamps[i]` describe the same point.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub symbol: Symbol,
    pub values: Vec<f64>,
    pub timestamps: Vec<DateTime<Utc>>,
}

impl ChartDataset {
    pub fn from_series(series: &Series) -> Self {
        let (timestamps, values) = series
            .points
            .iter()
            .map(|p| (p.timestamp, p.value))
            .unzip();
        Self {
            symbol: series.symbol.clone(),
            values,
            timestamps,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }
}
