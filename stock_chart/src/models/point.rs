use chrono::{DateTime, Utc};

/// A single observation of an instrument's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// When the value was observed (UTC).
    pub timestamp: DateTime<Utc>,
    /// Observed value (price).
    pub value: f64,
}

impl Point {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}
