pub mod aggregation;
pub mod point;
pub mod series;
pub mod symbol;

pub use aggregation::{AggregationResult, FailureSet};
pub use point::Point;
pub use series::Series;
pub use symbol::Symbol;
