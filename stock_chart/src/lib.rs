//! Multi-symbol price chart: fetch every symbol's recent series from an HTTP
//! backend, keep going when individual symbols fail, and draw the survivors
//! on a fixed-size canvas.
//!
//! The flow of one render cycle lives in [`pipeline`]; the building blocks
//! are usable on their own.

pub mod aggregator;
pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod providers;

pub use pipeline::{ChartPipeline, DisplayHost, PipelineSettings, RenderOutcome, display_chart};
