//! Runtime configuration: backend endpoint and chart geometry.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) yields the reference layout talking to `http://localhost:3000`.
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_config_str`]
//! - Read, parse + validate from disk: [`load_config_path`]
//! - Apply `STOCK_CHART_*` environment overrides: [`AppConfig::apply_env_overrides`]

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use shared_utils::env::{EnvVarError, env_override};
use thiserror::Error;

use crate::chart::{
    geometry::Frame,
    surface::Color,
};

pub const BASE_URL_ENV: &str = "STOCK_CHART_BASE_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "STOCK_CHART_REQUEST_TIMEOUT_MS";

/// Errors related to loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Env(#[from] EnvVarError),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub chart: ChartConfig,
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL; `/stocks` and `/stocks/{symbol}` are resolved against it.
    pub base_url: String,
    /// Upper bound for a single request, also used as the per-symbol fetch budget.
    pub request_timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Canvas size, plot rectangle, time window and styling of the chart.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    /// Length of the lookback window ending at "now".
    pub window_hours: u32,
    /// Value distance between horizontal gridlines.
    pub gridline_step: f64,
    pub line_width: f64,
    /// Series colours, assigned by series position modulo the palette length.
    pub palette: Vec<Color>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1100,
            canvas_height: 650,
            left: 100.0,
            right: 1000.0,
            top: 50.0,
            bottom: 550.0,
            window_hours: 9,
            gridline_step: 10.0,
            line_width: 3.0,
            palette: ["red", "orange", "green", "blue", "purple"]
                .into_iter()
                .map(Color::from)
                .collect(),
        }
    }
}

impl ChartConfig {
    pub fn frame(&self) -> Frame {
        Frame {
            left: self.left,
            right: self.right,
            top: self.top,
            bottom: self.bottom,
        }
    }
}

impl AppConfig {
    /// Checks the invariants the projector and renderer rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.chart;
        if !(c.left.is_finite() && c.right.is_finite() && c.right > c.left) {
            return Err(invalid(format!(
                "chart.right ({}) must be greater than chart.left ({})",
                c.right, c.left
            )));
        }
        if !(c.top.is_finite() && c.bottom.is_finite() && c.bottom > c.top) {
            return Err(invalid(format!(
                "chart.bottom ({}) must be greater than chart.top ({})",
                c.bottom, c.top
            )));
        }
        if c.window_hours == 0 {
            return Err(invalid("chart.window_hours must be at least 1"));
        }
        if !(c.gridline_step.is_finite() && c.gridline_step > 0.0) {
            return Err(invalid(format!(
                "chart.gridline_step must be a positive number, got {}",
                c.gridline_step
            )));
        }
        if c.palette.is_empty() {
            return Err(invalid("chart.palette must name at least one colour"));
        }
        if self.provider.request_timeout_ms == 0 {
            return Err(invalid("provider.request_timeout_ms must be non-zero"));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(invalid("provider.base_url cannot be empty"));
        }
        Ok(())
    }

    /// Overrides provider settings from `STOCK_CHART_BASE_URL` and
    /// `STOCK_CHART_REQUEST_TIMEOUT_MS` when they are set.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(url) = env_override::<String>(BASE_URL_ENV)? {
            self.provider.base_url = url;
        }
        if let Some(ms) = env_override::<u64>(REQUEST_TIMEOUT_ENV)? {
            self.provider.request_timeout_ms = ms;
        }
        self.validate()
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

/// Parse and validate a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(toml_str)?;
    config.validate()?;
    Ok(config)
}

/// Read a configuration file from disk, parse and validate it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_str(&text)
}
