//! One render cycle: symbols → aggregation → projection → drawing.
//!
//! The host calls [`ChartPipeline::run`] once (typically at startup) with the
//! surface to draw on and a [`DisplayHost`] owning the loading indicator, the
//! error banner and the canvas visibility.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::{
    aggregator::Aggregator,
    chart::{ChartProjector, ChartStyle, DrawingSurface, Renderer, Viewport},
    config::{AppConfig, ChartConfig},
    models::FailureSet,
    providers::{SeriesSource, SymbolSource},
};

pub const SYMBOLS_UNAVAILABLE: &str = "Some error happened when retrieving the stock symbols";

/// Show/hide toggles of the page hosting the chart.
pub trait DisplayHost {
    fn hide_loading(&mut self);
    fn show_content(&mut self);
    fn show_error(&mut self, message: &str);
    fn show_canvas(&mut self);
}

/// Terminal state of a render cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The symbol list could not be fetched; nothing was drawn.
    Fatal { message: String },
    /// Every requested symbol was drawn.
    Success { drawn: usize },
    /// Some symbols failed; the rest were drawn and a warning was shown.
    Partial {
        drawn: usize,
        failed: FailureSet,
        warning: String,
    },
}

impl RenderOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    /// Not a hard error, but the chart has no series to show.
    pub fn is_effectively_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. } | Self::Partial { drawn: 0, .. })
    }

    pub fn canvas_shown(&self) -> bool {
        !self.is_fatal()
    }

    /// The message shown in the error banner, if any.
    pub fn banner(&self) -> Option<&str> {
        match self {
            Self::Fatal { message } => Some(message),
            Self::Partial { warning, .. } => Some(warning),
            Self::Success { .. } => None,
        }
    }
}

/// Builds the banner text listing symbols left out of the chart.
pub fn failure_warning(failed: &FailureSet) -> Option<String> {
    let names: Vec<&str> = failed.iter().map(|s| s.as_str()).collect();
    match names.as_slice() {
        [] => None,
        [only] => Some(format!(
            "The following stock is not included in the chart because some error has occurred when obtaining its information: {only}"
        )),
        many => Some(format!(
            "The following stocks are not included in the chart because some error has occurred when obtaining their information: {}",
            many.join(", ")
        )),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSettings {
    pub chart: ChartConfig,
    /// Budget for each per-symbol fetch; `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

impl PipelineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chart: config.chart.clone(),
            fetch_timeout: Some(config.provider.request_timeout()),
        }
    }
}

/// Runs one render cycle ending at the current time.
pub async fn display_chart<D, H>(
    symbols: &dyn SymbolSource,
    series: &dyn SeriesSource,
    surface: &mut D,
    host: &mut H,
    settings: PipelineSettings,
) -> RenderOutcome
where
    D: DrawingSurface + ?Sized,
    H: DisplayHost + ?Sized,
{
    ChartPipeline::new(symbols, series, settings)
        .run(surface, host, Utc::now())
        .await
}

pub struct ChartPipeline<'a> {
    symbols: &'a dyn SymbolSource,
    series: &'a dyn SeriesSource,
    settings: PipelineSettings,
}

impl<'a> ChartPipeline<'a> {
    pub fn new(
        symbols: &'a dyn SymbolSource,
        series: &'a dyn SeriesSource,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            symbols,
            series,
            settings,
        }
    }

    /// Runs one cycle with `as_of` as the end of the time window.
    pub async fn run<D, H>(&self, surface: &mut D, host: &mut H, as_of: DateTime<Utc>) -> RenderOutcome
    where
        D: DrawingSurface + ?Sized,
        H: DisplayHost + ?Sized,
    {
        let symbols = match self.symbols.fetch_symbols().await {
            Ok(symbols) => symbols,
            Err(error) => {
                error!(kind = ?error.kind(), %error, "failed to fetch symbol list");
                host.hide_loading();
                host.show_content();
                host.show_error(SYMBOLS_UNAVAILABLE);
                return RenderOutcome::Fatal {
                    message: SYMBOLS_UNAVAILABLE.to_string(),
                };
            }
        };
        info!(count = symbols.len(), "fetched symbols");

        let mut aggregator = Aggregator::new(self.series);
        if let Some(timeout) = self.settings.fetch_timeout {
            aggregator = aggregator.with_timeout(timeout);
        }
        let aggregation = aggregator.aggregate(&symbols, as_of).await;
        if aggregation.is_total_failure() {
            warn!(requested = symbols.len(), "no series could be fetched");
        }

        host.hide_loading();
        host.show_content();
        let warning = failure_warning(&aggregation.failed);
        if let Some(warning) = &warning {
            host.show_error(warning);
        }

        let chart = &self.settings.chart;
        let viewport = Viewport::new(chart.frame(), as_of, chart.window_hours);
        let layout = ChartProjector::new(chart.palette.len()).project(&aggregation.series, viewport);
        Renderer::new(ChartStyle::from_config(chart)).render(&layout, surface);
        host.show_canvas();

        let drawn = aggregation.series.len();
        info!(drawn, failed = aggregation.failed.len(), axes_only = layout.is_axes_only(), "chart rendered");

        match warning {
            None => RenderOutcome::Success { drawn },
            Some(warning) => RenderOutcome::Partial {
                drawn,
                failed: aggregation.failed,
                warning,
            },
        }
    }
}
