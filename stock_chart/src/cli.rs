use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, info};

use crate::{
    chart::SvgSurface,
    config::{AppConfig, load_config_path},
    errors::Error,
    pipeline::{DisplayHost, PipelineSettings, RenderOutcome, display_chart},
    providers::HttpStockProvider,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Render recent stock prices as an SVG line chart")]
pub struct Cli {
    /// Path to the config file (stock_chart.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend base URL; takes precedence over the config file and environment
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Where to write the rendered chart
    #[arg(short, long, value_name = "FILE", default_value = "chart.svg")]
    pub output: PathBuf,
}

impl Cli {
    /// Config file (or defaults), then environment, then command-line flags.
    pub fn load_config(&self) -> Result<AppConfig, Error> {
        let mut config = match &self.config {
            Some(path) => load_config_path(path)?,
            None => AppConfig::default(),
        };
        config.apply_env_overrides()?;
        if let Some(url) = &self.base_url {
            config.provider.base_url = url.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Terminal host: banners go to stderr, the canvas becomes a file.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    canvas_visible: bool,
    banner: Option<String>,
}

impl ConsoleHost {
    pub fn canvas_visible(&self) -> bool {
        self.canvas_visible
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }
}

impl DisplayHost for ConsoleHost {
    fn hide_loading(&mut self) {
        debug!("loading finished");
    }

    fn show_content(&mut self) {}

    fn show_error(&mut self, message: &str) {
        eprintln!("{message}");
        self.banner = Some(message.to_string());
    }

    fn show_canvas(&mut self) {
        self.canvas_visible = true;
    }
}

/// Runs one render cycle and writes the SVG to `output` if the canvas was shown.
pub async fn run(config: &AppConfig, output: &Path) -> Result<RenderOutcome, Error> {
    let provider = HttpStockProvider::new(&config.provider)?;
    info!(base_url = %provider.base_url(), "rendering chart");

    let mut surface = SvgSurface::new(config.chart.canvas_width, config.chart.canvas_height);
    let mut host = ConsoleHost::default();
    let outcome = display_chart(
        &provider,
        &provider,
        &mut surface,
        &mut host,
        PipelineSettings::from_config(config),
    )
    .await;

    if host.canvas_visible() {
        std::fs::write(output, surface.finish())?;
        info!(path = %output.display(), "chart written");
    }
    Ok(outcome)
}
