use thiserror::Error;

use crate::{config::ConfigError, providers::ProviderInitError};

/// The unified error type for setting up and finishing a chart run.
///
/// Per-symbol fetch failures never surface here; they are folded into the
/// [`RenderOutcome`](crate::pipeline::RenderOutcome).
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// The HTTP provider could not be constructed.
    #[error("Provider setup failed")]
    ProviderInit(#[from] ProviderInitError),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
