//! Provider abstraction for the stock data backend.
//!
//! Two traits split the backend contract along its failure semantics:
//!
//! - [`SymbolSource`] returns the list of known symbols. Its failure is fatal
//!   to a render cycle, since nothing can be fanned out without it.
//! - [`SeriesSource`] returns one symbol's points. Its failure is local to that
//!   symbol and is absorbed by the [`Aggregator`](crate::aggregator::Aggregator).
//!
//! Both are async and object safe, so a pipeline can run against
//! `&dyn SymbolSource` / `&dyn SeriesSource` chosen at runtime.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use stock_chart::models::Symbol;
//! use stock_chart::providers::{ClientError, SymbolSource};
//!
//! struct FixedSymbols;
//!
//! #[async_trait]
//! impl SymbolSource for FixedSymbols {
//!     async fn fetch_symbols(&self) -> Result<Vec<Symbol>, ClientError> {
//!         Ok(vec!["AAA".into(), "BBB".into()])
//!     }
//! }
//! ```

pub mod http;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snafu::{Backtrace, Snafu};

use crate::models::{Series, Symbol};

pub use http::HttpStockProvider;

/// Fetches the list of symbols the backend knows about.
#[async_trait]
pub trait SymbolSource: Send + Sync {
    /// Returns the symbols exactly as the provider lists them, order preserved.
    async fn fetch_symbols(&self) -> Result<Vec<Symbol>, ClientError>;
}

/// Fetches the time series of a single symbol.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Returns `symbol`'s points, bounded by the provider's history horizon
    /// relative to `as_of`.
    async fn fetch_series(
        &self,
        symbol: &Symbol,
        as_of: DateTime<Utc>,
    ) -> Result<Series, ClientError>;
}

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a response (transport failure or timeout).
    Network,
    /// The backend answered with an error message.
    Server,
    /// The backend answered with something this client cannot interpret.
    Protocol,
}

/// Errors raised while talking to the backend.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ClientError {
    /// Transport-level failure (connection refused, reset, client timeout).
    #[snafu(display("Request to {url} failed: {source}"))]
    Network {
        url: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The request did not settle within the allotted time.
    #[snafu(display("Request timed out after {}ms", timeout.as_millis()))]
    Timeout {
        timeout: Duration,
        backtrace: Backtrace,
    },

    /// The backend reported an error (status 500 with a message body).
    #[snafu(display("Server error from {url}: {message}"))]
    Server {
        url: String,
        message: String,
        backtrace: Backtrace,
    },

    /// Unexpected status code or a body that could not be decoded.
    #[snafu(display("Unexpected response from {url}: {reason}"))]
    Protocol {
        url: String,
        reason: String,
        backtrace: Backtrace,
    },
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => FailureKind::Network,
            Self::Server { .. } => FailureKind::Server,
            Self::Protocol { .. } => FailureKind::Protocol,
        }
    }
}

/// Errors that can occur while constructing a provider.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// The configured base URL is not usable.
    #[snafu(display("Invalid base URL {url:?}: {reason}"))]
    InvalidBaseUrl {
        url: String,
        reason: String,
        backtrace: Backtrace,
    },

    /// The HTTP client could not be built.
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}
