use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    config::ProviderConfig,
    models::{Point, Series, Symbol},
    providers::{
        ClientBuildSnafu, ClientError, InvalidBaseUrlSnafu, NetworkSnafu, ProtocolSnafu,
        ProviderInitError, SeriesSource, ServerSnafu, SymbolSource,
        http::response::{ApiErrorBody, RawPoint, SymbolsResponse},
    },
};

const STOCKS_PATH: &str = "stocks";

/// Client for a backend exposing `GET /stocks` and `GET /stocks/{symbol}`.
pub struct HttpStockProvider {
    client: Client,
    base_url: Url,
}

impl HttpStockProvider {
    /// Creates a provider for the backend at `config.base_url`.
    ///
    /// Every request made through it is bounded by `config.request_timeout_ms`.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderInitError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            InvalidBaseUrlSnafu {
                url: config.base_url.as_str(),
                reason: e.to_string(),
            }
            .build()
        })?;
        if base_url.cannot_be_a_base() {
            return InvalidBaseUrlSnafu {
                url: config.base_url.as_str(),
                reason: "URL cannot carry a path",
            }
            .fail();
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ClientError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .context(NetworkSnafu { url: url.as_str() })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context(NetworkSnafu { url: url.as_str() })?;

        decode_response(url.as_str(), status, &body)
    }
}

/// Maps a status/body pair onto the backend contract.
///
/// - 200: the body must decode as `T`;
/// - 500: the body must carry `{"message": ...}`, reported as a server error;
/// - anything else is a protocol error.
fn decode_response<T: DeserializeOwned>(
    url: &str,
    status: StatusCode,
    body: &str,
) -> Result<T, ClientError> {
    if status == StatusCode::OK {
        return serde_json::from_str(body).map_err(|e| {
            ProtocolSnafu {
                url,
                reason: format!("malformed body: {e}"),
            }
            .build()
        });
    }

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        return match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) => ServerSnafu {
                url,
                message: err.message,
            }
            .fail(),
            Err(e) => ProtocolSnafu {
                url,
                reason: format!("status 500 with malformed error body: {e}"),
            }
            .fail(),
        };
    }

    ProtocolSnafu {
        url,
        reason: format!("unexpected status {status}"),
    }
    .fail()
}

#[async_trait]
impl SymbolSource for HttpStockProvider {
    async fn fetch_symbols(&self) -> Result<Vec<Symbol>, ClientError> {
        let url = self.endpoint(&[STOCKS_PATH]);
        let body: SymbolsResponse = self.get_json(&url).await?;
        debug!(count = body.stock_symbols.len(), "fetched symbol list");
        Ok(body.stock_symbols)
    }
}

#[async_trait]
impl SeriesSource for HttpStockProvider {
    async fn fetch_series(
        &self,
        symbol: &Symbol,
        as_of: DateTime<Utc>,
    ) -> Result<Series, ClientError> {
        // The backend bounds history with its own clock; as_of is only logged.
        let url = self.endpoint(&[STOCKS_PATH, symbol.as_str()]);
        let raw: Vec<RawPoint> = self.get_json(&url).await?;

        let points = raw
            .into_iter()
            .map(RawPoint::into_point)
            .collect::<Result<Vec<Point>, String>>()
            .map_err(|reason| {
                ProtocolSnafu {
                    url: url.as_str(),
                    reason,
                }
                .build()
            })?;

        debug!(%symbol, %as_of, points = points.len(), "fetched series");
        Ok(Series::new(symbol.clone(), points))
    }
}
