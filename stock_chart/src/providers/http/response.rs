use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::models::{Point, Symbol};

/// Body of `GET /stocks`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SymbolsResponse {
    pub stock_symbols: Vec<Symbol>,
}

/// Body the backend sends alongside a 500.
#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub message: String,
}

/// One element of `GET /stocks/{symbol}`.
#[derive(Deserialize, Debug)]
pub struct RawPoint {
    pub timestamp: RawTimestamp,
    pub value: f64,
}

/// Timestamps come either as Unix epoch milliseconds or as ISO-8601 text.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl RawTimestamp {
    pub fn to_utc(&self) -> Result<DateTime<Utc>, String> {
        match self {
            Self::Millis(ms) => DateTime::from_timestamp_millis(*ms)
                .ok_or_else(|| format!("timestamp {ms}ms is out of range")),
            Self::FractionalMillis(ms) => fractional_millis_to_utc(*ms),
            Self::Text(text) => parse_text_timestamp(text),
        }
    }
}

impl RawPoint {
    pub fn into_point(self) -> Result<Point, String> {
        Ok(Point::new(self.timestamp.to_utc()?, self.value))
    }
}

fn fractional_millis_to_utc(ms: f64) -> Result<DateTime<Utc>, String> {
    let micros = (ms * 1000.0).round();
    // i64::MAX as f64 rounds up, so the upper bound is exclusive.
    if !micros.is_finite() || micros < i64::MIN as f64 || micros >= i64::MAX as f64 {
        return Err(format!("timestamp {ms}ms is out of range"));
    }
    let micros = micros as i64;
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    DateTime::from_timestamp(secs, nanos).ok_or_else(|| format!("timestamp {ms}ms is out of range"))
}

fn parse_text_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    // No offset: read as UTC.
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("unparseable timestamp {text:?}: {e}"))
}
