use serde::Deserialize;
use thiserror::Error;

/// Yahoo Finance v8 chart API response
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartResult,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub result: Option<Vec<ChartData>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartData {
    pub meta: Option<ChartMeta>,
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

/// Exchange metadata; only the UTC offset is needed to date the bars
#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    pub gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    pub quote: Vec<QuoteData>,
}

/// Column-oriented OHLCV arrays aligned with `timestamp`
#[derive(Debug, Deserialize)]
pub struct QuoteData {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

/// Per-ticker provider failure. Never aborts a snapshot build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),
    #[error("Rate limited by provider")]
    RateLimited,
    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Unexpected response format: {0}")]
    ResponseFormat(String),
}
