use chrono::{DateTime, NaiveDate};
use reqwest::Client as HttpClient;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{ChartResponse, ProviderError};
use crate::api::ObservationSource;
use crate::models::TickerObservation;
use crate::utils::rate_limit_provider;

/// Yahoo Finance chart API client for daily OHLCV history
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
}

impl YahooClient {
    const DEFAULT_BASE_URL: &'static str = "https://query2.finance.yahoo.com/v8/finance/chart";
    const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

    /// Create a new client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string(), timeout)
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(Self::USER_AGENT)
            .build()
            .map_err(|e| ProviderError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Build the chart URL for a symbol and inclusive date range
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp()).unwrap_or(0);
        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(start_ts);
        format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            symbol.replace('^', "%5E"),
            start_ts,
            end_ts
        )
    }

    /// GET /v8/finance/chart/{symbol}
    ///
    /// Retrieves daily observations between `start` and `end` (inclusive).
    /// Rows where every OHLCV field is null are dropped.
    pub async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TickerObservation>, ProviderError> {
        rate_limit_provider().await;

        let url = self.chart_url(symbol, start, end);
        debug!("Fetching {} history {}..{}", symbol, start, end);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::RequestError(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by provider while fetching {}", symbol);
            return Err(ProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::SymbolNotFound(symbol.to_string()));
        }
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::HttpError(status.as_u16(), body_text));
        }

        let chart = response
            .json::<ChartResponse>()
            .await
            .map_err(|e| ProviderError::ResponseFormat(format!("Failed to parse response: {}", e)))?;

        parse_response(symbol, chart)
    }
}

impl ObservationSource for YahooClient {
    fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<TickerObservation>, ProviderError>> + Send {
        self.fetch_history(ticker, start, end)
    }
}

/// Convert the column-oriented chart payload into chronological observations
pub fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<TickerObservation>, ProviderError> {
    let result = match resp.chart.result {
        Some(result) => result,
        None => {
            return Err(match resp.chart.error {
                Some(err) if err.code == "Not Found" => ProviderError::SymbolNotFound(symbol.to_string()),
                Some(err) => ProviderError::ResponseFormat(format!("{}: {}", err.code, err.description)),
                None => ProviderError::ResponseFormat("empty result with no error".to_string()),
            })
        }
    };

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ResponseFormat("result array is empty".to_string()))?;

    let gmt_offset = data.meta.as_ref().and_then(|m| m.gmtoffset).unwrap_or(0);

    // No trading days in the window
    let timestamps = match data.timestamp {
        Some(ts) => ts,
        None => return Ok(Vec::new()),
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ResponseFormat("no quote data".to_string()))?;

    let mut observations = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = DateTime::from_timestamp(ts + gmt_offset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| ProviderError::ResponseFormat(format!("invalid timestamp: {}", ts)))?;

        let observation = TickerObservation {
            date,
            open: quote.open.get(i).copied().flatten(),
            high: quote.high.get(i).copied().flatten(),
            low: quote.low.get(i).copied().flatten(),
            close: quote.close.get(i).copied().flatten(),
            volume: quote.volume.get(i).copied().flatten(),
        };

        if !observation.is_empty_row() {
            observations.push(observation);
        }
    }

    observations.sort_by_key(|o| o.date);
    Ok(observations)
}
