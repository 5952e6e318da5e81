//! External market data providers

use chrono::NaiveDate;
use std::future::Future;

use crate::models::TickerObservation;

pub mod yahoo;

pub use yahoo::{ProviderError, YahooClient};

/// A source of daily observations for one ticker.
///
/// Implementations may return fewer rows than the window holds and make no
/// promise of calendar alignment across tickers.
pub trait ObservationSource: Send + Sync + 'static {
    fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<TickerObservation>, ProviderError>> + Send;
}
