//! Daily market observation models

use chrono::NaiveDate;

/// One trading day's OHLCV for one ticker, as returned by the provider.
///
/// Fields are optional because the provider reports null prices on partial rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerObservation {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// An observation with every OHLCV field present
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompleteObservation {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl TickerObservation {
    /// Returns the observation only if no OHLCV field is null or NaN
    pub fn complete(&self) -> Option<CompleteObservation> {
        let open = self.open.filter(|v| !v.is_nan())?;
        let high = self.high.filter(|v| !v.is_nan())?;
        let low = self.low.filter(|v| !v.is_nan())?;
        let close = self.close.filter(|v| !v.is_nan())?;
        let volume = self.volume?;

        Some(CompleteObservation {
            date: self.date,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// True when every OHLCV field is null (holiday rows)
    pub fn is_empty_row(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }
}
