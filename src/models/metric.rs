//! Per-ticker derived metric models

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Comparative metrics derived from the latest two trading days of one ticker.
///
/// `market_value` is `None` when the share count is unknown. A `None` is the only
/// "no data" marker; zero is always a real value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub ticker: String,
    pub previous_date: NaiveDate,
    pub latest_date: NaiveDate,
    pub close: f64,
    pub price_variation_pct: f64,
    pub range_pct: f64,
    pub open_close_pct: f64,
    pub volume_value: f64,
    pub market_value: Option<f64>,
}

impl MetricRecord {
    /// Look up a metric by field. Returns `None` when the field is absent.
    pub fn get(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::PriceVariation => Some(self.price_variation_pct),
            MetricField::Range => Some(self.range_pct),
            MetricField::OpenClose => Some(self.open_close_pct),
            MetricField::VolumeValue => Some(self.volume_value),
            MetricField::MarketValue => self.market_value,
            MetricField::Close => Some(self.close),
        }
    }

    /// Every present field is finite
    pub fn is_finite(&self) -> bool {
        MetricField::ALL
            .iter()
            .filter_map(|f| self.get(*f))
            .all(f64::is_finite)
    }
}

/// Selectable metric columns of a `MetricRecord`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    PriceVariation,
    Range,
    OpenClose,
    VolumeValue,
    MarketValue,
    Close,
}

impl MetricField {
    pub const ALL: [MetricField; 6] = [
        MetricField::PriceVariation,
        MetricField::Range,
        MetricField::OpenClose,
        MetricField::VolumeValue,
        MetricField::MarketValue,
        MetricField::Close,
    ];

    /// Human-readable column label
    pub fn label(&self) -> &'static str {
        match self {
            MetricField::PriceVariation => "Price Variation (%)",
            MetricField::Range => "Intraday Range (%)",
            MetricField::OpenClose => "Open/Close (%)",
            MetricField::VolumeValue => "Volume * Price",
            MetricField::MarketValue => "Market Value",
            MetricField::Close => "Close",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
