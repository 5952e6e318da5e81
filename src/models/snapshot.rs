//! Snapshot models

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::metric::{MetricField, MetricRecord};

/// The per-ticker metric set for one reference date, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub reference_date: NaiveDate,
    records: Vec<MetricRecord>,
}

impl Snapshot {
    pub fn new(reference_date: NaiveDate) -> Self {
        Snapshot {
            reference_date,
            records: Vec::new(),
        }
    }

    /// Append a record. A ticker already present is replaced in place so
    /// insertion order stays stable.
    pub fn insert(&mut self, record: MetricRecord) {
        match self.records.iter_mut().find(|r| r.ticker == record.ticker) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    #[cfg(test)]
    pub fn get(&self, ticker: &str) -> Option<&MetricRecord> {
        self.records.iter().find(|r| r.ticker == ticker)
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(ticker, value)` pairs for a field, skipping absent or non-finite values
    pub fn series(&self, field: MetricField) -> Vec<(&str, f64)> {
        self.records
            .iter()
            .filter_map(|r| {
                r.get(field)
                    .filter(|v| v.is_finite())
                    .map(|v| (r.ticker.as_str(), v))
            })
            .collect()
    }
}

/// Why a ticker did not make it into a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Provider(String),
    Timeout,
    InsufficientHistory,
    DegenerateMetric(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Provider(msg) => write!(f, "provider error: {}", msg),
            SkipReason::Timeout => write!(f, "provider timed out"),
            SkipReason::InsufficientHistory => write!(f, "fewer than 2 valid trading days"),
            SkipReason::DegenerateMetric(msg) => write!(f, "degenerate metric: {}", msg),
        }
    }
}

/// A snapshot plus the tickers that were left out of it
#[derive(Debug, Clone)]
pub struct AggregateResult {
    pub snapshot: Snapshot,
    pub skipped: Vec<(String, SkipReason)>,
}
