//! In-memory collaborators shared by service tests

use chrono::NaiveDate;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::api::{ObservationSource, ProviderError};
use crate::models::{
    BarItem, Frame, MetricRecord, ScatterPoint, Snapshot, TickerObservation, TreemapCell,
};
use crate::services::chart_service::RenderingSurface;
use crate::utils::RenderError;

/// A flat day: open, high and low all equal the close
pub fn observation(date: NaiveDate, close: f64) -> TickerObservation {
    TickerObservation {
        date,
        open: Some(close),
        high: Some(close),
        low: Some(close),
        close: Some(close),
        volume: Some(1_000),
    }
}

/// Canned provider responses keyed by ticker and reference date
#[derive(Default)]
pub struct StaticSource {
    responses: HashMap<String, Result<Vec<TickerObservation>, ProviderError>>,
    delays: HashMap<String, Duration>,
    delays_by_end: HashMap<NaiveDate, Duration>,
}

impl StaticSource {
    pub fn with(mut self, ticker: &str, response: Result<Vec<TickerObservation>, ProviderError>) -> Self {
        self.responses.insert(ticker.to_string(), response);
        self
    }

    pub fn with_delay(
        mut self,
        ticker: &str,
        response: Result<Vec<TickerObservation>, ProviderError>,
        delay: Duration,
    ) -> Self {
        self.delays.insert(ticker.to_string(), delay);
        self.with(ticker, response)
    }

    /// Delay every request whose window ends on `end`
    pub fn with_delay_for_date(mut self, end: NaiveDate, delay: Duration) -> Self {
        self.delays_by_end.insert(end, delay);
        self
    }
}

impl ObservationSource for StaticSource {
    fn history(
        &self,
        ticker: &str,
        _start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<TickerObservation>, ProviderError>> + Send {
        let response = self
            .responses
            .get(ticker)
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::SymbolNotFound(ticker.to_string())));
        let delay = self
            .delays
            .get(ticker)
            .or_else(|| self.delays_by_end.get(&end))
            .copied();

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            response
        }
    }
}

/// Primitive draw commands captured by `RecordingSurface`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Scatter(Frame, Vec<ScatterPoint>),
    Bars(Frame, Vec<BarItem>),
    Treemap(Frame, Vec<TreemapCell>),
    Display(String),
}

/// A rendering surface that records every call instead of drawing
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub width: f64,
    pub height: f64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        RecordingSurface {
            calls: Vec::new(),
            width: 1400.0,
            height: 1000.0,
        }
    }
}

impl RenderingSurface for RecordingSurface {
    fn canvas_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn scatter(&mut self, frame: &Frame, points: &[ScatterPoint]) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Scatter(frame.clone(), points.to_vec()));
        Ok(())
    }

    fn bars(&mut self, frame: &Frame, bars: &[BarItem]) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Bars(frame.clone(), bars.to_vec()));
        Ok(())
    }

    fn treemap(&mut self, frame: &Frame, cells: &[TreemapCell]) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Treemap(frame.clone(), cells.to_vec()));
        Ok(())
    }

    fn display(&mut self, name: &str) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Display(name.to_string()));
        Ok(())
    }
}

/// A record with every percentage set to `value`
pub fn record(ticker: &str, value: f64, market_value: Option<f64>) -> MetricRecord {
    MetricRecord {
        ticker: ticker.to_string(),
        previous_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap_or_default(),
        latest_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap_or_default(),
        close: 100.0,
        price_variation_pct: value,
        range_pct: value,
        open_close_pct: value,
        volume_value: value * 1_000.0,
        market_value,
    }
}

pub fn snapshot_of(records: Vec<MetricRecord>) -> Snapshot {
    let mut snapshot = Snapshot::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap_or_default());
    for r in records {
        snapshot.insert(r);
    }
    snapshot
}
