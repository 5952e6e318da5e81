//! Data models for the snapshot pipeline
//!
//! Observations come in from the provider, metric records and snapshots are
//! derived from them, and chart models describe what a renderer draws.

pub mod chart;
pub mod metric;
pub mod observation;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use chart::{BarItem, ChartKind, ChartSpec, Encoded, Frame, Rect, Rgb, ScatterPoint, TreemapCell};
pub use metric::{MetricField, MetricRecord};
pub use observation::{CompleteObservation, TickerObservation};
pub use snapshot::{AggregateResult, SkipReason, Snapshot};
