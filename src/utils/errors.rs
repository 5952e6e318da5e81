use chrono::NaiveDate;
use thiserror::Error;

/// Reasons the metric extractor yields no record for a ticker
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("Insufficient history: {0} valid trading day(s), need 2")]
    InsufficientHistory(usize),
    #[error("Degenerate metric: {0} is zero")]
    DegenerateMetric(&'static str),
}

/// Renderer failures. Each is local to one chart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Nothing to display for chart '{0}'")]
    NothingToDisplay(String),
    #[error("Invalid chart spec '{0}': {1}")]
    InvalidSpec(String, String),
    #[error("Rendering surface error: {0}")]
    Surface(String),
}

/// Errors surfaced to the user of the date-selection control
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("No data for {0}, choose another date")]
    EmptySnapshot(NaiveDate),
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Date {0} is out of range ({1} to {2})")]
    DateOutOfRange(NaiveDate, NaiveDate, NaiveDate),
}

/// Malformed configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: '{1}'")]
    InvalidValue(&'static str, String),
    #[error("Unknown chart '{0}'")]
    UnknownChart(String),
}
