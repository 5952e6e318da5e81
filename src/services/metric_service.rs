use crate::models::{CompleteObservation, MetricRecord, TickerObservation};
use crate::utils::ExtractError;

/// Derive the metric record for one ticker from its chronological observations.
///
/// Rows with any null OHLCV field are dropped first; the last two remaining rows
/// are used as (previous, latest) whatever the calendar gap between them.
/// Price variation is relative to the previous close; the intraday range and
/// the open/close spread are relative to the latest low and open.
pub fn extract(
    ticker: &str,
    observations: &[TickerObservation],
    shares: Option<u64>,
) -> Result<MetricRecord, ExtractError> {
    let valid: Vec<CompleteObservation> = observations.iter().filter_map(|o| o.complete()).collect();

    let (previous, latest) = match valid.as_slice() {
        [.., previous, latest] => (*previous, *latest),
        _ => return Err(ExtractError::InsufficientHistory(valid.len())),
    };

    if previous.close == 0.0 {
        return Err(ExtractError::DegenerateMetric("previous close"));
    }
    if latest.low == 0.0 {
        return Err(ExtractError::DegenerateMetric("latest low"));
    }
    if latest.open == 0.0 {
        return Err(ExtractError::DegenerateMetric("latest open"));
    }

    Ok(MetricRecord {
        ticker: ticker.to_string(),
        previous_date: previous.date,
        latest_date: latest.date,
        close: latest.close,
        price_variation_pct: (latest.close - previous.close) / previous.close * 100.0,
        range_pct: (latest.high - latest.low) / latest.low * 100.0,
        open_close_pct: (latest.close - latest.open) / latest.open * 100.0,
        volume_value: latest.volume as f64 * latest.close,
        market_value: shares.map(|s| latest.close * s as f64),
    })
}
