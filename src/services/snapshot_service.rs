use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::api::ObservationSource;
use crate::config::MarketConfig;
use crate::models::{AggregateResult, SkipReason, Snapshot, TickerObservation};
use crate::services::metric_service;
use crate::utils::ExtractError;

type FetchOutcome = Result<Vec<TickerObservation>, SkipReason>;

/// Build the snapshot for `reference_date` over the configured universe.
///
/// Histories are fetched concurrently (bounded by `fetch_concurrency`, each call
/// bounded by `fetch_timeout`) and joined before any extraction happens, so the
/// snapshot is filled in universe order regardless of completion order.
/// Per-ticker failures are recorded in `skipped`; an empty snapshot is a valid result.
pub async fn aggregate<S: ObservationSource>(
    config: &MarketConfig,
    source: Arc<S>,
    reference_date: NaiveDate,
) -> AggregateResult {
    let start = reference_date - Duration::days(config.lookback_days);
    let fetched = fetch_all(config, source, start, reference_date).await;

    let mut snapshot = Snapshot::new(reference_date);
    let mut skipped = Vec::new();

    for ((ticker, shares), outcome) in config.universe.iter().zip(fetched) {
        let mut rows = match outcome {
            Ok(rows) => rows,
            Err(reason) => {
                warn!("Skipping {}: {}", ticker, reason);
                skipped.push((ticker.clone(), reason));
                continue;
            }
        };

        // Providers may hand back rows outside the requested window
        rows.retain(|o| o.date >= start && o.date <= reference_date);
        rows.sort_by_key(|o| o.date);

        let record = match metric_service::extract(ticker, &rows, *shares) {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping {}: {}", ticker, e);
                let reason = match e {
                    ExtractError::InsufficientHistory(_) => SkipReason::InsufficientHistory,
                    ExtractError::DegenerateMetric(field) => SkipReason::DegenerateMetric(format!("{} is zero", field)),
                };
                skipped.push((ticker.clone(), reason));
                continue;
            }
        };

        if !record.is_finite() {
            debug!("Skipping {}: non-finite metric in {:?}", ticker, record);
            skipped.push((ticker.clone(), SkipReason::DegenerateMetric("non-finite value".to_string())));
            continue;
        }

        snapshot.insert(record);
    }

    if snapshot.is_empty() {
        warn!("Snapshot for {} is empty ({} tickers skipped)", reference_date, skipped.len());
    } else {
        info!(
            "Snapshot for {}: {} tickers, {} skipped",
            reference_date,
            snapshot.len(),
            skipped.len()
        );
    }

    AggregateResult { snapshot, skipped }
}

/// Fan out one provider call per ticker and join them, indexed by universe position
async fn fetch_all<S: ObservationSource>(
    config: &MarketConfig,
    source: Arc<S>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<FetchOutcome> {
    let semaphore = Arc::new(Semaphore::new(config.fetch_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, (ticker, _)) in config.universe.iter().enumerate() {
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        let ticker = ticker.clone();
        let timeout = config.fetch_timeout;

        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return (index, Err(SkipReason::Provider("fetch pool closed".to_string()))),
            };

            let outcome = match tokio::time::timeout(timeout, source.history(&ticker, start, end)).await {
                Ok(Ok(rows)) => Ok(rows),
                Ok(Err(e)) => Err(SkipReason::Provider(e.to_string())),
                Err(_) => Err(SkipReason::Timeout),
            };
            (index, outcome)
        });
    }

    let mut fetched: Vec<Option<FetchOutcome>> = (0..config.universe.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => fetched[index] = Some(outcome),
            Err(e) => warn!("Fetch task failed: {}", e),
        }
    }

    fetched
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(SkipReason::Provider("fetch task aborted".to_string()))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProviderError;
    use crate::services::test_support::{observation, StaticSource};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn config_for(tickers: &[(&str, Option<u64>)]) -> MarketConfig {
        MarketConfig {
            universe: tickers.iter().map(|(t, s)| (t.to_string(), *s)).collect(),
            fetch_timeout: std::time::Duration::from_millis(200),
            ..MarketConfig::default()
        }
    }

    fn two_days(prev_close: f64, close: f64) -> Vec<TickerObservation> {
        vec![observation(date(4), prev_close), observation(date(5), close)]
    }

    #[tokio::test]
    async fn test_zero_tickers_gives_empty_snapshot() {
        let result = aggregate(&config_for(&[]), Arc::new(StaticSource::default()), date(5)).await;
        assert!(result.snapshot.is_empty());
        assert!(result.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_partial_failures_are_skipped() {
        let source = StaticSource::default()
            .with("GGAL.BA", Ok(two_days(100.0, 110.0)))
            .with("YPFD.BA", Err(ProviderError::HttpError(500, "boom".to_string())))
            .with("ALUA.BA", Ok(vec![observation(date(5), 10.0)]))
            .with("BMA.BA", Ok(two_days(0.0, 10.0)));
        let config = config_for(&[
            ("GGAL.BA", Some(10)),
            ("YPFD.BA", Some(10)),
            ("ALUA.BA", Some(10)),
            ("BMA.BA", Some(10)),
        ]);

        let result = aggregate(&config, Arc::new(source), date(5)).await;

        assert_eq!(result.snapshot.len(), 1);
        let record = result.snapshot.get("GGAL.BA").unwrap();
        assert!((record.price_variation_pct - 10.0).abs() < 1e-9);
        assert_eq!(record.market_value, Some(1_100.0));

        let skipped: Vec<&str> = result.skipped.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(skipped, vec!["YPFD.BA", "ALUA.BA", "BMA.BA"]);
        assert_eq!(result.skipped[1].1, SkipReason::InsufficientHistory);
    }

    #[tokio::test]
    async fn test_timed_out_ticker_is_dropped() {
        let source = StaticSource::default()
            .with("GGAL.BA", Ok(two_days(100.0, 101.0)))
            .with_delay("YPFD.BA", Ok(two_days(100.0, 101.0)), std::time::Duration::from_secs(5));
        let config = config_for(&[("GGAL.BA", None), ("YPFD.BA", None)]);

        let result = aggregate(&config, Arc::new(source), date(5)).await;

        assert_eq!(result.snapshot.len(), 1);
        assert_eq!(result.skipped, vec![("YPFD.BA".to_string(), SkipReason::Timeout)]);
    }

    #[tokio::test]
    async fn test_rows_after_reference_date_are_ignored() {
        let mut rows = two_days(100.0, 110.0);
        rows.push(observation(date(6), 1_000.0));
        let source = StaticSource::default().with("GGAL.BA", Ok(rows));

        let result = aggregate(&config_for(&[("GGAL.BA", None)]), Arc::new(source), date(5)).await;
        let record = result.snapshot.get("GGAL.BA").unwrap();
        assert_eq!(record.latest_date, date(5));
        assert_eq!(record.market_value, None);
    }

    #[tokio::test]
    async fn test_non_finite_metrics_are_skipped() {
        let source = StaticSource::default()
            .with("INF.BA", Ok(two_days(100.0, f64::INFINITY)))
            .with("BIG.BA", Ok(two_days(1e300, 1e300)))
            .with("GGAL.BA", Ok(two_days(100.0, 101.0)));
        let config = config_for(&[("INF.BA", None), ("BIG.BA", Some(u64::MAX)), ("GGAL.BA", Some(10))]);

        let result = aggregate(&config, Arc::new(source), date(5)).await;

        let tickers: Vec<&str> = result.snapshot.records().iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["GGAL.BA"]);
        assert!(result.snapshot.records().iter().all(|r| r.is_finite()));

        let non_finite = SkipReason::DegenerateMetric("non-finite value".to_string());
        assert_eq!(
            result.skipped,
            vec![
                ("INF.BA".to_string(), non_finite.clone()),
                ("BIG.BA".to_string(), non_finite),
            ]
        );
    }

    #[tokio::test]
    async fn test_insertion_follows_universe_order() {
        // The first ticker answers last
        let source = StaticSource::default()
            .with_delay("YPFD.BA", Ok(two_days(10.0, 11.0)), std::time::Duration::from_millis(50))
            .with("ALUA.BA", Ok(two_days(10.0, 12.0)))
            .with("GGAL.BA", Ok(two_days(10.0, 13.0)));
        let config = config_for(&[("YPFD.BA", None), ("ALUA.BA", None), ("GGAL.BA", None)]);

        let result = aggregate(&config, Arc::new(source), date(5)).await;
        let order: Vec<&str> = result.snapshot.records().iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["YPFD.BA", "ALUA.BA", "GGAL.BA"]);
    }

    #[tokio::test]
    async fn test_aggregation_is_deterministic() {
        let source = Arc::new(
            StaticSource::default()
                .with("GGAL.BA", Ok(two_days(100.0, 97.3)))
                .with("YPFD.BA", Ok(two_days(21.7, 22.9)))
                .with("BMA.BA", Ok(two_days(5.5, 5.5))),
        );
        let config = MarketConfig {
            fetch_concurrency: 2,
            ..config_for(&[("GGAL.BA", Some(7)), ("YPFD.BA", None), ("BMA.BA", Some(3))])
        };

        let first = aggregate(&config, Arc::clone(&source), date(5)).await;
        let second = aggregate(&config, source, date(5)).await;

        assert_eq!(first.snapshot, second.snapshot);
        assert_eq!(
            serde_json::to_string(&first.snapshot).unwrap(),
            serde_json::to_string(&second.snapshot).unwrap()
        );
    }
}
