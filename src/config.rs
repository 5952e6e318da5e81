use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::models::ChartSpec;
use crate::universe::MERVAL_UNIVERSE;
use crate::utils::ConfigError;

const DEFAULT_LOOKBACK_DAYS: i64 = 15;
const MIN_LOOKBACK_DAYS: i64 = 10;
const MAX_LOOKBACK_DAYS: i64 = 30;

/// Immutable process configuration, built once at startup and shared by `Arc`.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Tickers in display order with their shares outstanding
    pub universe: Vec<(String, Option<u64>)>,
    /// Calendar days of history requested before the reference date
    pub lookback_days: i64,
    pub fetch_timeout: Duration,
    pub fetch_concurrency: usize,
    pub provider_rate_limit: usize,
    pub output_dir: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    pub charts: Vec<ChartSpec>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            universe: MERVAL_UNIVERSE
                .iter()
                .map(|(ticker, shares)| (ticker.to_string(), *shares))
                .collect(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            fetch_timeout: Duration::from_secs(10),
            fetch_concurrency: 6,
            provider_rate_limit: 10,
            output_dir: PathBuf::from("charts"),
            chart_width: 1400,
            chart_height: 1000,
            charts: ChartSpec::catalogue(),
        }
    }
}

impl MarketConfig {
    /// Build the configuration from environment variables (after `.env` is loaded)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = MarketConfig::default();

        if let Some(days) = parse_var::<i64, _>(&lookup, "LOOKBACK_DAYS")? {
            config.lookback_days = days.clamp(MIN_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "FETCH_CONCURRENCY")? {
            config.fetch_concurrency = n.max(1);
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "PROVIDER_RATE_LIMIT")? {
            config.provider_rate_limit = n.max(1);
        }
        if let Some(dir) = lookup("CHART_OUTPUT_DIR").filter(|d| !d.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(w) = parse_var::<u32, _>(&lookup, "CHART_WIDTH")? {
            config.chart_width = w;
        }
        if let Some(h) = parse_var::<u32, _>(&lookup, "CHART_HEIGHT")? {
            config.chart_height = h;
        }
        if let Some(names) = lookup("CHARTS") {
            config.charts = select_charts(&names)?;
        }

        Ok(config)
    }

    #[cfg(test)]
    pub fn shares_for(&self, ticker: &str) -> Option<u64> {
        self.universe
            .iter()
            .find(|(t, _)| t == ticker)
            .and_then(|(_, shares)| *shares)
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        _ => Ok(None),
    }
}

/// Pick chart specs from the catalogue by comma-separated name. "all" or an
/// empty list selects the whole catalogue.
pub fn select_charts(names: &str) -> Result<Vec<ChartSpec>, ConfigError> {
    let catalogue = ChartSpec::catalogue();
    let wanted: Vec<&str> = names
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();

    if wanted.is_empty() || wanted.iter().any(|n| n.eq_ignore_ascii_case("all")) {
        return Ok(catalogue);
    }

    wanted
        .into_iter()
        .map(|name| {
            catalogue
                .iter()
                .find(|spec| spec.name.eq_ignore_ascii_case(name))
                .cloned()
                .ok_or_else(|| ConfigError::UnknownChart(name.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MarketConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.lookback_days, 15);
        assert_eq!(config.charts.len(), ChartSpec::catalogue().len());
        assert_eq!(config.shares_for("^MERV"), None);
        assert!(config.shares_for("GGAL.BA").is_some());
    }

    #[test]
    fn test_overrides_and_clamping() {
        let config = MarketConfig::from_lookup(lookup_from(&[
            ("LOOKBACK_DAYS", "90"),
            ("FETCH_CONCURRENCY", "0"),
            ("CHART_OUTPUT_DIR", "out"),
            ("CHARTS", "bar_variation, treemap_market_value"),
        ]))
        .unwrap();

        assert_eq!(config.lookback_days, 30);
        assert_eq!(config.fetch_concurrency, 1);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        let names: Vec<&str> = config.charts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["bar_variation", "treemap_market_value"]);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = MarketConfig::from_lookup(lookup_from(&[("FETCH_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue("FETCH_TIMEOUT_SECS", "soon".to_string()));

        let err = select_charts("pie").unwrap_err();
        assert_eq!(err, ConfigError::UnknownChart("pie".to_string()));
    }
}
