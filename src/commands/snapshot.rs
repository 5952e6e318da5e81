use crate::models::{AggregateResult, ChartSpec, MetricRecord, Snapshot};
use crate::services::chart_service::{self, RenderingSurface};
use crate::utils::{format_large_number, format_percent, Table};

/// Tabular view of a snapshot, one row per ticker in snapshot order
pub fn snapshot_table(snapshot: &Snapshot) -> Table {
    let mut table = Table::new(vec![
        "Ticker",
        "Close",
        "Var",
        "Range",
        "Open/Close",
        "Volume*Price",
        "Market Value",
    ]);

    for record in snapshot.records() {
        table.add_row(table_row(record));
    }

    table
}

fn table_row(record: &MetricRecord) -> Vec<String> {
    vec![
        record.ticker.clone(),
        format_large_number((record.close * 100.0).round() / 100.0),
        format_percent(record.price_variation_pct),
        format_percent(record.range_pct),
        format_percent(record.open_close_pct),
        format_large_number(record.volume_value.round()),
        record
            .market_value
            .map(|v| format_large_number(v.round()))
            .unwrap_or_else(|| "-".to_string()),
    ]
}

/// Show a finished build: the snapshot table, then every selected chart.
///
/// Returns the text to print. An empty snapshot draws nothing.
pub fn present<S: RenderingSurface>(result: &AggregateResult, specs: &[ChartSpec], surface: &mut S) -> String {
    let snapshot = &result.snapshot;

    let outcomes = match chart_service::render_all(snapshot, specs, surface) {
        Ok(outcomes) => outcomes,
        Err(e) => return format!("❌ {}", e),
    };

    let mut output = format!(
        "📊 Snapshot for {} ({} tickers, {} skipped)\n",
        snapshot.reference_date,
        snapshot.len(),
        result.skipped.len()
    );
    output.push_str(&snapshot_table(snapshot).render());

    for (name, outcome) in outcomes {
        match outcome {
            Ok(()) => output.push_str(&format!("✅ {}\n", name)),
            Err(e) => output.push_str(&format!("⚠️ {}: {}\n", name, e)),
        }
    }

    output
}
