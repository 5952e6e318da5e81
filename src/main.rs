use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod universe;
mod utils;

use api::YahooClient;
use commands::Command;
use config::MarketConfig;
use services::plot_surface::PlottersSurface;
use services::selection_service::SnapshotCoordinator;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    for directive in ["merval_snapshot=debug", "reqwest=warn", "hyper=warn"] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting Merval snapshot...");

    let config = match MarketConfig::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    debug!(
        "Universe of {} tickers, lookback {} days, {} charts",
        config.universe.len(),
        config.lookback_days,
        config.charts.len()
    );

    utils::configure_provider_rate_limit(config.provider_rate_limit);

    let client = match YahooClient::new(config.fetch_timeout) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create market data client: {}", e);
            return;
        }
    };

    let mut coordinator = SnapshotCoordinator::new(Arc::clone(&config), Arc::new(client));
    let mut surface = PlottersSurface::new(config.output_dir.clone(), config.chart_width, config.chart_height);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", commands::help::help_text(&config.charts));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };

                let today = chrono::Local::now().date_naive();
                match commands::parse_command(&line, today) {
                    Ok(Command::Select(date)) => {
                        println!("⏳ Building snapshot for {}...", date);
                        coordinator.select(date);
                    }
                    Ok(Command::Help) => println!("{}", commands::help::help_text(&config.charts)),
                    Ok(Command::Quit) => return,
                    Ok(Command::Empty) => {}
                    Err(e) => println!("❌ {}", e),
                }
            }
            Some(result) = coordinator.next_snapshot() => {
                println!("{}", commands::snapshot::present(&result, &config.charts, &mut surface));
                debug!("{} chart file(s) written this session", surface.written().len());
            }
        }
    }

    // Input closed: finish the latest selection before exiting
    if coordinator.is_pending() {
        if let Some(result) = coordinator.next_snapshot().await {
            println!("{}", commands::snapshot::present(&result, &config.charts, &mut surface));
        }
    }

    info!("Goodbye ({} chart file(s) written)", surface.written().len());
}
