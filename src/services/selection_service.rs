use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::ObservationSource;
use crate::config::MarketConfig;
use crate::models::AggregateResult;
use crate::services::snapshot_service;

/// A finished build tagged with the selection it belongs to
struct Completed {
    generation: u64,
    result: AggregateResult,
}

/// Runs one snapshot build per selected reference date, last selection wins.
///
/// Selecting a new date aborts the build in flight; a result whose selection
/// has been superseded is never handed out.
pub struct SnapshotCoordinator<S: ObservationSource> {
    config: Arc<MarketConfig>,
    source: Arc<S>,
    generation: Arc<AtomicU64>,
    inflight: Option<JoinHandle<()>>,
    pending: bool,
    tx: mpsc::UnboundedSender<Completed>,
    rx: mpsc::UnboundedReceiver<Completed>,
}

impl<S: ObservationSource> SnapshotCoordinator<S> {
    pub fn new(config: Arc<MarketConfig>, source: Arc<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        SnapshotCoordinator {
            config,
            source,
            generation: Arc::new(AtomicU64::new(0)),
            inflight: None,
            pending: false,
            tx,
            rx,
        }
    }

    /// Start a build for `reference_date`, abandoning any build in flight
    pub fn select(&mut self, reference_date: NaiveDate) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(handle) = self.inflight.take() {
            if !handle.is_finished() {
                debug!("Abandoning in-flight snapshot build");
            }
            handle.abort();
        }

        let config = Arc::clone(&self.config);
        let source = Arc::clone(&self.source);
        let current = Arc::clone(&self.generation);
        let tx = self.tx.clone();

        debug!("Building snapshot for {} (selection #{})", reference_date, generation);
        self.inflight = Some(tokio::spawn(async move {
            let result = snapshot_service::aggregate(&config, source, reference_date).await;
            if current.load(Ordering::SeqCst) == generation {
                let _ = tx.send(Completed { generation, result });
            }
        }));
        self.pending = true;
    }

    /// Whether the latest selection has not been delivered yet
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Wait for the snapshot of the latest selection, dropping stale ones.
    ///
    /// Cancel-safe, so it can sit in a `tokio::select!` next to the input reader.
    pub async fn next_snapshot(&mut self) -> Option<AggregateResult> {
        while let Some(done) = self.rx.recv().await {
            if done.generation == self.generation.load(Ordering::SeqCst) {
                self.pending = false;
                return Some(done.result);
            }
            debug!(
                "Discarding stale snapshot for {}",
                done.result.snapshot.reference_date
            );
        }
        None
    }
}
