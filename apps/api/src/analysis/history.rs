use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::analysis::store::AnalysisStore;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRecord;

/// Number of runs shown in the history listing.
pub const HISTORY_LIMIT: i64 = 20;

#[derive(Default)]
struct Snapshot {
    generation: u64,
    records: Option<Vec<AnalysisRecord>>,
}

/// In-process snapshot of the most recent analyses.
///
/// Listings always read through to the store; the snapshot is warmed after
/// each write and replaced wholesale. Every refresh takes a generation number
/// before it reads, and a refresh that finishes after a newer one is dropped,
/// so a slow read never overwrites a fresher list.
#[derive(Clone, Default)]
pub struct HistoryCache {
    inner: Arc<RwLock<Snapshot>>,
    next_generation: Arc<AtomicU64>,
}

impl HistoryCache {
    /// The most recent records, newest first, read from the store.
    pub async fn recent(&self, store: &dyn AnalysisStore) -> Result<Vec<AnalysisRecord>, AppError> {
        self.refresh(store).await
    }

    pub async fn refresh(&self, store: &dyn AnalysisStore) -> Result<Vec<AnalysisRecord>, AppError> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let records = store.list_recent(HISTORY_LIMIT).await?;

        let mut snapshot = self.inner.write().await;
        if generation > snapshot.generation {
            snapshot.generation = generation;
            snapshot.records = Some(records.clone());
            debug!(
                "History snapshot {generation} holds {} records",
                records.len()
            );
        } else {
            debug!(
                "Dropping history snapshot {generation}; {} is newer",
                snapshot.generation
            );
        }
        Ok(records)
    }

    /// Last snapshot written, if any refresh has completed.
    pub async fn snapshot(&self) -> Option<Vec<AnalysisRecord>> {
        self.inner.read().await.records.clone()
    }

    /// Fire-and-forget refresh. Failures are logged and dropped.
    pub fn spawn_refresh(&self, store: Arc<dyn AnalysisStore>) {
        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.refresh(store.as_ref()).await {
                warn!("Background history refresh failed: {e}");
            }
        });
    }
}
