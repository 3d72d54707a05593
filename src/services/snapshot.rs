//! Collection snapshots.
//!
//! A snapshot is a JSON array of records captured ahead of time. When a
//! non-empty snapshot is available the dashboard starts from it and skips the
//! network walk entirely.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::managers::leaf_store::LeafStore;
use crate::services::bulk_fetch::BulkFetcher;
use crate::services::remote_client::LeafTransport;
use crate::types::errors::SnapshotError;
use crate::types::leaf::Leaf;
use crate::types::settings::SyncSettings;

/// Reads a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Vec<Leaf>, SnapshotError> {
    let content = fs::read_to_string(path)
        .map_err(|e| SnapshotError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content).map_err(|e| {
        SnapshotError::SerializationError(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Writes a snapshot file, creating parent directories as needed.
pub fn write_snapshot(path: &Path, leaves: &[Leaf]) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SnapshotError::IoError(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    let json = serde_json::to_string_pretty(leaves)
        .map_err(|e| SnapshotError::SerializationError(e.to_string()))?;
    fs::write(path, json)
        .map_err(|e| SnapshotError::IoError(format!("Failed to write {}: {}", path.display(), e)))
}

/// Fetches the whole collection without pacing or retries.
///
/// Any fetch failure yields an empty collection (logged), so a snapshot is
/// always produced.
pub async fn prefetch_all(transport: Arc<dyn LeafTransport>) -> Vec<Leaf> {
    let store = Arc::new(LeafStore::new());
    let policy = SyncSettings {
        inter_page_delay_ms: 0,
        max_rate_limit_retries: 0,
        initial_backoff_ms: 0,
    };
    let fetcher = BulkFetcher::new(transport, store.clone(), policy);
    match fetcher.run(&CancellationToken::new()).await {
        Ok(_) => store.snapshot().as_ref().clone(),
        Err(err) => {
            tracing::error!(error = %err, "snapshot prefetch failed; writing empty snapshot");
            Vec::new()
        }
    }
}

/// Prefetches the collection and writes it to `path`. Returns the record count.
pub async fn export_snapshot(
    transport: Arc<dyn LeafTransport>,
    path: &Path,
) -> Result<usize, SnapshotError> {
    let leaves = prefetch_all(transport).await;
    write_snapshot(path, &leaves)?;
    tracing::info!(count = leaves.len(), path = %path.display(), "snapshot written");
    Ok(leaves.len())
}
