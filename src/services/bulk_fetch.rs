//! Bulk Fetch Orchestrator.
//!
//! Walks the backend collection page by page until an empty page comes back,
//! publishing every non-empty page into the shared [`LeafStore`] as it
//! arrives. Rate-limited pages are retried with exponential backoff; any other
//! failure aborts the walk. Records published before a failure stay in the
//! store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::managers::leaf_store::LeafStore;
use crate::services::remote_client::LeafTransport;
use crate::types::errors::LeafError;
use crate::types::leaf::Leaf;
use crate::types::settings::SyncSettings;

/// What one bulk fetch run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchSummary {
    /// Non-empty pages appended to the store.
    pub pages: u32,
    /// HTTP requests issued, retries and the terminating empty page included.
    pub requests: u32,
    /// Records added to the store.
    pub records: usize,
    /// Total time spent waiting after HTTP 429 responses.
    pub backoff: Duration,
}

/// Drives the paged walk of the remote collection.
pub struct BulkFetcher {
    transport: Arc<dyn LeafTransport>,
    store: Arc<LeafStore>,
    policy: SyncSettings,
}

impl BulkFetcher {
    pub fn new(transport: Arc<dyn LeafTransport>, store: Arc<LeafStore>, policy: SyncSettings) -> Self {
        Self {
            transport,
            store,
            policy,
        }
    }

    /// Fetches every page into the store.
    ///
    /// The page cache lives only for the duration of this call. `cancel` is
    /// checked before every request, before every publish, and while waiting.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<FetchSummary, LeafError> {
        let mut cache: HashMap<u32, Vec<Leaf>> = HashMap::new();
        let mut summary = FetchSummary::default();
        let mut page_number = 1u32;

        let result = loop {
            if cancel.is_cancelled() {
                break Err(LeafError::Cancelled);
            }

            let items = match self.fetch_page(page_number, &mut cache, cancel, &mut summary).await {
                Ok(items) => items,
                Err(err) => break Err(err),
            };

            if items.is_empty() {
                break Ok(());
            }

            if cancel.is_cancelled() {
                break Err(LeafError::Cancelled);
            }
            summary.records += self.store.append(items);
            summary.pages += 1;
            tracing::info!(
                page_number,
                total = self.store.len(),
                "published page to collection"
            );

            let cooldown = Duration::from_millis(self.policy.inter_page_delay_ms);
            if let Err(err) = pause(cooldown, cancel).await {
                break Err(err);
            }
            page_number += 1;
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    pages = summary.pages,
                    records = summary.records,
                    "bulk fetch complete"
                );
                Ok(summary)
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    kept = self.store.len(),
                    "bulk fetch aborted; keeping records fetched so far"
                );
                Err(err)
            }
        }
    }

    /// Requests one page, retrying on HTTP 429 with a doubling delay.
    async fn fetch_page(
        &self,
        page_number: u32,
        cache: &mut HashMap<u32, Vec<Leaf>>,
        cancel: &CancellationToken,
        summary: &mut FetchSummary,
    ) -> Result<Vec<Leaf>, LeafError> {
        if let Some(items) = cache.get(&page_number) {
            return Ok(items.clone());
        }

        let mut delay = Duration::from_millis(self.policy.initial_backoff_ms);
        let mut retries_left = self.policy.max_rate_limit_retries;

        loop {
            if cancel.is_cancelled() {
                return Err(LeafError::Cancelled);
            }
            summary.requests += 1;

            let outcome = tokio::select! {
                _ = cancel.cancelled() => return Err(LeafError::Cancelled),
                outcome = self.transport.fetch_page(page_number) => outcome,
            };

            match outcome {
                Ok(items) => {
                    cache.insert(page_number, items.clone());
                    return Ok(items);
                }
                Err(err) if err.is_retryable() && retries_left > 0 => {
                    tracing::warn!(
                        page_number,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "rate limit exceeded, retrying"
                    );
                    pause(delay, cancel).await?;
                    summary.backoff = summary.backoff.saturating_add(delay);
                    delay = next_backoff(delay);
                    retries_left -= 1;
                }
                Err(err) => {
                    tracing::error!(page_number, error = %err, "failed to fetch page");
                    return Err(err);
                }
            }
        }
    }
}

/// Doubles a backoff delay, saturating instead of overflowing.
fn next_backoff(delay: Duration) -> Duration {
    delay.saturating_mul(2)
}

/// Sleeps unless cancelled first.
async fn pause(duration: Duration, cancel: &CancellationToken) -> Result<(), LeafError> {
    if duration.is_zero() {
        return Ok(());
    }
    tokio::select! {
        _ = cancel.cancelled() => Err(LeafError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
