//! Unit tests for the Bulk Fetch Orchestrator.
//!
//! Uses a scripted transport and tokio's paused clock, so backoff and pacing
//! delays are measured exactly without real waiting.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use cassandra_leaves::managers::leaf_store::LeafStore;
use cassandra_leaves::services::bulk_fetch::BulkFetcher;
use cassandra_leaves::types::errors::LeafError;
use cassandra_leaves::types::settings::SyncSettings;

use common::{leaves, ScriptedTransport};

fn fetcher(transport: Arc<ScriptedTransport>, store: Arc<LeafStore>) -> BulkFetcher {
    BulkFetcher::new(transport, store, SyncSettings::default())
}

/// Pages of 8, 3, then empty: 11 records, 3 requests, normal termination.
#[tokio::test(start_paused = true)]
async fn test_accumulates_until_empty_page() {
    let transport = Arc::new(ScriptedTransport::with_pages(vec![
        Ok(leaves(1, 8)),
        Ok(leaves(9, 3)),
        Ok(Vec::new()),
    ]));
    let store = Arc::new(LeafStore::new());

    let summary = fetcher(transport.clone(), store.clone())
        .run(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(store.len(), 11);
    assert_eq!(summary.records, 11);
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.requests, 3);
    assert_eq!(transport.page_requests(), vec![1, 2, 3]);
    assert_eq!(store.ids(), (1..=11).collect::<Vec<u64>>());
}

/// Three 429s then success: the page succeeds after 1s + 2s + 4s of backoff.
#[tokio::test(start_paused = true)]
async fn test_rate_limited_page_retries_with_doubling_backoff() {
    let transport = Arc::new(ScriptedTransport::with_pages(vec![
        Err(LeafError::RateLimited),
        Err(LeafError::RateLimited),
        Err(LeafError::RateLimited),
        Ok(leaves(1, 4)),
        Ok(Vec::new()),
    ]));
    let store = Arc::new(LeafStore::new());
    let started = Instant::now();

    let summary = fetcher(transport.clone(), store.clone())
        .run(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.backoff, Duration::from_millis(1000 + 2000 + 4000));
    assert_eq!(transport.page_requests(), vec![1, 1, 1, 1, 2]);
    assert_eq!(store.len(), 4);
    // backoff plus one inter-page cooldown
    assert_eq!(started.elapsed(), Duration::from_millis(7000 + 1000));
}

/// After the retry budget is spent the fetch aborts and keeps earlier pages.
#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_abort_and_keep_partial_results() {
    let mut script = vec![Ok(leaves(1, 5))];
    script.extend((0..6).map(|_| Err(LeafError::RateLimited)));
    let transport = Arc::new(ScriptedTransport::with_pages(script));
    let store = Arc::new(LeafStore::new());

    let result = fetcher(transport.clone(), store.clone())
        .run(&CancellationToken::new())
        .await;

    assert_eq!(result, Err(LeafError::RateLimited));
    assert_eq!(store.len(), 5);
    // one request for page 1, then the first attempt plus five retries of page 2
    assert_eq!(transport.page_requests().len(), 1 + 6);
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_aborts_without_retry() {
    let transport = Arc::new(ScriptedTransport::with_pages(vec![
        Ok(leaves(1, 2)),
        Err(LeafError::Transport("connection reset".to_string())),
        Ok(leaves(3, 2)),
    ]));
    let store = Arc::new(LeafStore::new());
    let started = Instant::now();

    let result = fetcher(transport.clone(), store.clone())
        .run(&CancellationToken::new())
        .await;

    assert!(matches!(result, Err(LeafError::Transport(_))));
    assert_eq!(transport.page_requests(), vec![1, 2]);
    assert_eq!(store.ids(), vec![1, 2]);
    assert_eq!(started.elapsed(), Duration::from_millis(1000));
}

/// Every non-empty page is followed by a fixed 1s cooldown.
#[tokio::test(start_paused = true)]
async fn test_inter_page_delay_is_applied_per_page() {
    let transport = Arc::new(ScriptedTransport::with_pages(vec![
        Ok(leaves(1, 1)),
        Ok(leaves(2, 1)),
        Ok(leaves(3, 1)),
    ]));
    let store = Arc::new(LeafStore::new());
    let started = Instant::now();

    fetcher(transport, store)
        .run(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_token_stops_before_first_request() {
    let transport = Arc::new(ScriptedTransport::with_pages(vec![Ok(leaves(1, 3))]));
    let store = Arc::new(LeafStore::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = fetcher(transport.clone(), store.clone()).run(&cancel).await;

    assert_eq!(result, Err(LeafError::Cancelled));
    assert!(transport.page_requests().is_empty());
    assert!(store.is_empty());
}

/// Cancelling during the cooldown stops the walk before the next request.
#[tokio::test(start_paused = true)]
async fn test_cancel_during_cooldown_stops_walk() {
    let transport = Arc::new(ScriptedTransport::with_pages(vec![
        Ok(leaves(1, 2)),
        Ok(leaves(3, 2)),
    ]));
    let store = Arc::new(LeafStore::new());
    let cancel = CancellationToken::new();

    let task = {
        let fetcher = fetcher(transport.clone(), store.clone());
        let cancel = cancel.clone();
        tokio::spawn(async move { fetcher.run(&cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(500)).await;
    cancel.cancel();
    let result = task.await.unwrap();

    assert_eq!(result, Err(LeafError::Cancelled));
    assert_eq!(transport.page_requests(), vec![1]);
    assert_eq!(store.ids(), vec![1, 2]);
}

/// Subscribers see the collection grow page by page while the fetch runs.
#[tokio::test(start_paused = true)]
async fn test_partial_results_are_published_while_fetching() {
    let transport = Arc::new(ScriptedTransport::with_pages(vec![
        Ok(leaves(1, 3)),
        Ok(leaves(4, 3)),
    ]));
    let store = Arc::new(LeafStore::new());
    let mut updates = store.subscribe();

    let task = {
        let fetcher = fetcher(transport, store.clone());
        tokio::spawn(async move { fetcher.run(&CancellationToken::new()).await })
    };

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().len(), 3);
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().len(), 6);

    task.await.unwrap().unwrap();
}

/// Each run starts from page 1 with a fresh page cache.
#[tokio::test(start_paused = true)]
async fn test_page_cache_does_not_survive_between_runs() {
    let transport = Arc::new(ScriptedTransport::with_pages(vec![
        Ok(leaves(1, 2)),
        Ok(Vec::new()),
        Ok(leaves(1, 2)),
        Ok(Vec::new()),
    ]));
    let store = Arc::new(LeafStore::new());
    let fetcher = fetcher(transport.clone(), store.clone());

    fetcher.run(&CancellationToken::new()).await.unwrap();
    fetcher.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(transport.page_requests(), vec![1, 2, 1, 2]);
    assert_eq!(store.len(), 2);
}
