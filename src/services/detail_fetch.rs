//! Single-record fetch for the detail view.
//!
//! Retries rate-limited requests with a linear backoff (`step × attempt`) and
//! keeps the "rate limit exceeded" outcome distinct from not-found and other
//! failures.

use std::time::Duration;

use crate::services::remote_client::LeafTransport;
use crate::types::errors::LeafError;
use crate::types::leaf::Leaf;
use crate::types::settings::DetailSettings;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load the record. Please try again.";

/// Result of loading one record for display.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Loaded(Leaf),
    NotFound(u64),
    RateLimited,
    Failed(String),
}

impl DetailOutcome {
    /// The message shown in place of the record, if any.
    pub fn user_message(&self) -> Option<String> {
        match self {
            DetailOutcome::Loaded(_) => None,
            DetailOutcome::NotFound(id) => {
                Some(format!("The record with ID {} does not exist.", id))
            }
            DetailOutcome::RateLimited => Some(RATE_LIMIT_MESSAGE.to_string()),
            DetailOutcome::Failed(_) => Some(LOAD_FAILED_MESSAGE.to_string()),
        }
    }
}

/// Fetches one record, retrying on HTTP 429.
pub async fn fetch_leaf(
    transport: &dyn LeafTransport,
    id: u64,
    policy: &DetailSettings,
) -> Result<Leaf, LeafError> {
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        match transport.fetch_leaf(id).await {
            Ok(leaf) => return Ok(leaf),
            Err(LeafError::RateLimited) => {
                if attempt == attempts {
                    break;
                }
                let wait = Duration::from_millis(policy.backoff_step_ms * attempt as u64);
                tracing::warn!(id, attempt, wait_ms = wait.as_millis() as u64, "record fetch rate limited");
                tokio::time::sleep(wait).await;
            }
            Err(err) => {
                tracing::error!(id, error = %err, "error fetching record");
                return Err(err);
            }
        }
    }
    Err(LeafError::RateLimited)
}

/// Loads a record and folds the failure kind into a [`DetailOutcome`].
pub async fn load_detail(
    transport: &dyn LeafTransport,
    id: u64,
    policy: &DetailSettings,
) -> DetailOutcome {
    match fetch_leaf(transport, id, policy).await {
        Ok(leaf) => DetailOutcome::Loaded(leaf),
        Err(LeafError::NotFound(id)) => DetailOutcome::NotFound(id),
        Err(LeafError::RateLimited) => DetailOutcome::RateLimited,
        Err(err) => DetailOutcome::Failed(err.to_string()),
    }
}
