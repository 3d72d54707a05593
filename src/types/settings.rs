use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default backend base URL. The collection lives at `{base}/cassandra_leaves`.
pub const DEFAULT_API_BASE_URL: &str = "https://x8ki-letl-twmt.n7.xano.io/api:WVrFdUAc";

/// Top-level dashboard settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardSettings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub detail: DetailSettings,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pacing and retry policy of the bulk fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncSettings {
    /// Cooldown after every non-empty page.
    pub inter_page_delay_ms: u64,
    /// Retries of one page after HTTP 429, on top of the first attempt.
    pub max_rate_limit_retries: u32,
    /// First backoff delay; doubled after every rate-limited retry.
    pub initial_backoff_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            inter_page_delay_ms: 1000,
            max_rate_limit_retries: 5,
            initial_backoff_ms: 1000,
        }
    }
}

/// Retry policy of the single-record fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailSettings {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Linear backoff step: the wait before attempt `k + 1` is `k * step`.
    pub backoff_step_ms: u64,
}

impl Default for DetailSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step_ms: 2000,
        }
    }
}

/// Listing view settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewSettings {
    pub page_size: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self { page_size: 16 }
    }
}

/// Appearance preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppearanceSettings {
    #[serde(default)]
    pub dark_mode: bool,
}
