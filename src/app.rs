//! App Core for Cassandra Leaves.
//!
//! Owns the shared collection and every component that reads or writes it.
//! Consumers receive the store by reference; all writes are funneled through
//! the bulk fetcher and the mutation manager.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::managers::leaf_store::LeafStore;
use crate::managers::mutation_manager::MutationManager;
use crate::managers::view_manager::ViewState;
use crate::services::bulk_fetch::{BulkFetcher, FetchSummary};
use crate::services::detail_fetch::{self, DetailOutcome};
use crate::services::remote_client::{LeafTransport, XanoClient};
use crate::services::settings_engine::{apply_env_overrides, SettingsEngine, SettingsEngineTrait};
use crate::types::errors::LeafError;
use crate::types::leaf::Leaf;
use crate::types::settings::DashboardSettings;

/// How the collection got populated on startup.
#[derive(Debug)]
pub enum StartMode {
    /// The collection already held records; nothing was done.
    AlreadyLoaded,
    /// Seeded from a non-empty snapshot; no network walk.
    Snapshot(usize),
    /// A background bulk fetch was started.
    Fetching(JoinHandle<Result<FetchSummary, LeafError>>),
}

/// Clears the in-flight flag when the fetch task ends, however it ends.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Central application struct.
pub struct App {
    pub settings_engine: SettingsEngine,
    settings: DashboardSettings,
    transport: Arc<dyn LeafTransport>,
    store: Arc<LeafStore>,
    mutations: MutationManager,
    in_flight: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl App {
    /// Creates a new App from the settings file (platform default when
    /// `config_path` is `None`) and an HTTP client for the configured backend.
    pub fn new(config_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(config_path);
        let settings = apply_env_overrides(settings_engine.load()?);
        let transport: Arc<dyn LeafTransport> = Arc::new(XanoClient::new(&settings.api)?);
        tracing::debug!(base_url = %settings.api.base_url, "app initialized");
        Ok(Self::with_transport(settings_engine, settings, transport))
    }

    /// Creates an App over an arbitrary transport.
    pub fn with_transport(
        settings_engine: SettingsEngine,
        settings: DashboardSettings,
        transport: Arc<dyn LeafTransport>,
    ) -> Self {
        let store = Arc::new(LeafStore::new());
        let mutations = MutationManager::new(transport.clone(), store.clone());
        Self {
            settings_engine,
            settings,
            transport,
            store,
            mutations,
            in_flight: Arc::new(AtomicBool::new(false)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<LeafStore> {
        &self.store
    }

    pub fn mutations(&self) -> &MutationManager {
        &self.mutations
    }

    pub fn transport(&self) -> Arc<dyn LeafTransport> {
        self.transport.clone()
    }

    pub fn dark_mode(&self) -> bool {
        self.settings_engine.dark_mode()
    }

    /// Builds the listing view state for the given initial page.
    pub fn view_state(&self, initial_page: usize) -> ViewState {
        ViewState::new(initial_page, self.settings.view.page_size)
    }

    /// Populates the collection: does nothing when it already holds records,
    /// seeds it from a non-empty snapshot, or starts a background bulk fetch.
    pub fn start(&self, snapshot: Vec<Leaf>) -> Result<StartMode, LeafError> {
        if !self.store.is_empty() {
            return Ok(StartMode::AlreadyLoaded);
        }
        if !snapshot.is_empty() {
            let count = snapshot.len();
            self.store.replace_all(snapshot);
            tracing::info!(count, "collection seeded from snapshot");
            return Ok(StartMode::Snapshot(count));
        }
        self.start_bulk_fetch().map(StartMode::Fetching)
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Spawns the bulk fetch as a background task.
    ///
    /// Only one fetch may be in flight; a second call returns
    /// `AlreadyRunning`. The task stops early after [`App::shutdown`].
    pub fn start_bulk_fetch(&self) -> Result<JoinHandle<Result<FetchSummary, LeafError>>, LeafError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("bulk fetch requested while one is already running");
            return Err(LeafError::AlreadyRunning);
        }
        let guard = InFlightGuard(self.in_flight.clone());
        let fetcher = BulkFetcher::new(
            self.transport.clone(),
            self.store.clone(),
            self.settings.sync.clone(),
        );
        let cancel = self.shutdown.child_token();

        Ok(tokio::spawn(async move {
            let _guard = guard;
            fetcher.run(&cancel).await
        }))
    }

    /// Starts a bulk fetch and waits for it to finish.
    pub async fn fetch_all(&self) -> Result<FetchSummary, LeafError> {
        let handle = self.start_bulk_fetch()?;
        handle
            .await
            .map_err(|e| LeafError::Transport(format!("bulk fetch task failed: {}", e)))?
    }

    /// Loads a single record for the detail view.
    pub async fn load_detail(&self, id: u64) -> DetailOutcome {
        detail_fetch::load_detail(self.transport.as_ref(), id, &self.settings.detail).await
    }

    /// Cancels any running background fetch.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
