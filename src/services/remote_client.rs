//! Remote Collection Client.
//!
//! Thin REST client for the hosted `cassandra_leaves` collection. It performs
//! exactly one HTTP call per operation and classifies failures as
//! `RateLimited` (HTTP 429) or `Transport` (everything else); retry policy
//! belongs to the callers.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::types::errors::LeafError;
use crate::types::leaf::{Leaf, LeafFields};
use crate::types::settings::ApiSettings;

const COLLECTION: &str = "cassandra_leaves";

/// Operations the backend exposes for the leaves collection.
#[async_trait]
pub trait LeafTransport: Send + Sync {
    /// Fetches one 1-based page. An empty page marks the end of the collection.
    async fn fetch_page(&self, page_number: u32) -> Result<Vec<Leaf>, LeafError>;

    /// Fetches a single record by identifier.
    async fn fetch_leaf(&self, id: u64) -> Result<Leaf, LeafError>;

    /// Creates a record; the backend assigns the identifier.
    async fn create_leaf(&self, fields: &LeafFields) -> Result<Leaf, LeafError>;

    /// Patches an existing record.
    async fn update_leaf(&self, id: u64, fields: &LeafFields) -> Result<(), LeafError>;

    /// Deletes a record.
    async fn delete_leaf(&self, id: u64) -> Result<(), LeafError>;
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    items: Vec<Leaf>,
}

/// HTTP implementation of [`LeafTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct XanoClient {
    http: Client,
    collection_url: String,
}

impl XanoClient {
    /// Builds a client for the given settings. The request timeout applies to
    /// every call.
    pub fn new(settings: &ApiSettings) -> Result<Self, LeafError> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| LeafError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_http(http, &settings.base_url))
    }

    /// Wraps an already configured `reqwest` client.
    pub fn with_http(http: Client, base_url: &str) -> Self {
        Self {
            http,
            collection_url: collection_url(base_url),
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn leaf_url(&self, id: u64) -> String {
        format!("{}/{}", self.collection_url, id)
    }
}

/// Joins the base URL and the collection path, tolerating a trailing slash.
pub fn collection_url(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), COLLECTION)
}

/// Maps a response status onto the failure taxonomy.
fn check_status(response: Response, context: &str) -> Result<Response, LeafError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::debug!(%status, context, "backend rejected request");
        Err(LeafError::from_status(status.as_u16(), context))
    }
}

#[async_trait]
impl LeafTransport for XanoClient {
    async fn fetch_page(&self, page_number: u32) -> Result<Vec<Leaf>, LeafError> {
        let response = self
            .http
            .get(&self.collection_url)
            .query(&[("page_number", page_number), ("offset", 0)])
            .send()
            .await?;
        let response = check_status(response, "page fetch")?;
        let page: PageResponse = response.json().await?;
        tracing::debug!(page_number, count = page.items.len(), "fetched page");
        Ok(page.items)
    }

    async fn fetch_leaf(&self, id: u64) -> Result<Leaf, LeafError> {
        let response = self.http.get(self.leaf_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(LeafError::NotFound(id));
        }
        let response = check_status(response, "record fetch")?;
        Ok(response.json().await?)
    }

    async fn create_leaf(&self, fields: &LeafFields) -> Result<Leaf, LeafError> {
        let response = self
            .http
            .post(&self.collection_url)
            .json(fields)
            .send()
            .await?;
        let response = check_status(response, "create")?;
        Ok(response.json().await?)
    }

    async fn update_leaf(&self, id: u64, fields: &LeafFields) -> Result<(), LeafError> {
        let response = self.http.patch(self.leaf_url(id)).json(fields).send().await?;
        check_status(response, "update")?;
        Ok(())
    }

    async fn delete_leaf(&self, id: u64) -> Result<(), LeafError> {
        let response = self.http.delete(self.leaf_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(LeafError::NotFound(id));
        }
        check_status(response, "delete")?;
        Ok(())
    }
}
