//! Record Mutation Client.
//!
//! Create, update and delete go to the backend first; the shared collection
//! is reconciled only after the backend confirms. A failed call leaves the
//! collection untouched, so nothing needs rolling back.

use std::sync::Arc;

use crate::managers::leaf_store::LeafStore;
use crate::services::remote_client::LeafTransport;
use crate::types::errors::LeafError;
use crate::types::leaf::{Leaf, LeafFields};

/// Trait defining record mutation operations.
#[async_trait::async_trait]
pub trait MutationManagerTrait {
    async fn create(&self, fields: LeafFields) -> Result<Leaf, LeafError>;
    async fn update(&self, id: u64, fields: LeafFields) -> Result<Leaf, LeafError>;
    async fn delete(&self, id: u64) -> Result<(), LeafError>;
}

/// Mutation client writing through the shared [`LeafStore`].
pub struct MutationManager {
    transport: Arc<dyn LeafTransport>,
    store: Arc<LeafStore>,
}

impl MutationManager {
    pub fn new(transport: Arc<dyn LeafTransport>, store: Arc<LeafStore>) -> Self {
        Self { transport, store }
    }
}

#[async_trait::async_trait]
impl MutationManagerTrait for MutationManager {
    /// Validates, creates on the backend, then prepends the returned record.
    async fn create(&self, fields: LeafFields) -> Result<Leaf, LeafError> {
        fields.validate()?;
        let created = self.transport.create_leaf(&fields).await.map_err(|e| {
            tracing::error!(error = %e, "error adding record");
            e
        })?;
        tracing::info!(id = created.id, "record added");
        self.store.prepend(created.clone());
        Ok(created)
    }

    /// Patches the backend, then replaces the record in place.
    ///
    /// When the record is not in the local collection the backend update still
    /// stands and the merged record is returned built from `fields` alone.
    async fn update(&self, id: u64, fields: LeafFields) -> Result<Leaf, LeafError> {
        self.transport.update_leaf(id, &fields).await.map_err(|e| {
            tracing::error!(id, error = %e, "error updating record");
            e
        })?;

        let updated = match self.store.get(id) {
            Some(existing) => existing.apply(&fields),
            None => Leaf {
                id,
                created_at: None,
                fields,
            },
        };
        if !self.store.replace(updated.clone()) {
            tracing::warn!(id, "updated record is not in the local collection");
        }
        tracing::info!(id, "record updated");
        Ok(updated)
    }

    /// Deletes on the backend, then removes the record locally.
    async fn delete(&self, id: u64) -> Result<(), LeafError> {
        self.transport.delete_leaf(id).await.map_err(|e| {
            tracing::error!(id, error = %e, "error deleting record");
            e
        })?;
        self.store.remove(id);
        tracing::info!(id, "record deleted");
        Ok(())
    }
}
