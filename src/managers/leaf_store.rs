//! Leaf Store for Cassandra Leaves.
//!
//! The single owner of the in-memory collection. Every write goes through one
//! of the operations below; readers either take a snapshot or subscribe to
//! change notifications.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;

use crate::types::leaf::Leaf;

/// Shared, observable collection of leaves.
///
/// Cloning the `Arc<LeafStore>` shares the same collection; there is no way
/// to obtain an independent, divergent copy other than a read-only snapshot.
#[derive(Debug)]
pub struct LeafStore {
    tx: watch::Sender<Arc<Vec<Leaf>>>,
}

impl LeafStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self { tx }
    }

    /// Creates a store seeded with an initial collection.
    pub fn with_leaves(leaves: Vec<Leaf>) -> Self {
        let store = Self::new();
        store.replace_all(leaves);
        store
    }

    /// Returns a read-only snapshot of the current collection.
    pub fn snapshot(&self) -> Arc<Vec<Leaf>> {
        self.tx.borrow().clone()
    }

    /// Subscribes to collection changes. The receiver always sees the latest
    /// published collection.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Leaf>>> {
        self.tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    pub fn get(&self, id: u64) -> Option<Leaf> {
        self.tx.borrow().iter().find(|leaf| leaf.id == id).cloned()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.tx.borrow().iter().map(|leaf| leaf.id).collect()
    }

    /// Replaces the whole collection. Later duplicates of an identifier are dropped.
    pub fn replace_all(&self, leaves: Vec<Leaf>) {
        let mut seen = HashSet::with_capacity(leaves.len());
        let unique: Vec<Leaf> = leaves.into_iter().filter(|l| seen.insert(l.id)).collect();
        self.tx.send_replace(Arc::new(unique));
    }

    /// Appends a fetched page, skipping identifiers already present.
    /// Returns the number of records actually added.
    pub fn append(&self, page: Vec<Leaf>) -> usize {
        let mut added = 0;
        self.tx.send_if_modified(|current| {
            let mut seen: HashSet<u64> = current.iter().map(|l| l.id).collect();
            let fresh: Vec<Leaf> = page.into_iter().filter(|l| seen.insert(l.id)).collect();
            if fresh.is_empty() {
                return false;
            }
            added = fresh.len();
            Arc::make_mut(current).extend(fresh);
            true
        });
        added
    }

    /// Inserts a newly created record at the top of the collection.
    /// An existing record with the same identifier is replaced in place instead.
    pub fn prepend(&self, leaf: Leaf) {
        self.tx.send_modify(|current| {
            let leaves = Arc::make_mut(current);
            match leaves.iter_mut().find(|l| l.id == leaf.id) {
                Some(existing) => *existing = leaf,
                None => leaves.insert(0, leaf),
            }
        });
    }

    /// Replaces the record with the same identifier, keeping its position.
    /// Returns false when no such record exists.
    pub fn replace(&self, leaf: Leaf) -> bool {
        let mut found = false;
        self.tx.send_if_modified(|current| {
            let Some(pos) = current.iter().position(|l| l.id == leaf.id) else {
                return false;
            };
            found = true;
            // unchanged records are not republished
            if current[pos] == leaf {
                return false;
            }
            Arc::make_mut(current)[pos] = leaf;
            true
        });
        found
    }

    /// Removes the record with the given identifier.
    pub fn remove(&self, id: u64) -> Option<Leaf> {
        let mut removed = None;
        self.tx.send_if_modified(|current| {
            let Some(pos) = current.iter().position(|l| l.id == id) else {
                return false;
            };
            removed = Some(Arc::make_mut(current).remove(pos));
            true
        });
        removed
    }
}

impl Default for LeafStore {
    fn default() -> Self {
        Self::new()
    }
}
