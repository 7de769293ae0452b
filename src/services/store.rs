//! In-memory document collection.
//!
//! # Design Decisions
//! - DashMap gives per-shard locking; handlers never hold a guard across await
//! - Listing sorts by id so pagination is deterministic
//! - Documents without an id receive a UUID v4 on insert

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// A stored document addressed by a string id.
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("document {0} already exists")]
    Duplicate(String),
}

/// A keyed set of documents of one type.
#[derive(Debug)]
pub struct Collection<T> {
    docs: DashMap<String, T>,
}

impl<T: Document> Collection<T> {
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
        }
    }

    /// Insert a new document, assigning an id if it has none.
    pub fn insert(&self, mut doc: T) -> Result<T, StoreError> {
        if doc.id().is_empty() {
            doc.set_id(uuid::Uuid::new_v4().to_string());
        }
        match self.docs.entry(doc.id().to_string()) {
            Entry::Occupied(entry) => Err(StoreError::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(doc.clone());
                Ok(doc)
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.docs.get(id).map(|doc| doc.value().clone())
    }

    /// Apply `f` to the document in place and return the result.
    pub fn update<F>(&self, id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut doc = self.docs.get_mut(id)?;
        f(doc.value_mut());
        Some(doc.value().clone())
    }

    pub fn delete(&self, id: &str) -> Option<T> {
        self.docs.remove(id).map(|(_, doc)| doc)
    }

    /// Documents matching `predicate`, sorted by id.
    pub fn find<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        let mut docs: Vec<T> = self
            .docs
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        docs.sort_by(|a, b| a.id().cmp(b.id()));
        docs
    }

    /// Every document, sorted by id.
    pub fn list(&self) -> Vec<T> {
        self.find(|_| true)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}
