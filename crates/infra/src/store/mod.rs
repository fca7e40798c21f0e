//! Document store adapters for the product and sale repositories.

pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryProductRepository, InMemorySaleRepository};
pub use postgres::{PostgresProductRepository, PostgresSaleRepository, ensure_schema};

use std::collections::HashMap;
use std::sync::RwLock;

use stockroom_core::{Document, DocumentId, StoreError, StoreResult};

/// In-memory keyed collection that remembers insertion order.
///
/// `list` returns documents oldest first, matching a document store's
/// natural scan order.
#[derive(Debug)]
pub struct DocumentCollection<V> {
    inner: RwLock<Slots<V>>,
}

#[derive(Debug)]
struct Slots<V> {
    docs: HashMap<DocumentId, V>,
    order: Vec<DocumentId>,
}

impl<V> Default for DocumentCollection<V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Slots {
                docs: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

fn poisoned<V: Document>() -> StoreError {
    StoreError::Unavailable(format!("{} collection lock poisoned", V::COLLECTION))
}

impl<V: Document> DocumentCollection<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document under a freshly minted id and store it.
    pub fn insert_with(&self, build: impl FnOnce(DocumentId) -> V) -> StoreResult<V> {
        let mut slots = self.inner.write().map_err(|_| poisoned::<V>())?;
        let doc = build(DocumentId::new());
        let id = doc.id().clone();
        slots.order.push(id.clone());
        slots.docs.insert(id, doc.clone());
        Ok(doc)
    }

    pub fn get(&self, id: &DocumentId) -> StoreResult<Option<V>> {
        let slots = self.inner.read().map_err(|_| poisoned::<V>())?;
        Ok(slots.docs.get(id).cloned())
    }

    /// First document, in insertion order, matching `pred`.
    pub fn find(&self, pred: impl Fn(&V) -> bool) -> StoreResult<Option<V>> {
        let slots = self.inner.read().map_err(|_| poisoned::<V>())?;
        Ok(slots
            .order
            .iter()
            .filter_map(|id| slots.docs.get(id))
            .find(|doc| pred(doc))
            .cloned())
    }

    pub fn list(&self) -> StoreResult<Vec<V>> {
        let slots = self.inner.read().map_err(|_| poisoned::<V>())?;
        Ok(slots
            .order
            .iter()
            .filter_map(|id| slots.docs.get(id))
            .cloned()
            .collect())
    }

    /// Replace the document stored under `id`, keeping its position.
    pub fn replace(&self, id: &DocumentId, doc: V) -> StoreResult<Option<V>> {
        let mut slots = self.inner.write().map_err(|_| poisoned::<V>())?;
        Ok(slots.docs.get_mut(id).map(|slot| {
            *slot = doc;
            slot.clone()
        }))
    }

    pub fn remove(&self, id: &DocumentId) -> StoreResult<Option<V>> {
        let mut slots = self.inner.write().map_err(|_| poisoned::<V>())?;
        let removed = slots.docs.remove(id);
        if removed.is_some() {
            slots.order.retain(|kept| kept != id);
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
