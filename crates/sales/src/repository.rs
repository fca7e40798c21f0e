use std::sync::Arc;

use async_trait::async_trait;

use stockroom_core::{DocumentId, StoreResult};

use crate::sale::{LineItem, Sale};

/// Persistence contract for sales.
#[async_trait]
pub trait SaleRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Sale>>;

    async fn get_by_id(&self, id: &DocumentId) -> StoreResult<Option<Sale>>;

    async fn create(&self, items: Vec<LineItem>) -> StoreResult<Sale>;

    /// Replace the item list of an existing sale; `None` if no sale matches.
    async fn update(&self, id: &DocumentId, items: Vec<LineItem>) -> StoreResult<Option<Sale>>;

    /// Remove a sale, returning the record as it was before deletion.
    async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<Option<Sale>>;
}

#[async_trait]
impl<R> SaleRepository for Arc<R>
where
    R: SaleRepository + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<Sale>> {
        (**self).list().await
    }

    async fn get_by_id(&self, id: &DocumentId) -> StoreResult<Option<Sale>> {
        (**self).get_by_id(id).await
    }

    async fn create(&self, items: Vec<LineItem>) -> StoreResult<Sale> {
        (**self).create(items).await
    }

    async fn update(&self, id: &DocumentId, items: Vec<LineItem>) -> StoreResult<Option<Sale>> {
        (**self).update(id, items).await
    }

    async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<Option<Sale>> {
        (**self).delete_by_id(id).await
    }
}
