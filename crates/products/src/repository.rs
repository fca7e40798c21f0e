use std::sync::Arc;

use async_trait::async_trait;

use stockroom_core::{DocumentId, StoreResult};

use crate::product::{Product, ProductFields};

/// Persistence contract for products.
///
/// Implementations may be backed by any document store; `update` and
/// `delete_by_id` return `None` when no record matches.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Product>>;

    async fn get_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>>;

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>>;

    /// Insert a new product under a freshly assigned id.
    async fn create(&self, fields: ProductFields) -> StoreResult<Product>;

    /// Overwrite name and quantity of an existing product.
    async fn update(&self, id: &DocumentId, fields: ProductFields) -> StoreResult<Option<Product>>;

    async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<Product>> {
        (**self).list().await
    }

    async fn get_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>> {
        (**self).get_by_id(id).await
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        (**self).get_by_name(name).await
    }

    async fn create(&self, fields: ProductFields) -> StoreResult<Product> {
        (**self).create(fields).await
    }

    async fn update(&self, id: &DocumentId, fields: ProductFields) -> StoreResult<Option<Product>> {
        (**self).update(id, fields).await
    }

    async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>> {
        (**self).delete_by_id(id).await
    }
}
