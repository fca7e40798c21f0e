use async_trait::async_trait;

use stockroom_core::{DocumentId, StoreResult};
use stockroom_products::{Product, ProductFields, ProductRepository};
use stockroom_sales::{LineItem, Sale, SaleRepository};

use super::DocumentCollection;

/// In-memory product store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: DocumentCollection<Product>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        self.products.list()
    }

    async fn get_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>> {
        self.products.get(id)
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        self.products.find(|p| p.name == name)
    }

    async fn create(&self, fields: ProductFields) -> StoreResult<Product> {
        self.products.insert_with(|id| Product::new(id, fields))
    }

    async fn update(&self, id: &DocumentId, fields: ProductFields) -> StoreResult<Option<Product>> {
        self.products.replace(id, Product::new(id.clone(), fields))
    }

    async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>> {
        self.products.remove(id)
    }
}

/// In-memory sale store.
#[derive(Debug, Default)]
pub struct InMemorySaleRepository {
    sales: DocumentCollection<Sale>,
}

impl InMemorySaleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SaleRepository for InMemorySaleRepository {
    async fn list(&self) -> StoreResult<Vec<Sale>> {
        self.sales.list()
    }

    async fn get_by_id(&self, id: &DocumentId) -> StoreResult<Option<Sale>> {
        self.sales.get(id)
    }

    async fn create(&self, items: Vec<LineItem>) -> StoreResult<Sale> {
        self.sales.insert_with(|id| Sale::new(id, items))
    }

    async fn update(&self, id: &DocumentId, items: Vec<LineItem>) -> StoreResult<Option<Sale>> {
        self.sales.replace(id, Sale::new(id.clone(), items))
    }

    async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<Option<Sale>> {
        self.sales.remove(id)
    }
}
