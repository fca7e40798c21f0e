use tracing::{info, instrument};

use stockroom_core::{DocumentId, DomainError, DomainResult};

use crate::product::{Product, ProductInput};
use crate::repository::ProductRepository;

/// Message for a product id that is malformed or matches no record.
pub const WRONG_ID_FORMAT: &str = "Wrong id format";

const ALREADY_EXISTS: &str = "Product already exists";

/// Product CRUD.
///
/// Direct updates overwrite the stored quantity and bypass the stock rules
/// applied by sales.
#[derive(Debug, Clone)]
pub struct ProductWorkflow<P> {
    products: P,
}

impl<P: ProductRepository> ProductWorkflow<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    pub fn repository(&self) -> &P {
        &self.products
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ProductInput) -> DomainResult<Product> {
        let fields = input.validate().inspect_err(|e| info!(error = %e, "product rejected"))?;

        if self.products.get_by_name(&fields.name).await?.is_some() {
            info!(name = %fields.name, "duplicate product name");
            return Err(DomainError::invalid_data(ALREADY_EXISTS));
        }

        let product = self.products.create(fields).await?;
        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> DomainResult<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> DomainResult<Product> {
        let id = parse_id(id)?;
        self.products
            .get_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::invalid_data(WRONG_ID_FORMAT))
    }

    /// Replace name and quantity. Name uniqueness is only enforced at creation.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: ProductInput) -> DomainResult<Product> {
        let fields = input.validate().inspect_err(|e| info!(error = %e, "product update rejected"))?;
        let id = parse_id(id)?;

        self.products
            .update(&id, fields)
            .await?
            .ok_or_else(|| DomainError::invalid_data(WRONG_ID_FORMAT))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> DomainResult<Product> {
        let id = parse_id(id)?;
        let deleted = self
            .products
            .delete_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::invalid_data(WRONG_ID_FORMAT))?;
        info!(product_id = %deleted.id, "product deleted");
        Ok(deleted)
    }
}

fn parse_id(raw: &str) -> DomainResult<DocumentId> {
    raw.parse::<DocumentId>()
        .map_err(|_| DomainError::invalid_data(WRONG_ID_FORMAT))
}
