use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tracing::info;

use stockroom_infra::{
    InMemoryProductRepository, InMemorySaleRepository, PostgresProductRepository,
    PostgresSaleRepository, StoreBackend, store::ensure_schema,
};
use stockroom_products::{ProductRepository, ProductWorkflow};
use stockroom_sales::{SaleRepository, SaleWorkflow};

pub type DynProducts = Arc<dyn ProductRepository>;
pub type DynSales = Arc<dyn SaleRepository>;

/// Workflows shared by every handler. Both sides see the same product store.
pub struct AppServices {
    pub products: ProductWorkflow<DynProducts>,
    pub sales: SaleWorkflow<DynProducts, DynSales>,
}

impl AppServices {
    pub fn from_repositories(products: DynProducts, sales: DynSales) -> Self {
        Self {
            products: ProductWorkflow::new(products.clone()),
            sales: SaleWorkflow::new(products, sales),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_repositories(
            Arc::new(InMemoryProductRepository::new()),
            Arc::new(InMemorySaleRepository::new()),
        )
    }
}

pub async fn build_services(backend: &StoreBackend) -> anyhow::Result<AppServices> {
    match backend {
        StoreBackend::InMemory => {
            info!("using in-memory stores");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Postgres { database_url } => {
            let pool = PgPool::connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            ensure_schema(&pool).await.context("failed to create schema")?;
            info!("using Postgres stores");

            Ok(AppServices::from_repositories(
                Arc::new(PostgresProductRepository::new(pool.clone())),
                Arc::new(PostgresSaleRepository::new(pool)),
            ))
        }
    }
}
