//! Postgres-backed product and sale repositories.
//!
//! Each document is one row keyed by its 24-character id. A `seq` column
//! records insertion order so listings come back oldest first. Sale line
//! items are stored as a JSONB array in their wire format.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | PoolClosed, PoolTimedOut, Io, Tls | `Unavailable` |
//! | Database, anything else | `Query` |
//! | Undecodable row | `Corrupt` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use stockroom_core::{Document, DocumentId, StoreError, StoreResult};
use stockroom_products::{Product, ProductFields, ProductRepository};
use stockroom_sales::{LineItem, Sale, SaleRepository};

/// Create the `products` and `sales` tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            seq BIGSERIAL,
            name TEXT NOT NULL,
            quantity BIGINT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| map_sqlx_error("ensure_schema", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sales (
            id TEXT PRIMARY KEY,
            seq BIGSERIAL,
            items_sold JSONB NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| map_sqlx_error("ensure_schema", e))?;

    Ok(())
}

#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: Arc<PgPool>,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query("SELECT id, name, quantity FROM products ORDER BY seq ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_products", e))?;
        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>> {
        let row = sqlx::query("SELECT id, name, quantity FROM products WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            "SELECT id, name, quantity FROM products WHERE name = $1 ORDER BY seq ASC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product_by_name", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, fields), err)]
    async fn create(&self, fields: ProductFields) -> StoreResult<Product> {
        let product = Product::new(DocumentId::new(), fields);
        sqlx::query("INSERT INTO products (id, name, quantity) VALUES ($1, $2, $3)")
            .bind(product.id.as_str())
            .bind(&product.name)
            .bind(product.quantity)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_product", e))?;
        Ok(product)
    }

    #[instrument(skip(self, fields), fields(product_id = %id), err)]
    async fn update(&self, id: &DocumentId, fields: ProductFields) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            UPDATE products SET name = $2, quantity = $3
            WHERE id = $1
            RETURNING id, name, quantity
            "#,
        )
        .bind(id.as_str())
        .bind(&fields.name)
        .bind(fields.quantity)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>> {
        let row = sqlx::query("DELETE FROM products WHERE id = $1 RETURNING id, name, quantity")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }
}

#[derive(Debug, Clone)]
pub struct PostgresSaleRepository {
    pool: Arc<PgPool>,
}

impl PostgresSaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl SaleRepository for PostgresSaleRepository {
    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<Sale>> {
        let rows = sqlx::query("SELECT id, items_sold FROM sales ORDER BY seq ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_sales", e))?;
        rows.iter().map(sale_from_row).collect()
    }

    #[instrument(skip(self), fields(sale_id = %id), err)]
    async fn get_by_id(&self, id: &DocumentId) -> StoreResult<Option<Sale>> {
        let row = sqlx::query("SELECT id, items_sold FROM sales WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_sale", e))?;
        row.as_ref().map(sale_from_row).transpose()
    }

    #[instrument(skip(self, items), fields(items = items.len()), err)]
    async fn create(&self, items: Vec<LineItem>) -> StoreResult<Sale> {
        let sale = Sale::new(DocumentId::new(), items);
        sqlx::query("INSERT INTO sales (id, items_sold) VALUES ($1, $2)")
            .bind(sale.id.as_str())
            .bind(Json(&sale.items_sold))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_sale", e))?;
        Ok(sale)
    }

    #[instrument(skip(self, items), fields(sale_id = %id), err)]
    async fn update(&self, id: &DocumentId, items: Vec<LineItem>) -> StoreResult<Option<Sale>> {
        let row = sqlx::query("UPDATE sales SET items_sold = $2 WHERE id = $1 RETURNING id, items_sold")
            .bind(id.as_str())
            .bind(Json(&items))
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_sale", e))?;
        row.as_ref().map(sale_from_row).transpose()
    }

    #[instrument(skip(self), fields(sale_id = %id), err)]
    async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<Option<Sale>> {
        let row = sqlx::query("DELETE FROM sales WHERE id = $1 RETURNING id, items_sold")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_sale", e))?;
        row.as_ref().map(sale_from_row).transpose()
    }
}

fn document_id<V: Document>(row: &PgRow) -> StoreResult<DocumentId> {
    let raw: String = row
        .try_get("id")
        .map_err(|e| map_sqlx_error(V::COLLECTION, e))?;
    DocumentId::try_from(raw.clone()).map_err(|e| StoreError::Corrupt {
        id: raw,
        reason: e.to_string(),
    })
}

fn product_from_row(row: &PgRow) -> StoreResult<Product> {
    let id = document_id::<Product>(row)?;
    let corrupt = |e: sqlx::Error| StoreError::Corrupt {
        id: id.to_string(),
        reason: e.to_string(),
    };
    let name: String = row.try_get("name").map_err(corrupt)?;
    let quantity: i64 = row.try_get("quantity").map_err(corrupt)?;
    Ok(Product::new(id, ProductFields { name, quantity }))
}

fn sale_from_row(row: &PgRow) -> StoreResult<Sale> {
    let id = document_id::<Sale>(row)?;
    let Json(items): Json<Vec<LineItem>> =
        row.try_get("items_sold").map_err(|e| StoreError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
    Ok(Sale::new(id, items))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {operation}: {e}")),
        sqlx::Error::Database(db_err) => {
            StoreError::Query(format!("database error in {operation}: {}", db_err.message()))
        }
        other => StoreError::Query(format!("sqlx error in {operation}: {other}")),
    }
}
