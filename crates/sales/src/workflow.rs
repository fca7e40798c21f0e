//! Sale lifecycle: persistence sequenced around the stock engine.

use tracing::{info, instrument, warn};

use stockroom_core::{DocumentId, DomainError, DomainResult};
use stockroom_products::ProductRepository;

use crate::repository::SaleRepository;
use crate::sale::{LineItem, LineItemInput, Sale};
use crate::stock::{DeltaOutcome, Direction, INVALID_ITEMS, StockEngine};

/// Message for a sale id that is malformed or unknown on delete.
pub const WRONG_SALE_ID: &str = "Wrong sale ID format";

/// Message for a sale lookup that finds nothing.
pub const SALE_NOT_FOUND: &str = "Sale not found";

/// Orchestrates sale persistence around the stock engine.
///
/// There is no transaction spanning the sale record and product stock: the
/// gates run first, then the writes, and a failed stock write is only logged.
#[derive(Debug, Clone)]
pub struct SaleWorkflow<P, S> {
    engine: StockEngine<P>,
    sales: S,
}

impl<P, S> SaleWorkflow<P, S>
where
    P: ProductRepository,
    S: SaleRepository,
{
    pub fn new(products: P, sales: S) -> Self {
        Self {
            engine: StockEngine::new(products),
            sales,
        }
    }

    /// Validate, check stock, deduct it, then record the sale.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn create(&self, items: &[LineItemInput]) -> DomainResult<Sale> {
        let items = self.gate(items).await?;

        let outcomes = self.engine.apply_delta(&items, Direction::Deduct).await;
        report_dropped(&outcomes, Direction::Deduct);

        let sale = self.sales.create(items).await?;
        info!(sale_id = %sale.id, "sale recorded");
        Ok(sale)
    }

    /// Replace a sale's items and deduct the new list.
    ///
    /// The previous items are NOT restored first, so stock for the old list
    /// stays deducted alongside the new one.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn update(&self, id: &str, items: &[LineItemInput]) -> DomainResult<Sale> {
        let items = self.gate(items).await?;

        let Ok(id) = id.parse::<DocumentId>() else {
            info!("sale update with malformed id");
            return Err(DomainError::invalid_data(INVALID_ITEMS));
        };
        let Some(sale) = self.sales.update(&id, items).await? else {
            info!(sale_id = %id, "sale update for unknown sale");
            return Err(DomainError::invalid_data(INVALID_ITEMS));
        };

        let outcomes = self.engine.apply_delta(&sale.items_sold, Direction::Deduct).await;
        report_dropped(&outcomes, Direction::Deduct);

        info!(sale_id = %sale.id, "sale updated");
        Ok(sale)
    }

    /// Remove a sale and put its stored items back into stock.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> DomainResult<Sale> {
        let id = id
            .parse::<DocumentId>()
            .map_err(|_| DomainError::invalid_data(WRONG_SALE_ID))?;

        let Some(sale) = self.sales.delete_by_id(&id).await? else {
            info!(sale_id = %id, "delete for unknown sale");
            return Err(DomainError::invalid_data(WRONG_SALE_ID));
        };

        let outcomes = self.engine.apply_delta(&sale.items_sold, Direction::Restore).await;
        report_dropped(&outcomes, Direction::Restore);

        info!(sale_id = %sale.id, "sale deleted");
        Ok(sale)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> DomainResult<Sale> {
        let id = id
            .parse::<DocumentId>()
            .map_err(|_| DomainError::not_found(SALE_NOT_FOUND))?;
        self.sales
            .get_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(SALE_NOT_FOUND))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> DomainResult<Vec<Sale>> {
        Ok(self.sales.list().await?)
    }

    async fn gate(&self, items: &[LineItemInput]) -> DomainResult<Vec<LineItem>> {
        let items = self
            .engine
            .validate_items(items)
            .await
            .inspect_err(|e| info!(error = %e, "line items rejected"))?;
        self.engine
            .check_stock(&items)
            .await
            .inspect_err(|e| info!(error = %e, "insufficient stock"))?;
        Ok(items)
    }
}

fn report_dropped(outcomes: &[DeltaOutcome], direction: Direction) {
    for outcome in outcomes {
        match outcome {
            DeltaOutcome::Applied { .. } => {}
            DeltaOutcome::ProductMissing { product_id } => {
                warn!(%product_id, ?direction, "stock delta dropped: product missing");
            }
            DeltaOutcome::StoreFailed { product_id, error } => {
                warn!(%product_id, ?direction, %error, "stock delta dropped: store failure");
            }
        }
    }
}
