//! Stock adjustment engine.
//!
//! Three phases, each fanned out per line item and joined before returning:
//!
//! 1. [`StockEngine::validate_items`]: shape checks plus product existence.
//! 2. [`StockEngine::check_stock`]: every item fits its product's stock.
//! 3. [`StockEngine::apply_delta`]: read-modify-write of each product quantity.
//!
//! Phases 1 and 2 are all-or-nothing gates and never write. Phase 3 is
//! best-effort: one item failing does not stop the others, and nothing is
//! re-checked between phase 2 and phase 3. Items naming the same product are
//! written one after another so no delta is lost to an interleaved read.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::debug;

use stockroom_core::{DocumentId, DomainError, DomainResult, Quantity, QuantityError, StoreError};
use stockroom_products::{ProductFields, ProductRepository};

use crate::sale::{LineItem, LineItemInput};

/// Message for any structurally invalid line item list.
pub const INVALID_ITEMS: &str = "Wrong product ID or invalid quantity";

/// Message when an item asks for more than is in stock.
pub const INSUFFICIENT_STOCK: &str = "Such amount is not permitted to sell";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Deduct,
    Restore,
}

impl Direction {
    fn apply(self, current: i64, quantity: i64) -> i64 {
        match self {
            Direction::Deduct => current.saturating_sub(quantity),
            Direction::Restore => current.saturating_add(quantity),
        }
    }
}

/// Result of validating one submitted line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCheck {
    Valid(LineItem),
    /// Missing or wrong-length product id.
    MalformedId,
    /// Well-formed id with no matching product.
    UnknownProduct(DocumentId),
    BadQuantity(QuantityError),
    StoreFailed(StoreError),
}

impl ItemCheck {
    /// Fold per-item results: every item valid, or the first failure.
    pub fn fold(checks: Vec<ItemCheck>) -> DomainResult<Vec<LineItem>> {
        let mut items = Vec::with_capacity(checks.len());
        for check in checks {
            match check {
                ItemCheck::Valid(item) => items.push(item),
                ItemCheck::StoreFailed(err) => return Err(err.into()),
                ItemCheck::MalformedId
                | ItemCheck::UnknownProduct(_)
                | ItemCheck::BadQuantity(_) => return Err(DomainError::invalid_data(INVALID_ITEMS)),
            }
        }
        Ok(items)
    }
}

/// What happened when one item's delta was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaOutcome {
    Applied {
        product_id: DocumentId,
        previous: i64,
        current: i64,
    },
    /// The product disappeared before the write; the delta was dropped.
    ProductMissing { product_id: DocumentId },
    StoreFailed {
        product_id: DocumentId,
        error: StoreError,
    },
}

impl DeltaOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DeltaOutcome::Applied { .. })
    }
}

/// Validates line items against, and moves stock in, a product repository.
#[derive(Debug, Clone)]
pub struct StockEngine<P> {
    products: P,
}

impl<P: ProductRepository> StockEngine<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &P {
        &self.products
    }

    /// Structural validation. An empty list passes.
    pub async fn validate_items(&self, items: &[LineItemInput]) -> DomainResult<Vec<LineItem>> {
        let checks = join_all(items.iter().map(|item| self.check_item(item))).await;
        ItemCheck::fold(checks)
    }

    async fn check_item(&self, item: &LineItemInput) -> ItemCheck {
        let Some(product_id) = item.product_id.as_deref().and_then(|raw| raw.parse::<DocumentId>().ok())
        else {
            return ItemCheck::MalformedId;
        };
        let quantity = match Quantity::parse(item.quantity.as_ref()) {
            Ok(q) => q,
            Err(e) => return ItemCheck::BadQuantity(e),
        };

        match self.products.get_by_id(&product_id).await {
            Ok(Some(_)) => ItemCheck::Valid(LineItem::new(product_id, quantity.get())),
            Ok(None) => ItemCheck::UnknownProduct(product_id),
            Err(e) => ItemCheck::StoreFailed(e),
        }
    }

    /// Every item must fit its product's current stock, compared one by one.
    ///
    /// Repeated products are not summed, and a product that vanished since
    /// validation counts as out of stock.
    pub async fn check_stock(&self, items: &[LineItem]) -> DomainResult<()> {
        let results = join_all(items.iter().map(|item| async move {
            let product = self.products.get_by_id(&item.product_id).await?;
            Ok::<bool, StoreError>(product.is_some_and(|p| item.quantity <= p.quantity))
        }))
        .await;

        for result in results {
            if !result? {
                return Err(DomainError::stock_problem(INSUFFICIENT_STOCK));
            }
        }
        Ok(())
    }

    /// Apply `direction` to every item's product. Never fails as a whole.
    ///
    /// Distinct products are adjusted concurrently; repeated items for one
    /// product run in submission order. Outcomes follow the input order.
    pub async fn apply_delta(&self, items: &[LineItem], direction: Direction) -> Vec<DeltaOutcome> {
        let mut by_product: HashMap<&DocumentId, Vec<usize>> = HashMap::new();
        for (index, item) in items.iter().enumerate() {
            by_product.entry(&item.product_id).or_default().push(index);
        }

        let runs = join_all(by_product.into_values().map(|indices| async move {
            let mut outcomes = Vec::with_capacity(indices.len());
            for index in indices {
                outcomes.push((index, self.apply_one(&items[index], direction).await));
            }
            outcomes
        }))
        .await;

        let mut outcomes: Vec<(usize, DeltaOutcome)> = runs.into_iter().flatten().collect();
        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }

    async fn apply_one(&self, item: &LineItem, direction: Direction) -> DeltaOutcome {
        let product_id = item.product_id.clone();
        let product = match self.products.get_by_id(&product_id).await {
            Ok(Some(p)) => p,
            Ok(None) => return DeltaOutcome::ProductMissing { product_id },
            Err(error) => return DeltaOutcome::StoreFailed { product_id, error },
        };

        let previous = product.quantity;
        let fields = ProductFields {
            name: product.name,
            quantity: direction.apply(previous, item.quantity),
        };

        match self.products.update(&product_id, fields).await {
            Ok(Some(updated)) => {
                debug!(%product_id, ?direction, previous, current = updated.quantity, "stock adjusted");
                DeltaOutcome::Applied {
                    product_id,
                    previous,
                    current: updated.quantity,
                }
            }
            Ok(None) => DeltaOutcome::ProductMissing { product_id },
            Err(error) => DeltaOutcome::StoreFailed { product_id, error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::executor::block_on;
    use serde_json::json;
    use stockroom_core::StoreResult;
    use stockroom_products::Product;

    const WIDGET: &str = "aaaaaaaaaaaaaaaaaaaaaaaa";
    const GADGET: &str = "bbbbbbbbbbbbbbbbbbbbbbbb";
    const GHOST: &str = "cccccccccccccccccccccccc";

    #[derive(Default)]
    struct Shelf {
        products: Mutex<HashMap<DocumentId, Product>>,
        broken: bool,
    }

    impl Shelf {
        fn with(stock: &[(&str, i64)]) -> Self {
            let shelf = Self::default();
            {
                let mut map = shelf.products.lock().unwrap();
                for (id, quantity) in stock {
                    let id: DocumentId = id.parse().unwrap();
                    let fields = ProductFields {
                        name: format!("product-{id}"),
                        quantity: *quantity,
                    };
                    map.insert(id.clone(), Product::new(id, fields));
                }
            }
            shelf
        }

        fn stock(&self, id: &str) -> i64 {
            let id: DocumentId = id.parse().unwrap();
            self.products.lock().unwrap()[&id].quantity
        }
    }

    #[async_trait]
    impl ProductRepository for Shelf {
        async fn list(&self) -> StoreResult<Vec<Product>> {
            Ok(self.products.lock().unwrap().values().cloned().collect())
        }

        async fn get_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>> {
            if self.broken {
                return Err(StoreError::Unavailable("shelf offline".into()));
            }
            Ok(self.products.lock().unwrap().get(id).cloned())
        }

        async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
            Ok(self.products.lock().unwrap().values().find(|p| p.name == name).cloned())
        }

        async fn create(&self, fields: ProductFields) -> StoreResult<Product> {
            let product = Product::new(DocumentId::new(), fields);
            self.products.lock().unwrap().insert(product.id.clone(), product.clone());
            Ok(product)
        }

        async fn update(&self, id: &DocumentId, fields: ProductFields) -> StoreResult<Option<Product>> {
            let mut map = self.products.lock().unwrap();
            Ok(map.get_mut(id).map(|p| {
                *p = Product::new(id.clone(), fields);
                p.clone()
            }))
        }

        async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<Option<Product>> {
            Ok(self.products.lock().unwrap().remove(id))
        }
    }

    fn item(id: &str, quantity: i64) -> LineItem {
        LineItem::new(id.parse().unwrap(), quantity)
    }

    #[test]
    fn fold_stops_at_first_failure() {
        let ok = ItemCheck::Valid(item(WIDGET, 1));
        assert_eq!(ItemCheck::fold(vec![ok.clone()]), Ok(vec![item(WIDGET, 1)]));

        let err = ItemCheck::fold(vec![ok.clone(), ItemCheck::MalformedId]).unwrap_err();
        assert_eq!(err, DomainError::invalid_data(INVALID_ITEMS));

        let err = ItemCheck::fold(vec![ok, ItemCheck::StoreFailed(StoreError::Query("boom".into()))])
            .unwrap_err();
        assert_eq!(err.code(), stockroom_core::ErrorCode::StoreError);
    }

    #[test]
    fn validation_rejects_any_bad_item() {
        let engine = StockEngine::new(Shelf::with(&[(WIDGET, 10)]));

        let good = LineItemInput::new(WIDGET, 2);
        let cases = vec![
            LineItemInput::new("123", 1),
            LineItemInput::new(GHOST, 1),
            LineItemInput::new(WIDGET, 0),
            LineItemInput::new(WIDGET, "2"),
            LineItemInput { product_id: Some(WIDGET.into()), quantity: None },
            LineItemInput { product_id: None, quantity: Some(json!(1)) },
        ];

        for bad in cases {
            let err = block_on(engine.validate_items(&[good.clone(), bad.clone()])).unwrap_err();
            assert_eq!(err.message(), INVALID_ITEMS, "{bad:?}");
        }
        assert_eq!(block_on(engine.validate_items(&[])), Ok(vec![]));
    }

    #[test]
    fn validation_keeps_submission_order() {
        let engine = StockEngine::new(Shelf::with(&[(WIDGET, 10), (GADGET, 5)]));
        let items = block_on(engine.validate_items(&[
            LineItemInput::new(GADGET, 1),
            LineItemInput::new(WIDGET, 3),
            LineItemInput::new(GADGET, 2),
        ]))
        .unwrap();
        assert_eq!(items, vec![item(GADGET, 1), item(WIDGET, 3), item(GADGET, 2)]);
    }

    #[test]
    fn stock_check_compares_each_item_alone() {
        let engine = StockEngine::new(Shelf::with(&[(WIDGET, 10)]));

        // 6 + 6 > 10, but each item fits on its own.
        assert!(block_on(engine.check_stock(&[item(WIDGET, 6), item(WIDGET, 6)])).is_ok());
        assert!(block_on(engine.check_stock(&[item(WIDGET, 10)])).is_ok());

        let err = block_on(engine.check_stock(&[item(WIDGET, 11)])).unwrap_err();
        assert_eq!(err, DomainError::stock_problem(INSUFFICIENT_STOCK));
    }

    #[test]
    fn vanished_product_is_a_stock_problem() {
        let engine = StockEngine::new(Shelf::with(&[(WIDGET, 10)]));
        let err = block_on(engine.check_stock(&[item(GHOST, 1)])).unwrap_err();
        assert_eq!(err.code(), stockroom_core::ErrorCode::StockProblem);
    }

    #[test]
    fn store_failure_surfaces_from_gates() {
        let shelf = Shelf { broken: true, ..Shelf::with(&[(WIDGET, 10)]) };
        let engine = StockEngine::new(shelf);
        let err = block_on(engine.check_stock(&[item(WIDGET, 1)])).unwrap_err();
        assert_eq!(err.code(), stockroom_core::ErrorCode::StoreError);
    }

    #[test]
    fn deltas_apply_per_item_and_report_missing_products() {
        let engine = StockEngine::new(Shelf::with(&[(WIDGET, 10), (GADGET, 5)]));

        let outcomes = block_on(engine.apply_delta(
            &[item(WIDGET, 4), item(GHOST, 1), item(GADGET, 5)],
            Direction::Deduct,
        ));

        assert_eq!(
            outcomes[0],
            DeltaOutcome::Applied { product_id: WIDGET.parse().unwrap(), previous: 10, current: 6 }
        );
        assert_eq!(outcomes[1], DeltaOutcome::ProductMissing { product_id: GHOST.parse().unwrap() });
        assert!(outcomes[2].is_applied());
        assert_eq!(engine.products().stock(WIDGET), 6);
        assert_eq!(engine.products().stock(GADGET), 0);

        block_on(engine.apply_delta(&[item(WIDGET, 4)], Direction::Restore));
        assert_eq!(engine.products().stock(WIDGET), 10);
    }

    #[test]
    fn repeated_items_each_move_stock() {
        let engine = StockEngine::new(Shelf::with(&[(WIDGET, 10), (GADGET, 5)]));

        let outcomes = block_on(engine.apply_delta(
            &[item(WIDGET, 3), item(GADGET, 1), item(WIDGET, 3)],
            Direction::Deduct,
        ));

        let widget: DocumentId = WIDGET.parse().unwrap();
        assert_eq!(
            outcomes[0],
            DeltaOutcome::Applied { product_id: widget.clone(), previous: 10, current: 7 }
        );
        assert!(outcomes[1].is_applied());
        assert_eq!(outcomes[2], DeltaOutcome::Applied { product_id: widget, previous: 7, current: 4 });
        assert_eq!(engine.products().stock(WIDGET), 4);
    }

    #[test]
    fn delta_keeps_product_name() {
        let engine = StockEngine::new(Shelf::with(&[(WIDGET, 3)]));
        block_on(engine.apply_delta(&[item(WIDGET, 1)], Direction::Deduct));
        let id: DocumentId = WIDGET.parse().unwrap();
        let product = engine.products().products.lock().unwrap()[&id].clone();
        assert_eq!(product.name, format!("product-{WIDGET}"));
        assert_eq!(product.quantity, 2);
    }
}
