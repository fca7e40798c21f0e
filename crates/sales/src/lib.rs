//! Sales domain module.
//!
//! A sale is an ordered list of line items. Recording, changing or removing a
//! sale moves product stock; [`stock::StockEngine`] owns those rules and
//! [`workflow::SaleWorkflow`] sequences them around persistence.

pub mod repository;
pub mod sale;
pub mod stock;
pub mod workflow;

pub use repository::SaleRepository;
pub use sale::{LineItem, LineItemInput, Sale};
pub use stock::{DeltaOutcome, Direction, INSUFFICIENT_STOCK, INVALID_ITEMS, ItemCheck, StockEngine};
pub use workflow::{SALE_NOT_FOUND, SaleWorkflow, WRONG_SALE_ID};
