use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;

use stockroom_core::DomainError;
use stockroom_products::Product;
use stockroom_sales::{INVALID_ITEMS, Sale};

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct SaleList {
    pub sales: Vec<Sale>,
}

// -------------------------
// Request parsing
// -------------------------

/// Unwrap a product body, turning a rejection into `invalid_data`.
pub fn product_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, DomainError> {
    body.map(|Json(v)| v)
        .map_err(|rejection| DomainError::invalid_data(rejection.body_text()))
}

/// Unwrap a line-item array body. Any shape problem reads as invalid items.
pub fn sale_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, DomainError> {
    body.map(|Json(v)| v).map_err(|rejection| {
        tracing::info!(error = %rejection.body_text(), "unreadable sale body");
        DomainError::invalid_data(INVALID_ITEMS)
    })
}
