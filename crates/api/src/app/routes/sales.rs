use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_sales::LineItemInput;

use crate::app::dto::{self, SaleList};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/:id", get(get_sale).put(update_sale).delete(delete_sale))
}

/// Body: a JSON array of `{"productId", "quantity"}`.
pub async fn create_sale(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Vec<LineItemInput>>, JsonRejection>,
) -> axum::response::Response {
    let items = match dto::sale_body(body) {
        Ok(v) => v,
        Err(e) => return errors::sale_create_error(e),
    };

    match services.sales.create(&items).await {
        Ok(sale) => (StatusCode::OK, Json(sale)).into_response(),
        Err(e) => errors::sale_create_error(e),
    }
}

pub async fn list_sales(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.sales.list().await {
        Ok(sales) => (StatusCode::OK, Json(SaleList { sales })).into_response(),
        Err(e) => errors::sale_lookup_error(e),
    }
}

pub async fn get_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.sales.get(&id).await {
        Ok(sale) => (StatusCode::OK, Json(sale)).into_response(),
        Err(e) => errors::sale_lookup_error(e),
    }
}

pub async fn update_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<Vec<LineItemInput>>, JsonRejection>,
) -> axum::response::Response {
    let items = match dto::sale_body(body) {
        Ok(v) => v,
        Err(e) => return errors::sale_change_error(e),
    };

    match services.sales.update(&id, &items).await {
        Ok(sale) => (StatusCode::OK, Json(sale)).into_response(),
        Err(e) => errors::sale_change_error(e),
    }
}

pub async fn delete_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.sales.delete(&id).await {
        Ok(sale) => (StatusCode::OK, Json(sale)).into_response(),
        Err(e) => errors::sale_change_error(e),
    }
}
