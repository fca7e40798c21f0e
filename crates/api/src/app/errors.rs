use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::{DomainError, ErrorCode};

/// Error body: `{"err": {"code": ..., "message": ...}}`.
pub fn json_error(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "err": {
                "code": code,
                "message": message.into(),
            }
        })),
    )
        .into_response()
}

/// Storage failures are 500 everywhere; business errors use `status`.
fn respond(err: DomainError, status: StatusCode) -> axum::response::Response {
    let status = match err.code() {
        ErrorCode::StoreError => {
            tracing::error!(error = %err, "store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => status,
    };
    json_error(status, err.code(), err.message())
}

pub fn product_error(err: DomainError) -> axum::response::Response {
    respond(err, StatusCode::UNPROCESSABLE_ENTITY)
}

pub fn sale_lookup_error(err: DomainError) -> axum::response::Response {
    respond(err, StatusCode::NOT_FOUND)
}

/// Insufficient stock on create is reported as 404.
pub fn sale_create_error(err: DomainError) -> axum::response::Response {
    let status = match err.code() {
        ErrorCode::StockProblem => StatusCode::NOT_FOUND,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    respond(err, status)
}

/// Update and delete report every business error as 422.
pub fn sale_change_error(err: DomainError) -> axum::response::Response {
    respond(err, StatusCode::UNPROCESSABLE_ENTITY)
}
