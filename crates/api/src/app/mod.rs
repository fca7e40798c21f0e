//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository selection and workflow construction
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response bodies and JSON body parsing
//! - `errors.rs`: error body and status mapping

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
}
