//! Infrastructure layer: document stores and configuration.

pub mod config;
pub mod store;


pub use config::{AppConfig, ConfigError, StoreBackend};
pub use store::{
    DocumentCollection, InMemoryProductRepository, InMemorySaleRepository,
    PostgresProductRepository, PostgresSaleRepository,
};
