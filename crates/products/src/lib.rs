//! Products domain module.
//!
//! Product records, the validation applied to caller input, the repository
//! contract a document store must satisfy, and the workflow that ties them
//! together. Stock changes driven by sales live in `stockroom-sales`.

pub mod product;
pub mod repository;
pub mod workflow;

pub use product::{MIN_NAME_LEN, Product, ProductFields, ProductInput, ProductInputError};
pub use repository::ProductRepository;
pub use workflow::{ProductWorkflow, WRONG_ID_FORMAT};
