//! `stockroom-core`: shared domain primitives.
//!
//! This crate contains **pure domain** types (no infrastructure concerns):
//! document identifiers, the quantity rule, and the error taxonomy that every
//! workflow reports through.

pub mod document;
pub mod error;
pub mod id;
pub mod quantity;

pub use document::Document;
pub use error::{DomainError, DomainResult, ErrorCode, StoreError, StoreResult};
pub use id::{DOCUMENT_ID_LEN, DocumentId, InvalidDocumentId};
pub use quantity::{MIN_QUANTITY, Quantity, QuantityError};
