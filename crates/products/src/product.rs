use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use stockroom_core::{Document, DocumentId, DomainError, Quantity, QuantityError};

/// Minimum number of characters in a product name.
pub const MIN_NAME_LEN: usize = 5;

/// A product as stored: name plus stock on hand.
///
/// `quantity` is signed: concurrent sales are not serialized against each
/// other, so stock can be driven below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub quantity: i64,
}

impl Product {
    pub fn new(id: DocumentId, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            quantity: fields.quantity,
        }
    }
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

/// Field values written by create and update.
///
/// Stock adjustments write through this type as well, carrying the product's
/// current name alongside the new quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub quantity: i64,
}

/// Unvalidated create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductInputError {
    #[error("\"name\" is required")]
    NameMissing,

    #[error("\"name\" must be a string")]
    NameNotString,

    #[error("\"name\" length must be at least 5 characters long")]
    NameTooShort,

    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

impl From<ProductInputError> for DomainError {
    fn from(err: ProductInputError) -> Self {
        DomainError::invalid_data(err.to_string())
    }
}

impl ProductInput {
    pub fn new(name: impl Into<Value>, quantity: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            quantity: Some(quantity.into()),
        }
    }

    /// Check name then quantity, reporting the first failure.
    pub fn validate(&self) -> Result<ProductFields, ProductInputError> {
        let name = match &self.name {
            None | Some(Value::Null) => return Err(ProductInputError::NameMissing),
            Some(Value::String(s)) => s,
            Some(_) => return Err(ProductInputError::NameNotString),
        };
        if name.chars().count() < MIN_NAME_LEN {
            return Err(ProductInputError::NameTooShort);
        }

        let quantity = Quantity::parse(self.quantity.as_ref())?;

        Ok(ProductFields {
            name: name.clone(),
            quantity: quantity.get(),
        })
    }
}
