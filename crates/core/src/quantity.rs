//! The quantity rule shared by product stock and sale line items.
//!
//! Caller input arrives as loosely-typed JSON, so "absent", "not a number" and
//! "too small" are all representable. [`Quantity::parse`] turns that into a
//! checked integer or a [`QuantityError`] whose `Display` is the exact
//! client-facing message.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Smallest accepted quantity.
pub const MIN_QUANTITY: i64 = 1;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    #[error("\"quantity\" is required")]
    Missing,

    #[error("\"quantity\" must be a number")]
    NotANumber,

    #[error("\"quantity\" must be larger than or equal to 1")]
    BelowMinimum,

    #[error("\"quantity\" must be an integer")]
    NotAnInteger,

    #[error("\"quantity\" must be a safe number")]
    OutOfRange,
}

/// A validated quantity (always `>= MIN_QUANTITY`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < MIN_QUANTITY {
            return Err(QuantityError::BelowMinimum);
        }
        Ok(Self(value))
    }

    /// Validate raw JSON input.
    ///
    /// Strings are rejected even when they look numeric.
    pub fn parse(raw: Option<&Value>) -> Result<Self, QuantityError> {
        let number = match raw {
            None | Some(Value::Null) => return Err(QuantityError::Missing),
            Some(Value::Number(n)) => n,
            Some(_) => return Err(QuantityError::NotANumber),
        };

        if let Some(v) = number.as_i64() {
            return Self::new(v);
        }
        if number.as_u64().is_some() {
            return Err(QuantityError::OutOfRange);
        }

        let f = number.as_f64().ok_or(QuantityError::NotANumber)?;
        if f < MIN_QUANTITY as f64 {
            return Err(QuantityError::BelowMinimum);
        }
        if f.fract() != 0.0 {
            return Err(QuantityError::NotAnInteger);
        }
        Err(QuantityError::OutOfRange)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}
