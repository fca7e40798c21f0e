use serde::{Deserialize, Serialize};
use serde_json::Value;

use stockroom_core::{Document, DocumentId};

/// A validated (product, quantity) pair inside a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "productId")]
    pub product_id: DocumentId,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(product_id: DocumentId, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

/// A line item as submitted by a caller, before any checks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LineItemInput {
    #[serde(rename = "productId", default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<Value>,
}

impl LineItemInput {
    pub fn new(product_id: impl Into<String>, quantity: impl Into<Value>) -> Self {
        Self {
            product_id: Some(product_id.into()),
            quantity: Some(quantity.into()),
        }
    }
}

/// A recorded sale. Item order is the order the caller submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    // Older clients spell the field `itensSold`.
    #[serde(rename = "itemsSold", alias = "itensSold")]
    pub items_sold: Vec<LineItem>,
}

impl Sale {
    pub fn new(id: DocumentId, items_sold: Vec<LineItem>) -> Self {
        Self { id, items_sold }
    }
}

impl Document for Sale {
    const COLLECTION: &'static str = "sales";

    fn id(&self) -> &DocumentId {
        &self.id
    }
}
