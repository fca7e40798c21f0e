//! Document identifiers assigned by the store.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Number of characters in a well-formed [`DocumentId`].
pub const DOCUMENT_ID_LEN: usize = 24;

/// Opaque 24-character identifier of a stored document (product or sale).
///
/// Validity is purely a length check: any 24-character string is accepted as
/// an identifier and may or may not resolve to a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("document id must be 24 characters long, got {0}")]
pub struct InvalidDocumentId(pub usize);

impl DocumentId {
    /// Mint a fresh identifier.
    ///
    /// Uses the first 12 bytes of a UUIDv7 (millisecond timestamp followed by
    /// random bits), hex-encoded, so ids sort roughly by creation time.
    pub fn new() -> Self {
        let uuid = Uuid::now_v7();
        let hex: String = uuid.as_bytes()[..DOCUMENT_ID_LEN / 2]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        Self(hex)
    }

    /// Whether `raw` has the shape of a document id.
    pub fn is_well_formed(raw: &str) -> bool {
        raw.chars().count() == DOCUMENT_ID_LEN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_well_formed(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidDocumentId(s.chars().count()))
        }
    }
}

impl TryFrom<String> for DocumentId {
    type Error = InvalidDocumentId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_well_formed(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidDocumentId(value.chars().count()))
        }
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}
