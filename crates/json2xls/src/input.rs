//! The JSON input document

use serde::Deserialize;
use serde_json::Value;

/// A parsed input document: `{"rows": [[cell, ...], ...]}`
///
/// `rows` may be missing or `null`; both read as no rows. Other top-level
/// fields are ignored. Rows need not have the same length.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputDocument {
    #[serde(default)]
    pub rows: Option<Vec<Vec<Value>>>,
}

impl InputDocument {
    /// Build a document from rows already in memory
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Self {
        Self { rows: Some(rows) }
    }

    /// Parse a document from JSON text
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Parse a document from UTF-8 JSON bytes
    pub fn from_json_slice(json: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(json)
    }

    /// The rows, empty when the field was missing or null
    pub fn rows(&self) -> &[Vec<Value>] {
        self.rows.as_deref().unwrap_or(&[])
    }

    /// Number of rows, counting empty ones
    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    /// Check if the document has no rows
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}
