//! Conversion error types

use std::path::PathBuf;

use json2xls_xls::XlsError;
use thiserror::Error;

/// Result type for conversions
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while converting a JSON document to XLS
///
/// Each message is a single line that already includes the underlying cause.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input file could not be opened or read
    #[error("Failed to read '{}': {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON, or not shaped like `{"rows": [[...], ...]}`
    #[error("Invalid JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document has no rows (`rows` empty, null or missing)
    #[error("No rows in input data")]
    EmptyData,

    /// The data does not fit the sheet (too many rows or columns, bad sheet name)
    #[error("{0}")]
    Sheet(#[from] json2xls_core::Error),

    /// The workbook could not be serialised or saved
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: XlsError,
    },
}

impl ConvertError {
    /// Build a parse error for the document read from `path`
    pub(crate) fn parse_in<P: Into<PathBuf>>(path: P, source: serde_json::Error) -> Self {
        ConvertError::Parse {
            path: path.into(),
            source,
        }
    }
}
