//! XLS error types

use json2xls_core::CellAddress;
use thiserror::Error;

/// Result type for XLS operations
pub type XlsResult<T> = std::result::Result<T, XlsError>;

/// Errors that can occur during XLS reading/writing
#[derive(Debug, Error)]
pub enum XlsError {
    /// IO error (also covers CFB errors which use std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid XLS format: {0}")]
    InvalidFormat(String),

    /// Unsupported version
    #[error("Unsupported XLS version: {0}")]
    UnsupportedVersion(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Cell text longer than a BIFF8 cell can hold
    #[error("Cell {sheet}!{cell} has {chars} characters (max {max})")]
    StringTooLong {
        sheet: String,
        cell: CellAddress,
        chars: usize,
        max: usize,
    },

    /// A BIFF8 workbook needs at least one sheet
    #[error("Workbook has no worksheets")]
    NoWorksheets,

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] json2xls_core::Error),
}
