//! # json2xls
//!
//! Convert a JSON document of row data into a legacy Excel workbook (.xls,
//! BIFF8) with a single sheet.
//!
//! The input is an object with a `rows` field holding an array of rows, each
//! row an array of cells:
//!
//! ```json
//! {"rows": [["Name", "Age"], ["Alice", 30], [null, true]]}
//! ```
//!
//! Every cell is written as text at the same (row, column) position. `null`
//! becomes an empty string, numbers and booleans their JSON spelling (see
//! [`cell_text`]). Cells may hold up to [`MAX_CELL_CHARS`] characters, far
//! beyond the 255-character limit of inline BIFF strings.
//!
//! ## Example
//!
//! ```rust
//! use json2xls::prelude::*;
//!
//! let doc = InputDocument::from_json_str(r#"{"rows": [["Name", "Age"], ["Alice", 30]]}"#).unwrap();
//! let workbook = convert_document(&doc, &ConvertOptions::default()).unwrap();
//!
//! let sheet = workbook.worksheet(0).unwrap();
//! assert_eq!(sheet.name(), "Sheet1");
//! assert_eq!(sheet.text_at(1, 1), "30");
//!
//! // Or straight from file to file:
//! // let rows = json2xls::convert("input.json", "output.xls")?;
//! ```

pub mod convert;
pub mod error;
pub mod input;
pub mod options;
pub mod prelude;
pub mod stringify;

pub use convert::{convert, convert_document, convert_with_options, read_document};
pub use error::{ConvertError, ConvertResult};
pub use input::InputDocument;
pub use options::ConvertOptions;
pub use stringify::cell_text;

// Re-export core types
pub use json2xls_core::{
    CellAddress, CellRange, CellValue, Error, Result, Workbook, Worksheet, DEFAULT_SHEET_NAME,
    MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

// Re-export I/O types
pub use json2xls_xls::{XlsError, XlsReader, XlsWriteOptions, XlsWriter, MAX_CELL_CHARS};
