//! # json2xls-core
//!
//! Core data structures for the json2xls converter.
//!
//! This crate provides the in-memory workbook that the converter fills and
//! the BIFF8 codec serialises:
//! - [`CellValue`] - The text stored in a cell
//! - [`CellAddress`] and [`CellRange`] - A1 display of cells and ranges
//! - [`Workbook`], [`Worksheet`] - The main document structures
//!
//! ## Example
//!
//! ```rust
//! use json2xls_core::Workbook;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! // Row/column indices are 0-based
//! sheet.set_text_at(0, 0, "Hello").unwrap();
//! sheet.set_text_at(1, 0, "World").unwrap();
//! assert_eq!(sheet.text_at(1, 0), "World");
//! ```

pub mod cell;
pub mod error;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellData, CellRange, CellValue, SharedString};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (BIFF8 limit)
pub const MAX_ROWS: u32 = 65_536;

/// Maximum number of columns in a worksheet (BIFF8 limit)
pub const MAX_COLS: u16 = 256;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Name of the sheet created by [`Workbook::new`]
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
