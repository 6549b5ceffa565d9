//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location, displayed as "A1"
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`CellData`] - A stored cell

mod address;
mod storage;
mod value;

pub use address::{CellAddress, CellRange};
pub use storage::{CellData, CellStorage};
pub use value::{CellValue, SharedString, StringPool};
