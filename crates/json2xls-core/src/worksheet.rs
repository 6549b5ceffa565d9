//! Worksheet type

use crate::cell::{CellData, CellRange, CellStorage};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
#[derive(Debug)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell Access ===

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get cell text by indices; absent cells read as `""`
    pub fn text_at(&self, row: u32, col: u16) -> &str {
        self.cells.get(row, col).map(CellData::text).unwrap_or("")
    }

    // === Cell Modification ===

    /// Set a cell's text by row and column indices
    ///
    /// Indices are taken as `usize` so callers can pass positions straight from
    /// their source data; anything outside the BIFF8 grid is rejected.
    pub fn set_text_at(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        let (row, col) = Self::validate_cell_position(row, col)?;
        self.cells.set_text(row, col, text);
        Ok(())
    }

    // === Range Operations ===

    /// Get the used range (bounds of all stored cells)
    pub fn used_range(&self) -> Option<CellRange> {
        self.cells
            .used_bounds()
            .map(|(min_row, min_col, max_row, max_col)| {
                CellRange::from_indices(min_row, min_col, max_row, max_col)
            })
    }

    /// Validate cell position against the grid limits
    fn validate_cell_position(row: usize, col: usize) -> Result<(u32, u16)> {
        if row >= MAX_ROWS as usize {
            let row = u32::try_from(row).unwrap_or(u32::MAX);
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS as usize {
            let col = u32::try_from(col).unwrap_or(u32::MAX);
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok((row as u32, col as u16))
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Check if the worksheet is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Iterate over the stored cells of one row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.cells.iter_row(row)
    }

    /// Collect the text of every row up to the last used one
    ///
    /// Rows are padded only up to their own last stored cell, so ragged input
    /// keeps its shape. Mostly useful for assertions.
    pub fn rows_text(&self) -> Vec<Vec<String>> {
        let last_row = match self.used_range() {
            Some(range) => range.end.row,
            None => return Vec::new(),
        };

        (0..=last_row)
            .map(|row| {
                let mut out = Vec::new();
                for (col, cell) in self.cells.iter_row(row) {
                    out.resize(col as usize, String::new());
                    out.push(cell.text().to_string());
                }
                out
            })
            .collect()
    }
}
