//! Cell storage implementation
//!
//! Sparse storage for worksheet cells. Only written cells are stored, using
//! a row-based BTreeMap structure so iteration is always row-major.

use std::collections::BTreeMap;

use super::{CellValue, StringPool};

/// Complete data for a single stored cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
}

impl CellData {
    /// Create a new cell with a value
    pub fn new(value: CellValue) -> Self {
        Self { value }
    }

    /// Create an empty cell
    pub fn empty() -> Self {
        Self {
            value: CellValue::Empty,
        }
    }

    /// Check if this cell carries no value
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Text of the cell, `""` when it carries no value
    pub fn text(&self) -> &str {
        self.value.as_string().unwrap_or("")
    }
}

impl Default for CellData {
    fn default() -> Self {
        Self::empty()
    }
}

/// Sparse row-based storage for worksheet cells
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, CellData>>`
///
/// - Ordered iteration matches the row-major order cell records are written in
/// - Only stores non-empty cells; a zero-length string is still stored
#[derive(Debug, Default)]
pub struct CellStorage {
    /// Row index → column map
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,

    /// Shared string pool for deduplication
    string_pool: StringPool,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Set a cell
    ///
    /// If the cell data is empty, the cell is removed.
    pub fn set(&mut self, row: u32, col: u16, data: CellData) {
        if data.is_empty() {
            self.remove(row, col);
        } else {
            self.rows.entry(row).or_default().insert(col, data);
        }
    }

    /// Set a cell's text, interning it in the string pool
    pub fn set_text(&mut self, row: u32, col: u16, text: &str) {
        let shared = self.string_pool.intern(text);
        self.set(row, col, CellData::new(CellValue::String(shared)));
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let result = row_map.remove(&col);

        // Clean up empty rows
        if row_map.is_empty() {
            self.rows.remove(&row);
        }

        result
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the bounds of used cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u16::MAX;
        let mut max_col = 0u16;

        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, data)| (row, col, data)))
    }

    /// Iterate over cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, data)| (col, data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut storage = CellStorage::new();

        storage.set_text(0, 0, "Name");
        let cell = storage.get(0, 0).unwrap();
        assert_eq!(cell.text(), "Name");

        // Get non-existent
        assert!(storage.get(1, 1).is_none());
    }

    #[test]
    fn test_empty_cells_not_stored() {
        let mut storage = CellStorage::new();

        storage.set_text(0, 0, "x");
        assert_eq!(storage.cell_count(), 1);

        // Setting empty removes the cell
        storage.set(0, 0, CellData::empty());
        assert_eq!(storage.cell_count(), 0);
        assert!(storage.get(0, 0).is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_zero_length_text_is_stored() {
        let mut storage = CellStorage::new();

        storage.set_text(2, 0, "");
        let cell = storage.get(2, 0).unwrap();
        assert_eq!(cell.text(), "");
        assert_eq!(storage.cell_count(), 1);
    }

    #[test]
    fn test_used_bounds() {
        let mut storage = CellStorage::new();

        assert!(storage.used_bounds().is_none());

        storage.set_text(5, 3, "a");
        storage.set_text(10, 7, "b");
        storage.set_text(2, 1, "c");

        let (min_row, min_col, max_row, max_col) = storage.used_bounds().unwrap();
        assert_eq!(min_row, 2);
        assert_eq!(min_col, 1);
        assert_eq!(max_row, 10);
        assert_eq!(max_col, 7);
    }

    #[test]
    fn test_iteration() {
        let mut storage = CellStorage::new();

        storage.set_text(1, 0, "c");
        storage.set_text(0, 1, "b");
        storage.set_text(0, 0, "a");

        let cells: Vec<_> = storage
            .iter()
            .map(|(row, col, data)| (row, col, data.text()))
            .collect();

        // Should be in row order regardless of insertion order
        assert_eq!(cells, vec![(0, 0, "a"), (0, 1, "b"), (1, 0, "c")]);
        assert_eq!(storage.iter_row(0).count(), 2);
    }

    #[test]
    fn test_repeated_text_is_interned() {
        let mut storage = CellStorage::new();

        storage.set_text(0, 0, "Yes");
        storage.set_text(1, 0, "Yes");
        storage.set_text(2, 0, "No");

        let first = storage.get(0, 0).unwrap().text();
        let second = storage.get(1, 0).unwrap().text();
        assert!(std::ptr::eq(first, second));
        assert!(!std::ptr::eq(first, storage.get(2, 0).unwrap().text()));
    }
}
