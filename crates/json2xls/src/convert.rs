//! JSON → XLS conversion

use std::fs;
use std::path::Path;

use json2xls_core::{Error, Workbook, Worksheet, MAX_ROWS};
use json2xls_xls::XlsWriter;
use serde_json::Value;

use crate::error::{ConvertError, ConvertResult};
use crate::input::InputDocument;
use crate::options::ConvertOptions;
use crate::stringify::cell_text;

/// Convert the JSON file at `input` into an XLS file at `output`
///
/// Returns the number of rows written (the length of `rows`, counting empty
/// rows). Fails with [`ConvertError::EmptyData`] and writes nothing when the
/// document has no rows.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> ConvertResult<usize> {
    convert_with_options(input, output, &ConvertOptions::default())
}

/// Convert with explicit options
pub fn convert_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> ConvertResult<usize> {
    let input = input.as_ref();
    let output = output.as_ref();

    let document = read_document(input)?;
    tracing::info!(
        rows = document.row_count(),
        input = %input.display(),
        "loaded input document"
    );

    let workbook = convert_document(&document, options)?;

    XlsWriter::write_file_with_options(&workbook, output, &options.write).map_err(|source| {
        ConvertError::Write {
            path: output.to_path_buf(),
            source,
        }
    })?;
    tracing::info!(output = %output.display(), "workbook saved");

    Ok(document.row_count())
}

/// Read and parse the input document at `path`
pub fn read_document<P: AsRef<Path>>(path: P) -> ConvertResult<InputDocument> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ConvertError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    InputDocument::from_json_slice(&bytes).map_err(|source| ConvertError::parse_in(path, source))
}

/// Build the single-sheet workbook for a document, without touching the filesystem
pub fn convert_document(
    document: &InputDocument,
    options: &ConvertOptions,
) -> ConvertResult<Workbook> {
    let rows = document.rows();
    if rows.is_empty() {
        return Err(ConvertError::EmptyData);
    }
    if rows.len() > MAX_ROWS as usize {
        let last = u32::try_from(rows.len() - 1).unwrap_or(u32::MAX);
        return Err(Error::RowOutOfBounds(last, MAX_ROWS - 1).into());
    }

    let mut workbook = Workbook::empty();
    let idx = workbook.add_worksheet_with_name(&options.sheet_name)?;
    if let Some(sheet) = workbook.worksheet_mut(idx) {
        fill_sheet(sheet, rows)?;
        tracing::debug!(
            sheet = sheet.name(),
            cells = sheet.cell_count(),
            "sheet populated"
        );
    }

    Ok(workbook)
}

/// Write every cell, in row-major order, at its (row, column) position
fn fill_sheet(sheet: &mut Worksheet, rows: &[Vec<Value>]) -> ConvertResult<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            sheet.set_text_at(row_idx, col_idx, &cell_text(value))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> InputDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_example_table() {
        let input = doc(json!({"rows": [["Name", "Age"], ["Alice", "30"], [null, "25"]]}));
        let wb = convert_document(&input, &ConvertOptions::default()).unwrap();

        assert_eq!(wb.sheet_count(), 1);
        let ws = wb.worksheet(0).unwrap();
        assert_eq!(ws.name(), "Sheet1");
        assert_eq!(
            ws.rows_text(),
            vec![vec!["Name", "Age"], vec!["Alice", "30"], vec!["", "25"]]
        );
        // A null cell is still written, as an empty string
        assert!(ws.cell_at(2, 0).is_some());
    }

    #[test]
    fn test_scalar_types() {
        let input = doc(json!({"rows": [[12345, true, false, 1.5, null, "s"]]}));
        let wb = convert_document(&input, &ConvertOptions::default()).unwrap();
        assert_eq!(
            wb.worksheet(0).unwrap().rows_text(),
            vec![vec!["12345", "true", "false", "1.5", "", "s"]]
        );
    }

    #[test]
    fn test_ragged_rows_are_not_padded() {
        let input = doc(json!({"rows": [["a", "b", "c"], [], ["d"]]}));
        let wb = convert_document(&input, &ConvertOptions::default()).unwrap();
        let ws = wb.worksheet(0).unwrap();

        assert_eq!(ws.cell_count(), 4);
        assert!(ws.cell_at(2, 1).is_none());
        assert!(ws.iter_row(1).next().is_none());
    }

    #[test]
    fn test_empty_rows_are_rejected() {
        for value in [json!({"rows": []}), json!({}), json!({"rows": null})] {
            let err = convert_document(&doc(value), &ConvertOptions::default()).unwrap_err();
            assert!(matches!(err, ConvertError::EmptyData));
        }
    }

    #[test]
    fn test_rows_of_empty_rows_are_not_empty_data() {
        let wb = convert_document(&doc(json!({"rows": [[]]})), &ConvertOptions::default()).unwrap();
        assert!(wb.worksheet(0).unwrap().is_empty());
    }

    #[test]
    fn test_too_many_columns() {
        let row: Vec<_> = (0..257).map(|i| json!(i)).collect();
        let err = convert_document(&doc(json!({"rows": [row]})), &ConvertOptions::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column index 256 out of bounds (max: 255)"
        );
    }

    #[test]
    fn test_too_many_rows() {
        let input = InputDocument::from_rows(vec![Vec::new(); MAX_ROWS as usize + 1]);
        let err = convert_document(&input, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Sheet(Error::RowOutOfBounds(65_536, 65_535))
        ));
    }

    #[test]
    fn test_custom_sheet_name() {
        let options = ConvertOptions {
            sheet_name: "Data".into(),
            ..Default::default()
        };
        let wb = convert_document(&doc(json!({"rows": [["x"]]})), &options).unwrap();
        assert_eq!(wb.worksheet(0).unwrap().name(), "Data");
    }

    #[test]
    fn test_invalid_sheet_name() {
        let options = ConvertOptions {
            sheet_name: "a/b".into(),
            ..Default::default()
        };
        let err = convert_document(&doc(json!({"rows": [["x"]]})), &options).unwrap_err();
        assert!(matches!(err, ConvertError::Sheet(Error::InvalidSheetName(_))));
    }
}
