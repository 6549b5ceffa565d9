//! Conversion options

use json2xls_core::DEFAULT_SHEET_NAME;
use json2xls_xls::XlsWriteOptions;

/// Options for converting a JSON document into a workbook
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Name of the single output sheet (default: "Sheet1")
    pub sheet_name: String,
    /// How the workbook file is written
    pub write: XlsWriteOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            write: XlsWriteOptions::default(),
        }
    }
}
