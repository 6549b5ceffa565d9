//! Prelude module - common imports for json2xls users
//!
//! ```rust
//! use json2xls::prelude::*;
//! ```

pub use crate::{
    // Conversion
    cell_text,
    convert,
    convert_document,
    convert_with_options,
    ConvertError,
    ConvertOptions,
    InputDocument,

    // Workbook model
    CellAddress,
    Workbook,
    Worksheet,

    // I/O types
    XlsReader,
    XlsWriteOptions,
    XlsWriter,
};
