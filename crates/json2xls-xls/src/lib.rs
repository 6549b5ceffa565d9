//! # json2xls-xls
//!
//! XLS (BIFF8) reader and writer for json2xls.
//!
//! This crate handles the legacy Excel binary format (.xls): a Compound File
//! Binary container holding a single `Workbook` stream of BIFF8 records.
//! Cell text goes through the Shared String Table, which lets a cell carry up
//! to [`MAX_CELL_CHARS`] characters.

pub mod biff;
pub mod error;
pub mod options;
pub mod reader;
pub mod writer;

pub use biff::strings::MAX_CELL_CHARS;
pub use error::{XlsError, XlsResult};
pub use options::XlsWriteOptions;
pub use reader::XlsReader;
pub use writer::XlsWriter;
