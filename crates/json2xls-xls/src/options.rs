//! XLS writer options

/// Options for writing XLS files
#[derive(Debug, Clone)]
pub struct XlsWriteOptions {
    /// Write to a temporary file next to the destination and rename it into
    /// place, so a failed save never leaves a truncated file (default: true)
    pub atomic: bool,
    /// Minimum size of the `Workbook` stream in bytes; shorter streams are
    /// zero-padded after the final EOF record (default: 4096)
    pub min_stream_len: usize,
}

impl Default for XlsWriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            min_stream_len: 4096,
        }
    }
}
