//! XLS (BIFF8) writer.
//!
//! Lays out a `Workbook` stream (globals substream followed by one substream
//! per sheet) and wraps it in a Compound File Binary container. Every cell is
//! written as text: non-empty strings as LABELSST records pointing into the
//! Shared String Table, zero-length strings as BLANK records.

use std::io::{Cursor, Write};
use std::path::Path;

use json2xls_core::{CellAddress, CellValue, Workbook, Worksheet, MAX_ROWS};

use crate::biff::push_record;
use crate::biff::records;
use crate::biff::sst::SstBuilder;
use crate::biff::strings::{write_short_string, EncodedChars, MAX_CELL_CHARS};
use crate::error::{XlsError, XlsResult};
use crate::options::XlsWriteOptions;

/// Style XFs every BIFF8 workbook carries before its cell XFs.
const STYLE_XF_COUNT: u16 = 15;

/// XF index applied to every cell (the first cell XF).
const CELL_XF: u16 = STYLE_XF_COUNT;

/// Excel expects FONT index 4 to exist, so the default font is written five times.
const FONT_COUNT: usize = 5;

/// XLS file writer
pub struct XlsWriter;

impl XlsWriter {
    /// Write a workbook to a file path with default options
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsResult<()> {
        Self::write_file_with_options(workbook, path, &XlsWriteOptions::default())
    }

    /// Write a workbook to a file path
    ///
    /// The whole file is serialised in memory first, so validation errors
    /// never touch the destination.
    pub fn write_file_with_options<P: AsRef<Path>>(
        workbook: &Workbook,
        path: P,
        options: &XlsWriteOptions,
    ) -> XlsResult<()> {
        let path = path.as_ref();
        let bytes = Self::to_bytes(workbook, options)?;

        if options.atomic {
            Self::persist_atomically(path, &bytes)?;
        } else {
            std::fs::write(path, &bytes)?;
        }

        log::info!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Write a workbook to a writer
    pub fn write<W: Write>(
        workbook: &Workbook,
        mut writer: W,
        options: &XlsWriteOptions,
    ) -> XlsResult<()> {
        let bytes = Self::to_bytes(workbook, options)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialise a workbook to the bytes of a complete `.xls` file
    pub fn to_bytes(workbook: &Workbook, options: &XlsWriteOptions) -> XlsResult<Vec<u8>> {
        let mut stream = Self::build_workbook_stream(workbook)?;
        if stream.len() < options.min_stream_len {
            // Streams under the CFB mini-stream cutoff confuse some readers
            stream.resize(options.min_stream_len, 0);
        }

        let cursor = Cursor::new(Vec::new());
        let mut ole = cfb::CompoundFile::create_with_version(cfb::Version::V3, cursor)?;
        {
            let mut out = ole.create_stream("Workbook")?;
            out.write_all(&stream)?;
            out.flush()?;
        }
        ole.flush()?;
        Ok(ole.into_inner().into_inner())
    }

    /// Write to a temporary file in the destination directory, then rename it
    /// over `path`. On failure the temporary file is removed and `path` is
    /// left untouched.
    ///
    /// The saved file gets the permissions a plain create would give it, or
    /// those of the file it replaces.
    fn persist_atomically(path: &Path, bytes: &[u8]) -> XlsResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".json2xls-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Opened with 0o666 so the umask applies, as for `fs::write`
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;

        if let Ok(existing) = std::fs::metadata(path) {
            tmp.as_file().set_permissions(existing.permissions())?;
        }

        match tmp.persist(path) {
            Ok(_) => Ok(()),
            Err(err) if err.error.kind() == std::io::ErrorKind::AlreadyExists => {
                // Rename does not replace on some platforms and filesystems
                log::debug!("{} exists, removing before rename", path.display());
                let _ = std::fs::remove_file(path);
                err.file.persist(path).map(|_| ()).map_err(|e| XlsError::Io(e.error))
            }
            Err(err) => Err(XlsError::Io(err.error)),
        }
    }

    // ── Stream layout ────────────────────────────────────────────────────

    /// Build the raw BIFF8 `Workbook` stream (no CFB wrapper, no padding)
    pub fn build_workbook_stream(workbook: &Workbook) -> XlsResult<Vec<u8>> {
        if workbook.is_empty() {
            return Err(XlsError::NoWorksheets);
        }

        // Sheet substreams come first so the SST knows every string
        let mut sst = SstBuilder::new();
        let mut sheet_streams = Vec::with_capacity(workbook.sheet_count());
        for (idx, sheet) in workbook.worksheets().enumerate() {
            sheet_streams.push(Self::build_sheet_stream(sheet, idx == 0, &mut sst)?);
        }

        let mut globals = Vec::new();
        push_record(&mut globals, records::BOF, &bof(records::BOF_WORKBOOK_GLOBALS));
        push_record(
            &mut globals,
            records::CODEPAGE,
            &records::CODEPAGE_UTF16.to_le_bytes(),
        );
        push_record(&mut globals, records::WINDOW1, &window1());
        push_record(&mut globals, records::DATEMODE, &0u16.to_le_bytes());

        let font_body = font("Arial")?;
        for _ in 0..FONT_COUNT {
            push_record(&mut globals, records::FONT, &font_body);
        }

        push_record(&mut globals, records::XF, &xf_record(0xFFF5, 0x00));
        for _ in 1..STYLE_XF_COUNT {
            push_record(&mut globals, records::XF, &xf_record(0xFFF5, 0xF4));
        }
        push_record(&mut globals, records::XF, &xf_record(0x0001, 0x00));

        // Built-in "Normal" style bound to XF 0
        push_record(&mut globals, records::STYLE, &[0x00, 0x80, 0x00, 0xFF]);

        let mut offset_positions = Vec::with_capacity(sheet_streams.len());
        for sheet in workbook.worksheets() {
            let body = boundsheet(sheet.name())?;
            // The stream offset is the first field of the body
            offset_positions.push(globals.len() + 4);
            push_record(&mut globals, records::BOUNDSHEET, &body);
        }

        let block = sst.build();
        log::debug!(
            "SST: {} unique strings, {} references, {} records",
            sst.unique_count(),
            sst.total_refs(),
            block.records().len()
        );
        block.write_records(&mut globals);

        push_record(&mut globals, records::EOF, &[]);

        let mut sheet_offset = globals.len();
        for (pos, sheet_stream) in offset_positions.iter().zip(&sheet_streams) {
            let offset = u32::try_from(sheet_offset).map_err(|_| {
                XlsError::InvalidFormat("workbook stream exceeds 4 GiB".into())
            })?;
            globals[*pos..*pos + 4].copy_from_slice(&offset.to_le_bytes());
            sheet_offset += sheet_stream.len();
        }

        let mut stream = globals;
        for sheet_stream in sheet_streams {
            stream.extend_from_slice(&sheet_stream);
        }
        Ok(stream)
    }

    /// Build one worksheet substream, registering its strings in `sst`
    fn build_sheet_stream(
        sheet: &Worksheet,
        is_first: bool,
        sst: &mut SstBuilder,
    ) -> XlsResult<Vec<u8>> {
        let mut out = Vec::new();
        push_record(&mut out, records::BOF, &bof(records::BOF_WORKSHEET));
        push_record(&mut out, records::DIMENSION, &dimension(sheet));

        for (row, col, cell) in sheet.iter_cells() {
            let rw = u16::try_from(row)
                .map_err(|_| json2xls_core::Error::RowOutOfBounds(row, MAX_ROWS - 1))?;

            let mut body = Vec::with_capacity(10);
            body.extend_from_slice(&rw.to_le_bytes());
            body.extend_from_slice(&col.to_le_bytes());
            body.extend_from_slice(&CELL_XF.to_le_bytes());

            match &cell.value {
                CellValue::String(text) if !text.is_empty() => {
                    let chars = EncodedChars::new(text.as_str()).len();
                    if chars > MAX_CELL_CHARS {
                        return Err(XlsError::StringTooLong {
                            sheet: sheet.name().to_string(),
                            cell: CellAddress::new(row, col),
                            chars,
                            max: MAX_CELL_CHARS,
                        });
                    }
                    let isst = sst.add(text);
                    body.extend_from_slice(&isst.to_le_bytes());
                    push_record(&mut out, records::LABELSST, &body);
                }
                _ => push_record(&mut out, records::BLANK, &body),
            }
        }

        push_record(&mut out, records::WINDOW2, &window2(is_first));
        push_record(&mut out, records::EOF, &[]);

        log::debug!(
            "sheet '{}': {} cells, {} bytes",
            sheet.name(),
            sheet.cell_count(),
            out.len()
        );
        Ok(out)
    }
}

// ── Record bodies ────────────────────────────────────────────────────────

fn bof(dt: u16) -> [u8; 16] {
    // [0..2] version, [2..4] substream type, then build/year and
    // file-history/lowest-version flags
    let mut out = [0u8; 16];
    out[0..2].copy_from_slice(&records::BIFF8_VERSION.to_le_bytes());
    out[2..4].copy_from_slice(&dt.to_le_bytes());
    out[4..6].copy_from_slice(&0x0DBBu16.to_le_bytes()); // build
    out[6..8].copy_from_slice(&0x07CCu16.to_le_bytes()); // year (1996)
    out[12..16].copy_from_slice(&6u32.to_le_bytes()); // lowest BIFF version
    out
}

fn window1() -> [u8; 18] {
    let mut out = [0u8; 18];
    out[0..2].copy_from_slice(&0x01E0u16.to_le_bytes()); // xWn
    out[2..4].copy_from_slice(&0x005Au16.to_le_bytes()); // yWn
    out[4..6].copy_from_slice(&0x3FCFu16.to_le_bytes()); // dxWn
    out[6..8].copy_from_slice(&0x2A4Eu16.to_le_bytes()); // dyWn
    out[8..10].copy_from_slice(&0x0038u16.to_le_bytes()); // scrollbars + tabs visible
    // itabCur = 0, itabFirst = 0
    out[14..16].copy_from_slice(&1u16.to_le_bytes()); // ctabsel
    out[16..18].copy_from_slice(&600u16.to_le_bytes()); // wTabRatio
    out
}

fn font(name: &str) -> XlsResult<Vec<u8>> {
    let mut out = Vec::with_capacity(14 + 2 + name.len());
    out.extend_from_slice(&200u16.to_le_bytes()); // height in twips (10pt)
    out.extend_from_slice(&0u16.to_le_bytes()); // grbit
    out.extend_from_slice(&0x7FFFu16.to_le_bytes()); // icv: window text
    out.extend_from_slice(&400u16.to_le_bytes()); // bls: normal weight
    out.extend_from_slice(&0u16.to_le_bytes()); // sss
    out.extend_from_slice(&[0, 0, 0, 0]); // uls, family, charset, reserved
    write_short_string(&mut out, name)?;
    Ok(out)
}

fn xf_record(flags: u16, used_attributes: u8) -> [u8; 20] {
    let mut out = [0u8; 20];
    // ifnt = 0, ifmt = 0 (General)
    out[4..6].copy_from_slice(&flags.to_le_bytes());
    out[6] = 0x20; // General + Bottom
    out[9] = used_attributes;
    out[18..20].copy_from_slice(&0x20C0u16.to_le_bytes()); // default fore/back colors
    out
}

fn boundsheet(name: &str) -> XlsResult<Vec<u8>> {
    let mut out = Vec::with_capacity(8 + name.len() * 2);
    out.extend_from_slice(&0u32.to_le_bytes()); // patched once the globals are laid out
    out.push(0); // visible
    out.push(0); // worksheet
    write_short_string(&mut out, name)?;
    Ok(out)
}

fn dimension(sheet: &Worksheet) -> [u8; 14] {
    let mut out = [0u8; 14];
    if let Some(range) = sheet.used_range() {
        out[0..4].copy_from_slice(&range.start.row.to_le_bytes());
        out[4..8].copy_from_slice(&(range.end.row + 1).to_le_bytes());
        out[8..10].copy_from_slice(&range.start.col.to_le_bytes());
        out[10..12].copy_from_slice(&(range.end.col + 1).to_le_bytes());
    }
    out
}

fn window2(is_first: bool) -> [u8; 18] {
    let mut out = [0u8; 18];
    // gridlines, headers, zeros, default header color, outline symbols;
    // the first sheet is also selected and active
    let grbit: u16 = if is_first { 0x06B6 } else { 0x00B6 };
    out[0..2].copy_from_slice(&grbit.to_le_bytes());
    out[6..8].copy_from_slice(&0x0040u16.to_le_bytes()); // icvHdr
    out
}
