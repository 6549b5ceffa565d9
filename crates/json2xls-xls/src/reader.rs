//! XLS (BIFF8) reader.
//!
//! Opens a Compound File Binary (CFB/OLE2) container, reads the `Workbook`
//! stream, parses BIFF8 records, and populates a `json2xls_core::Workbook`
//! with the text of every cell. Only string-bearing cell records are
//! understood; numbers, formulas and formatting are skipped.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use json2xls_core::{Workbook, Worksheet};

use crate::biff::parser::{read_u16, read_u32};
use crate::biff::records;
use crate::biff::strings::{parse_sst, read_short_string, read_unicode_string};
use crate::biff::{self, BiffRecord};
use crate::error::{XlsError, XlsResult};

/// XLS file reader.
pub struct XlsReader;

/// Metadata for a sheet parsed from the BOUNDSHEET record.
#[derive(Debug)]
struct SheetInfo {
    /// Absolute byte offset of the sheet's BOF in the Workbook stream.
    offset: u32,
    /// Sheet type: 0 = worksheet, 2 = chart, 6 = macro/VBA.
    sheet_type: u8,
    /// Sheet name.
    name: String,
}

impl XlsReader {
    /// Read an XLS file from a filesystem path.
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsResult<Workbook> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read(file)
    }

    /// Read an XLS file from any `Read + Seek` source.
    pub fn read<R: Read + Seek>(reader: R) -> XlsResult<Workbook> {
        let mut cfb = cfb::CompoundFile::open(reader)?;

        // BIFF5 files name the stream "Book"; the version check rejects them below
        let stream_path = if cfb.exists("/Workbook") {
            "/Workbook"
        } else if cfb.exists("/Book") {
            "/Book"
        } else {
            return Err(XlsError::InvalidFormat(
                "no Workbook or Book stream found in CFB".into(),
            ));
        };

        let mut stream_data = Vec::new();
        {
            let mut stream = cfb.open_stream(stream_path)?;
            stream.read_to_end(&mut stream_data)?;
        }

        let all_records = biff::read_all_records(&mut Cursor::new(&stream_data))?;
        log::debug!("read {} BIFF records", all_records.len());

        let (sst, sheets) = Self::parse_globals(&all_records)?;

        let mut workbook = Workbook::empty();
        for info in sheets.iter().filter(|s| s.sheet_type == 0) {
            let idx = workbook.add_worksheet_with_name(&info.name)?;
            let sheet_records = Self::sheet_records(&all_records, info)?;
            if let Some(ws) = workbook.worksheet_mut(idx) {
                Self::parse_sheet_records(sheet_records, ws, &sst)?;
            }
        }

        Ok(workbook)
    }

    /// Parse the globals substream: the SST and every BOUNDSHEET.
    fn parse_globals(all_records: &[BiffRecord]) -> XlsResult<(Vec<String>, Vec<SheetInfo>)> {
        let first = all_records
            .first()
            .filter(|r| r.record_type == records::BOF)
            .ok_or_else(|| XlsError::InvalidFormat("no workbook globals BOF found".into()))?;

        let (version, dt) = biff::parse_bof(&first.data)?;
        if dt != records::BOF_WORKBOOK_GLOBALS {
            return Err(XlsError::InvalidFormat(format!(
                "first substream has type 0x{dt:04X}, expected workbook globals"
            )));
        }
        if version != records::BIFF8_VERSION {
            return Err(XlsError::UnsupportedVersion(format!(
                "expected BIFF8 (0x0600), got 0x{version:04X}"
            )));
        }

        let mut sst = Vec::new();
        let mut sheets = Vec::new();

        for rec in &all_records[1..] {
            match rec.record_type {
                records::EOF => break,
                records::SST => {
                    sst = parse_sst(&rec.data, &rec.continue_offsets)?;
                }
                records::BOUNDSHEET => {
                    sheets.push(Self::parse_boundsheet(&rec.data)?);
                }
                _ => {}
            }
        }

        Ok((sst, sheets))
    }

    /// Parse a BOUNDSHEET record body.
    fn parse_boundsheet(data: &[u8]) -> XlsResult<SheetInfo> {
        let mut offset = 0;
        let abs_offset = read_u32(data, &mut offset)?;
        let _visibility = data.get(offset).copied().unwrap_or(0);
        offset += 1;
        let sheet_type = data.get(offset).copied().unwrap_or(0);
        offset += 1;
        let name = read_short_string(data, &mut offset)?;

        Ok(SheetInfo {
            offset: abs_offset,
            sheet_type,
            name,
        })
    }

    /// The records between a sheet's BOF (found by stream offset) and its EOF.
    fn sheet_records<'a>(
        all_records: &'a [BiffRecord],
        info: &SheetInfo,
    ) -> XlsResult<&'a [BiffRecord]> {
        let start = all_records
            .iter()
            .position(|r| r.stream_offset == info.offset as u64 && r.record_type == records::BOF)
            .ok_or_else(|| {
                XlsError::InvalidFormat(format!(
                    "sheet '{}' points at offset {} which holds no BOF record",
                    info.name, info.offset
                ))
            })?;

        let mut depth = 0usize;
        for (idx, rec) in all_records.iter().enumerate().skip(start) {
            match rec.record_type {
                records::BOF => depth += 1,
                records::EOF => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&all_records[start + 1..idx]);
                    }
                }
                _ => {}
            }
        }

        Err(XlsError::InvalidFormat(format!(
            "sheet '{}' has no closing EOF record",
            info.name
        )))
    }

    /// Parse cell records from a sheet's record group.
    fn parse_sheet_records(
        records: &[BiffRecord],
        ws: &mut Worksheet,
        sst: &[String],
    ) -> XlsResult<()> {
        for rec in records {
            match rec.record_type {
                records::LABELSST => Self::parse_labelsst(&rec.data, ws, sst)?,
                records::LABEL => Self::parse_label(&rec.data, ws)?,
                records::BLANK => Self::parse_blank(&rec.data, ws)?,
                records::MULBLANK => Self::parse_mulblank(&rec.data, ws)?,
                _ => {
                    // Skip unknown/unhandled records
                }
            }
        }

        Ok(())
    }

    // ── Cell record parsers ──────────────────────────────────────────────

    /// LABELSST: row(2) + col(2) + xf(2) + sst_index(4)
    fn parse_labelsst(data: &[u8], ws: &mut Worksheet, sst: &[String]) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)?;
        let col = read_u16(data, &mut off)?;
        let _xf_idx = read_u16(data, &mut off)?;
        let sst_idx = read_u32(data, &mut off)? as usize;

        let text = sst.get(sst_idx).ok_or_else(|| {
            XlsError::Parse(format!(
                "LABELSST index {sst_idx} out of range ({} strings)",
                sst.len()
            ))
        })?;
        ws.set_text_at(row as usize, col as usize, text)?;
        Ok(())
    }

    /// LABEL: row(2) + col(2) + xf(2) + unicode_string
    fn parse_label(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)?;
        let col = read_u16(data, &mut off)?;
        let _xf_idx = read_u16(data, &mut off)?;
        let text = read_unicode_string(data, &mut off)?;

        ws.set_text_at(row as usize, col as usize, &text)?;
        Ok(())
    }

    /// BLANK: row(2) + col(2) + xf(2)
    ///
    /// Zero-length strings are written as BLANK, so a BLANK reads back as `""`.
    fn parse_blank(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        if data.len() < 6 {
            return Ok(());
        }
        let mut off = 0;
        let row = read_u16(data, &mut off)?;
        let col = read_u16(data, &mut off)?;
        ws.set_text_at(row as usize, col as usize, "")?;
        Ok(())
    }

    /// MULBLANK: row(2) + first_col(2) + [xf(2)]* + last_col(2)
    fn parse_mulblank(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        if data.len() < 6 {
            return Ok(());
        }
        let mut off = 0;
        let row = read_u16(data, &mut off)?;
        let first_col = read_u16(data, &mut off)?;
        let last_col = u16::from_le_bytes([data[data.len() - 2], data[data.len() - 1]]);
        let xf_data_end = data.len() - 2;

        let mut col = first_col;
        while off + 2 <= xf_data_end && col <= last_col {
            let _xf_idx = read_u16(data, &mut off)?;
            ws.set_text_at(row as usize, col as usize, "")?;
            col += 1;
        }
        Ok(())
    }
}
