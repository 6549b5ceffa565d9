//! BIFF8 (Binary Interchange File Format) handling.
//!
//! This module provides the record-level abstraction for reading and writing
//! BIFF8 streams. A BIFF8 stream is a sequence of records, each with a 4-byte
//! header (2 bytes record type + 2 bytes body length) followed by the body.
//!
//! CONTINUE records (type 0x003C) extend the body of the preceding record
//! beyond the 8224-byte per-record limit.

pub mod parser;
pub mod records;
pub mod sst;
pub mod strings;

use crate::error::{XlsError, XlsResult};
use std::io::{Read, Seek};

/// A single BIFF8 record (with CONTINUE bodies already merged).
#[derive(Debug)]
pub struct BiffRecord {
    /// Record type ID (e.g. `records::SST`, `records::LABELSST`).
    pub record_type: u16,
    /// Record body bytes (CONTINUE records have been concatenated).
    pub data: Vec<u8>,
    /// Offsets in `data` where each merged CONTINUE body begins.
    pub continue_offsets: Vec<usize>,
    /// Byte offset of this record's header in the stream.
    pub stream_offset: u64,
}

/// Reads all BIFF8 records from a byte stream, merging CONTINUE records
/// into their parent.
///
/// Returns the records in order. Each record's `data` field contains the
/// full body (including any CONTINUE extensions). Zero-filled padding after
/// the last EOF reads as empty type-0 records and is skipped.
pub fn read_all_records<R: Read + Seek>(stream: &mut R) -> XlsResult<Vec<BiffRecord>> {
    let mut records: Vec<BiffRecord> = Vec::new();
    let mut header_buf = [0u8; 4];

    loop {
        let stream_offset = stream.stream_position()?;

        match stream.read_exact(&mut header_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(XlsError::Io(e)),
        }

        let record_type = u16::from_le_bytes([header_buf[0], header_buf[1]]);
        let body_len = u16::from_le_bytes([header_buf[2], header_buf[3]]) as usize;

        if record_type == 0 && body_len == 0 {
            continue;
        }

        let mut body = vec![0u8; body_len];
        if body_len > 0 {
            stream.read_exact(&mut body)?;
        }

        if record_type == records::CONTINUE {
            if let Some(prev) = records.last_mut() {
                prev.continue_offsets.push(prev.data.len());
                prev.data.extend_from_slice(&body);
            } else {
                log::debug!("dropping orphaned CONTINUE at offset {stream_offset}");
            }
        } else {
            records.push(BiffRecord {
                record_type,
                data: body,
                continue_offsets: Vec::new(),
                stream_offset,
            });
        }
    }

    Ok(records)
}

/// Extract the BOF record fields from a record body.
///
/// Returns `(version, substream_type)`.
/// - `version` should be `0x0600` for BIFF8
/// - `substream_type`: 0x0005 = workbook globals, 0x0010 = worksheet, etc.
pub fn parse_bof(data: &[u8]) -> XlsResult<(u16, u16)> {
    if data.len() < 4 {
        return Err(XlsError::InvalidFormat("BOF record too short".into()));
    }
    let version = u16::from_le_bytes([data[0], data[1]]);
    let dt = u16::from_le_bytes([data[2], data[3]]);
    Ok((version, dt))
}

/// Append one record (header + body) to `out`.
///
/// Callers keep bodies within [`records::MAX_RECORD_DATA`]; longer payloads
/// must be split into CONTINUE records first.
pub fn push_record(out: &mut Vec<u8>, record_type: u16, body: &[u8]) {
    debug_assert!(body.len() <= records::MAX_RECORD_DATA);
    out.extend_from_slice(&record_type.to_le_bytes());
    out.extend_from_slice(&(body.len() as u16).to_le_bytes());
    out.extend_from_slice(body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_continue_offsets_are_recorded() {
        let mut stream = Vec::new();
        push_record(&mut stream, records::SST, &[1, 2, 3]);
        push_record(&mut stream, records::CONTINUE, &[4, 5]);
        push_record(&mut stream, records::CONTINUE, &[6]);
        push_record(&mut stream, records::EOF, &[]);

        let recs = read_all_records(&mut Cursor::new(stream)).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].data, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(recs[0].continue_offsets, vec![3, 5]);
        assert_eq!(recs[1].record_type, records::EOF);
        assert_eq!(recs[1].stream_offset, 4 + 3 + 4 + 2 + 4 + 1);
    }

    #[test]
    fn test_zero_padding_is_skipped() {
        let mut stream = Vec::new();
        push_record(&mut stream, records::EOF, &[]);
        stream.resize(64, 0);

        let recs = read_all_records(&mut Cursor::new(stream)).unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_parse_bof() {
        let body = [0x00, 0x06, 0x10, 0x00];
        assert_eq!(parse_bof(&body).unwrap(), (0x0600, 0x0010));
        assert!(parse_bof(&body[..2]).is_err());
    }
}
