//! BIFF8 Unicode string encoding and decoding.
//!
//! BIFF8 strings have a complex encoding:
//! - Header: char_count (2 bytes, or 1 byte for "short" strings) + flags (1 byte)
//! - Flags bit 0 (`fHighByte`): 0 = compressed Latin-1, 1 = uncompressed UTF-16LE
//! - Flags bit 2 (`fExtSt`): extended string data follows (Asian phonetic)
//! - Flags bit 3 (`fRichSt`): rich text run array follows
//! - If fRichSt: 2-byte run count follows the flags
//! - If fExtSt: 4-byte extended data size follows
//! - Then the character data
//! - Then the rich text runs (4 bytes each) if fRichSt
//! - Then the extended data if fExtSt
//!
//! Character counts are UTF-16 code units, not Unicode scalar values.
//!
//! In SST records, character data can span CONTINUE records. Every
//! continuation that resumes character data starts with a fresh flags byte,
//! so the encoding may switch between compressed and uncompressed mid-string.

use std::ops::Range;

use super::parser::{read_u16, read_u32, read_u8, skip};
use crate::error::{XlsError, XlsResult};

/// Most UTF-16 code units a single BIFF8 cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

const FLAG_HIGH_BYTE: u8 = 0x01;
const FLAG_EXT: u8 = 0x04;
const FLAG_RICH: u8 = 0x08;

// ── Encoding ────────────────────────────────────────────────────────────

/// A string converted to UTF-16 code units, ready to be written as BIFF8
/// character data.
///
/// Strings whose code units all fit in one byte are written compressed
/// (Latin-1, one byte per char); anything else is written as UTF-16LE.
#[derive(Debug, Clone)]
pub struct EncodedChars {
    units: Vec<u16>,
    compressed: bool,
}

impl EncodedChars {
    pub fn new(text: &str) -> Self {
        let units: Vec<u16> = text.encode_utf16().collect();
        let compressed = units.iter().all(|&u| u <= 0xFF);
        Self { units, compressed }
    }

    /// Number of UTF-16 code units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The flags byte for this string's header (and for every continuation).
    pub fn flags(&self) -> u8 {
        if self.compressed {
            0
        } else {
            FLAG_HIGH_BYTE
        }
    }

    pub fn bytes_per_char(&self) -> usize {
        if self.compressed {
            1
        } else {
            2
        }
    }

    /// Largest end index `<= start + max_units` that does not split a
    /// surrogate pair.
    pub fn split_point(&self, start: usize, max_units: usize) -> usize {
        let end = start.saturating_add(max_units).min(self.units.len());
        if end > start && end < self.units.len() && is_high_surrogate(self.units[end - 1]) {
            end - 1
        } else {
            end
        }
    }

    /// Append the character data for `range` (no header).
    pub fn write_range(&self, out: &mut Vec<u8>, range: Range<usize>) {
        let units = &self.units[range];
        if self.compressed {
            out.extend(units.iter().map(|&u| u as u8));
        } else {
            for &u in units {
                out.extend_from_slice(&u.to_le_bytes());
            }
        }
    }
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Write a BIFF8 "short" string (1-byte length prefix, used in BOUNDSHEET and FONT).
pub fn write_short_string(out: &mut Vec<u8>, text: &str) -> XlsResult<()> {
    let enc = EncodedChars::new(text);
    let len = u8::try_from(enc.len()).map_err(|_| {
        XlsError::InvalidFormat(format!(
            "short string has {} characters (max 255)",
            enc.len()
        ))
    })?;
    out.push(len);
    out.push(enc.flags());
    enc.write_range(out, 0..enc.len());
    Ok(())
}

/// Write a BIFF8 Unicode string with a 2-byte length prefix (LABEL layout).
pub fn write_unicode_string(out: &mut Vec<u8>, text: &str) -> XlsResult<()> {
    let enc = EncodedChars::new(text);
    let len = u16::try_from(enc.len()).map_err(|_| {
        XlsError::InvalidFormat(format!(
            "string has {} characters (max 65535)",
            enc.len()
        ))
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.push(enc.flags());
    enc.write_range(out, 0..enc.len());
    Ok(())
}

// ── Decoding ────────────────────────────────────────────────────────────

/// Read a BIFF8 "short" string (1-byte length prefix, used in BOUNDSHEET etc.).
pub fn read_short_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    let char_count = read_u8(data, offset)? as usize;
    let flags = read_u8(data, offset)?;
    read_character_data(data, offset, char_count, flags, &[])
}

/// Read a BIFF8 Unicode string with a 2-byte length prefix (used in LABEL).
///
/// This does NOT handle CONTINUE boundaries; use [`parse_sst`] for SST
/// records that may span continuations.
pub fn read_unicode_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    read_string_at(data, offset, &[])
}

/// Read one 2-byte-prefixed string whose character data may cross any of
/// `boundaries` (offsets in `data` where a CONTINUE body begins).
fn read_string_at(data: &[u8], offset: &mut usize, boundaries: &[usize]) -> XlsResult<String> {
    let char_count = read_u16(data, offset)? as usize;
    let flags = read_u8(data, offset)?;

    let is_rich = (flags & FLAG_RICH) != 0;
    let has_ext = (flags & FLAG_EXT) != 0;

    let run_count = if is_rich { read_u16(data, offset)? } else { 0 };
    let ext_size = if has_ext { read_u32(data, offset)? } else { 0 };

    let text = read_character_data(data, offset, char_count, flags, boundaries)?;

    // Rich text runs are 4 bytes each: char_pos u16 + font_idx u16
    if is_rich {
        skip(data, offset, run_count as usize * 4)?;
    }
    if has_ext {
        skip(data, offset, ext_size as usize)?;
    }

    Ok(text)
}

/// Read `char_count` characters, re-reading the flags byte whenever the
/// data crosses into a CONTINUE body.
fn read_character_data(
    data: &[u8],
    offset: &mut usize,
    char_count: usize,
    mut flags: u8,
    boundaries: &[usize],
) -> XlsResult<String> {
    let mut units: Vec<u16> = Vec::with_capacity(char_count);

    while units.len() < char_count {
        if boundaries.binary_search(&*offset).is_ok() {
            flags = read_u8(data, offset)?;
        }

        let fragment_end = next_boundary(boundaries, *offset).unwrap_or(data.len());
        let is_wide = (flags & FLAG_HIGH_BYTE) != 0;
        let width = if is_wide { 2 } else { 1 };
        let available = fragment_end.saturating_sub(*offset) / width;
        let take = available.min(char_count - units.len());
        if take == 0 {
            return Err(XlsError::Parse(format!(
                "string data too short: need {} more characters at offset {}",
                char_count - units.len(),
                *offset
            )));
        }

        let bytes = &data[*offset..*offset + take * width];
        if is_wide {
            units.extend(
                bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]])),
            );
        } else {
            units.extend(bytes.iter().map(|&b| b as u16));
        }
        *offset += take * width;
    }

    String::from_utf16(&units).map_err(|e| XlsError::Parse(format!("invalid UTF-16 string: {e}")))
}

fn next_boundary(boundaries: &[usize], offset: usize) -> Option<usize> {
    let idx = boundaries.partition_point(|&b| b <= offset);
    boundaries.get(idx).copied()
}

/// Parse the entire SST (Shared String Table) from a concatenated buffer
/// (SST body + all CONTINUE bodies already joined).
///
/// `boundaries` holds the offsets in `data` where each CONTINUE body starts.
///
/// The SST body starts with:
/// - `total_strings` (4 bytes, u32): total string refs in workbook
/// - `unique_strings` (4 bytes, u32): number of unique strings in this table
/// - Then `unique_strings` Unicode string entries
pub fn parse_sst(data: &[u8], boundaries: &[usize]) -> XlsResult<Vec<String>> {
    let mut offset = 0;

    let _total_strings = read_u32(data, &mut offset)?;
    let unique_count = read_u32(data, &mut offset)? as usize;

    let mut strings = Vec::with_capacity(unique_count.min(data.len()));

    for i in 0..unique_count {
        match read_string_at(data, &mut offset, boundaries) {
            Ok(s) => strings.push(s),
            Err(e) => {
                // Some XLS files have SST padding or truncation issues.
                log::warn!("SST parse error at string {i}/{unique_count}: {e}");
                break;
            }
        }
    }

    Ok(strings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_compressed_string() {
        // char_count = 3 (u16 LE), flags = 0x00, data = "ABC"
        let data = [0x03, 0x00, 0x00, b'A', b'B', b'C'];
        let mut offset = 0;
        let s = read_unicode_string(&data, &mut offset).unwrap();
        assert_eq!(s, "ABC");
        assert_eq!(offset, 6);
    }

    #[test]
    fn test_read_wide_string() {
        // char_count = 2 (u16 LE), flags = 0x01, data = H\0i\0
        let data = [0x02, 0x00, 0x01, b'H', 0x00, b'i', 0x00];
        let mut offset = 0;
        let s = read_unicode_string(&data, &mut offset).unwrap();
        assert_eq!(s, "Hi");
        assert_eq!(offset, 7);
    }

    #[test]
    fn test_read_rich_string_skips_runs() {
        // "Ab" with one rich text run
        let data = [0x02, 0x00, 0x08, 0x01, 0x00, b'A', b'b', 0, 0, 1, 0, 0xAA];
        let mut offset = 0;
        let s = read_unicode_string(&data, &mut offset).unwrap();
        assert_eq!(s, "Ab");
        assert_eq!(offset, 11);
    }

    #[test]
    fn test_short_string_roundtrip() {
        let mut buf = Vec::new();
        write_short_string(&mut buf, "Sheet1").unwrap();
        assert_eq!(&buf[..2], &[6, 0]);

        let mut offset = 0;
        assert_eq!(read_short_string(&buf, &mut offset).unwrap(), "Sheet1");
        assert_eq!(offset, buf.len());
    }

    #[test]
    fn test_short_string_too_long() {
        let mut buf = Vec::new();
        assert!(write_short_string(&mut buf, &"x".repeat(256)).is_err());
    }

    #[test]
    fn test_unicode_string_uses_wide_encoding() {
        let mut buf = Vec::new();
        write_unicode_string(&mut buf, "Zoë €").unwrap();
        // "€" is above 0xFF, so the whole string goes out as UTF-16LE
        assert_eq!(buf[2], 0x01);
        assert_eq!(buf.len(), 3 + 5 * 2);

        let mut offset = 0;
        assert_eq!(read_unicode_string(&buf, &mut offset).unwrap(), "Zoë €");
    }

    #[test]
    fn test_latin1_stays_compressed() {
        let enc = EncodedChars::new("café");
        assert_eq!(enc.flags(), 0);
        assert_eq!(enc.bytes_per_char(), 1);
        assert_eq!(enc.len(), 4);
    }

    #[test]
    fn test_split_point_keeps_surrogate_pairs() {
        // "a😀b" is a, high, low, b
        let enc = EncodedChars::new("a😀b");
        assert_eq!(enc.len(), 4);
        assert_eq!(enc.split_point(0, 2), 1);
        assert_eq!(enc.split_point(0, 3), 3);
        assert_eq!(enc.split_point(1, 10), 4);
    }

    #[test]
    fn test_parse_sst() {
        // SST with 2 total refs, 2 unique strings: "A" and "BC"
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&[0x01, 0x00, 0x00, b'A']);
        buf.extend_from_slice(&[0x02, 0x00, 0x00, b'B', b'C']);

        let strings = parse_sst(&buf, &[]).unwrap();
        assert_eq!(strings, vec!["A", "BC"]);
    }

    #[test]
    fn test_parse_sst_across_continue_with_encoding_switch() {
        // "ABCD" split after "AB"; the continuation switches to UTF-16
        let mut buf = Vec::new();
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&[0x04, 0x00, 0x00, b'A', b'B']);
        let boundary = buf.len();
        buf.extend_from_slice(&[0x01, b'C', 0x00, b'D', 0x00]);

        let strings = parse_sst(&buf, &[boundary]).unwrap();
        assert_eq!(strings, vec!["ABCD"]);
    }

    #[test]
    fn test_parse_sst_string_starting_at_continue() {
        // A new string that begins exactly at a CONTINUE has no extra flags byte
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&[0x01, 0x00, 0x00, b'A']);
        let boundary = buf.len();
        buf.extend_from_slice(&[0x01, 0x00, 0x00, b'Z']);

        let strings = parse_sst(&buf, &[boundary]).unwrap();
        assert_eq!(strings, vec!["A", "Z"]);
    }

    #[test]
    fn test_truncated_string_is_an_error() {
        let data = [0x05, 0x00, 0x00, b'A', b'B'];
        let mut offset = 0;
        assert!(read_unicode_string(&data, &mut offset).is_err());
    }
}
