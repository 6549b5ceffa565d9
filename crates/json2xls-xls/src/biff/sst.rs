//! Shared String Table construction.
//!
//! Every cell string is stored once in the SST and referenced by index from
//! LABELSST records. The SST body is split into an SST record followed by as
//! many CONTINUE records as needed, each at most [`MAX_RECORD_DATA`] bytes.
//! A string header (char count + flags) never straddles a record; character
//! data may, and each continuation repeats the flags byte.
//!
//! The EXTSST record that follows indexes every `dsst`-th string by its
//! absolute stream position so readers can seek into large tables.

use ahash::AHashMap;
use json2xls_core::SharedString;

use super::push_record;
use super::records::{CONTINUE, EXTSST, MAX_RECORD_DATA, SST};
use super::strings::EncodedChars;

/// Header bytes of an SST entry: u16 char count + flags byte.
const STRING_HEADER_LEN: usize = 3;

/// Fewest strings per EXTSST bucket.
const MIN_STRINGS_PER_BUCKET: usize = 8;

/// Most buckets an EXTSST record carries.
const MAX_BUCKETS: usize = 128;

/// Collects unique cell strings in first-seen order.
#[derive(Debug, Default)]
pub struct SstBuilder {
    strings: Vec<SharedString>,
    index: AHashMap<SharedString, u32>,
    total_refs: u32,
}

impl SstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one cell reference to `text`, returning its SST index.
    pub fn add(&mut self, text: &SharedString) -> u32 {
        self.total_refs = self.total_refs.saturating_add(1);
        if let Some(&idx) = self.index.get(text.as_str()) {
            return idx;
        }
        let idx = self.strings.len() as u32;
        self.strings.push(text.clone());
        self.index.insert(text.clone(), idx);
        idx
    }

    /// Number of unique strings.
    pub fn unique_count(&self) -> usize {
        self.strings.len()
    }

    /// Number of cell references registered so far.
    pub fn total_refs(&self) -> u32 {
        self.total_refs
    }

    /// Lay the table out into SST/CONTINUE record bodies.
    pub fn build(&self) -> SstBlock {
        let mut records: Vec<Vec<u8>> = Vec::new();
        let mut starts = Vec::with_capacity(self.strings.len());

        let mut cur = Vec::with_capacity(MAX_RECORD_DATA);
        cur.extend_from_slice(&self.total_refs.to_le_bytes());
        cur.extend_from_slice(&(self.strings.len() as u32).to_le_bytes());

        for text in &self.strings {
            let enc = EncodedChars::new(text.as_str());
            let width = enc.bytes_per_char();
            let first_char = if enc.is_empty() { 0 } else { width };

            if cur.len() + STRING_HEADER_LEN + first_char > MAX_RECORD_DATA {
                records.push(std::mem::take(&mut cur));
            }

            starts.push((records.len(), cur.len()));
            cur.extend_from_slice(&(enc.len() as u16).to_le_bytes());
            cur.push(enc.flags());

            let mut pos = 0;
            loop {
                let room = (MAX_RECORD_DATA - cur.len()) / width;
                let end = enc.split_point(pos, room);
                enc.write_range(&mut cur, pos..end);
                pos = end;
                if pos == enc.len() {
                    break;
                }
                records.push(std::mem::take(&mut cur));
                cur.push(enc.flags());
            }
        }
        records.push(cur);

        SstBlock { records, starts }
    }
}

/// A laid-out SST: record bodies plus where each string's header landed.
#[derive(Debug)]
pub struct SstBlock {
    /// Body of the SST record followed by the bodies of its CONTINUE records.
    records: Vec<Vec<u8>>,
    /// `(record index, offset within that body)` of each string header.
    starts: Vec<(usize, usize)>,
}

impl SstBlock {
    /// Record bodies, SST first.
    pub fn records(&self) -> &[Vec<u8>] {
        &self.records
    }

    /// Append the SST, its CONTINUE records, and the EXTSST index to `out`.
    ///
    /// `out` must be the workbook stream itself, since EXTSST stores absolute
    /// stream positions.
    pub fn write_records(&self, out: &mut Vec<u8>) {
        let mut record_positions = Vec::with_capacity(self.records.len());
        for (i, body) in self.records.iter().enumerate() {
            record_positions.push(out.len());
            let record_type = if i == 0 { SST } else { CONTINUE };
            push_record(out, record_type, body);
        }
        push_record(out, EXTSST, &self.extsst(&record_positions));
    }

    /// Number of strings per EXTSST bucket.
    pub fn strings_per_bucket(&self) -> u16 {
        strings_per_bucket(self.starts.len())
    }

    fn extsst(&self, record_positions: &[usize]) -> Vec<u8> {
        let dsst_field = self.strings_per_bucket();
        let dsst = usize::from(dsst_field);
        let mut body = Vec::with_capacity(2 + 8 * ((self.starts.len() + dsst - 1) / dsst));
        body.extend_from_slice(&dsst_field.to_le_bytes());

        for &(record, offset) in self.starts.iter().step_by(dsst) {
            // Both offsets count the 4-byte record header
            let ib = record_positions[record] + 4 + offset;
            let cb_offset = 4 + offset;
            body.extend_from_slice(&(ib as u32).to_le_bytes());
            body.extend_from_slice(&(cb_offset as u16).to_le_bytes());
            body.extend_from_slice(&0u16.to_le_bytes());
        }
        body
    }
}

/// EXTSST bucket size for `count` strings: at least 8, at most 128 buckets.
///
/// The field is 16 bits wide. Past `128 * u16::MAX` strings the size is pinned
/// to `u16::MAX` and the index simply holds more buckets.
fn strings_per_bucket(count: usize) -> u16 {
    let size = MIN_STRINGS_PER_BUCKET.max((count + MAX_BUCKETS - 1) / MAX_BUCKETS);
    u16::try_from(size).unwrap_or(u16::MAX)
}
