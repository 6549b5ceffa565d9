//! Low-level binary parsing helpers for BIFF8 records.
//!
//! All multi-byte integers in BIFF8 are little-endian.

use crate::error::{XlsError, XlsResult};

/// Read a `u8` from a byte slice at `offset`, advancing `offset`.
#[inline]
pub fn read_u8(data: &[u8], offset: &mut usize) -> XlsResult<u8> {
    if *offset >= data.len() {
        return Err(XlsError::Parse(format!(
            "unexpected end of data at offset {}, need 1 byte",
            *offset
        )));
    }
    let v = data[*offset];
    *offset += 1;
    Ok(v)
}

/// Read a `u16` (little-endian) from a byte slice at `offset`, advancing `offset`.
#[inline]
pub fn read_u16(data: &[u8], offset: &mut usize) -> XlsResult<u16> {
    if *offset + 2 > data.len() {
        return Err(XlsError::Parse(format!(
            "unexpected end of data at offset {}, need 2 bytes",
            *offset
        )));
    }
    let v = u16::from_le_bytes([data[*offset], data[*offset + 1]]);
    *offset += 2;
    Ok(v)
}

/// Read a `u32` (little-endian) from a byte slice at `offset`, advancing `offset`.
#[inline]
pub fn read_u32(data: &[u8], offset: &mut usize) -> XlsResult<u32> {
    if *offset + 4 > data.len() {
        return Err(XlsError::Parse(format!(
            "unexpected end of data at offset {}, need 4 bytes",
            *offset
        )));
    }
    let v = u32::from_le_bytes([
        data[*offset],
        data[*offset + 1],
        data[*offset + 2],
        data[*offset + 3],
    ]);
    *offset += 4;
    Ok(v)
}

/// Skip `n` bytes, failing if fewer remain.
#[inline]
pub fn skip(data: &[u8], offset: &mut usize, n: usize) -> XlsResult<()> {
    if *offset + n > data.len() {
        return Err(XlsError::Parse(format!(
            "unexpected end of data at offset {}, need {} bytes",
            *offset, n
        )));
    }
    *offset += n;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16() {
        let data = [0x34, 0x12];
        let mut off = 0;
        assert_eq!(read_u16(&data, &mut off).unwrap(), 0x1234);
        assert_eq!(off, 2);
    }

    #[test]
    fn test_read_u32() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xFF];
        let mut off = 0;
        assert_eq!(read_u32(&data, &mut off).unwrap(), 0x1234_5678);
        assert_eq!(off, 4);
    }

    #[test]
    fn test_read_past_end() {
        let data = [0x01];
        let mut off = 0;
        assert!(read_u16(&data, &mut off).is_err());
        assert_eq!(off, 0);
        assert_eq!(read_u8(&data, &mut off).unwrap(), 1);
        assert!(read_u8(&data, &mut off).is_err());
        assert!(skip(&data, &mut off, 1).is_err());
    }
}
