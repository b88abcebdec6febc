//! Primitive byte-order helpers.
//!
//! Header integers are big-endian and addressed by offset into an
//! in-memory demo. Checkpoint integers are little-endian and streamed
//! through `Read`/`Write`. Neither depends on host byte order.

use std::io::{self, Read, Write};

use crate::error::FormatError;

// ── Big-endian header fields ────────────────────────────────────

/// Append a big-endian u32.
pub fn put_u32_be(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// Encode a big-endian u32 into a fixed array.
pub fn u32_be_bytes(v: u32) -> [u8; 4] {
    v.to_be_bytes()
}

/// Read a big-endian u32 at `offset`.
pub fn get_u32_be(bytes: &[u8], offset: usize) -> Result<u32, FormatError> {
    let field = field(bytes, offset, 4)?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(field);
    Ok(u32::from_be_bytes(buf))
}

/// Borrow `len` bytes at `offset`, failing if the demo is too short.
pub fn field(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8], FormatError> {
    let needed = offset.saturating_add(len);
    bytes
        .get(offset..needed)
        .ok_or(FormatError::TruncatedHeader {
            needed,
            available: bytes.len(),
        })
}

// ── Little-endian stream fields ─────────────────────────────────

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn be_layout_is_most_significant_first() {
        let mut out = Vec::new();
        put_u32_be(&mut out, 0x0102_0304);
        assert_eq!(out, [1, 2, 3, 4]);
        assert_eq!(u32_be_bytes(10), [0, 0, 0, 10]);
    }

    #[test]
    fn short_field_is_truncated_header() {
        let result = get_u32_be(&[1, 2, 3], 0);
        assert_eq!(
            result,
            Err(FormatError::TruncatedHeader {
                needed: 4,
                available: 3
            })
        );
    }

    #[test]
    fn field_past_end_does_not_overflow() {
        assert!(field(&[0; 4], usize::MAX, 4).is_err());
    }

    proptest! {
        #[test]
        fn be_read_matches_write(v in any::<u32>(), pad in 0usize..8) {
            let mut out = vec![0xEE; pad];
            put_u32_be(&mut out, v);
            prop_assert_eq!(get_u32_be(&out, pad).unwrap(), v);
        }

        #[test]
        fn le_stream_read_matches_write(v in any::<u32>()) {
            let mut buf = Vec::new();
            write_u32_le(&mut buf, v).unwrap();
            prop_assert_eq!(read_u32_le(&mut buf.as_slice()).unwrap(), v);
        }
    }
}
