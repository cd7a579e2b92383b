//! Unsigned varint codec and a bounded byte reader
//!
//! Varints are little-endian base-128: seven payload bits per byte, high bit
//! set on every byte except the last. A u64 never needs more than
//! [`MAX_UVARINT_LEN`] bytes.

use crate::errors::{CodecError, CodecResult};

/// Longest encoding of a u64
pub const MAX_UVARINT_LEN: usize = 10;

/// Append the varint encoding of `value` to `out`
pub fn encode_uvarint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Decode one varint from the front of `bytes`
///
/// Returns the value and the number of bytes consumed.
pub fn decode_uvarint(bytes: &[u8]) -> CodecResult<(u64, usize)> {
    let mut value = 0u64;
    for (index, &byte) in bytes.iter().enumerate().take(MAX_UVARINT_LEN) {
        // The tenth byte may only carry the top bit of a u64.
        if index == MAX_UVARINT_LEN - 1 && byte > 1 {
            return Err(CodecError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7f) << (7 * index);
        if byte & 0x80 == 0 {
            return Ok((value, index + 1));
        }
    }
    Err(CodecError::Truncated { needed: 1 })
}

/// Cursor over a payload that refuses to read past the end
#[derive(Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn uvarint(&mut self) -> CodecResult<u64> {
        let (value, used) = decode_uvarint(&self.bytes[self.pos..])?;
        self.pos += used;
        Ok(value)
    }

    /// Read a varint length prefix, capped at `max`
    pub fn length(&mut self, max: usize) -> CodecResult<usize> {
        let len = self.uvarint()?;
        match usize::try_from(len) {
            Ok(n) if n <= max => Ok(n),
            _ => Err(CodecError::LengthLimit { len, max }),
        }
    }

    pub fn take(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::Truncated {
                needed: n - self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn take_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Succeeds only if the whole payload was consumed
    pub fn finish(self) -> CodecResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_uvarint(value, &mut out);
        out
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(127), vec![0x7f]);
        assert_eq!(encoded(128), vec![0x80, 0x01]);
        assert_eq!(encoded(300), vec![0xac, 0x02]);
    }

    #[test]
    fn test_max_value_uses_ten_bytes() {
        let bytes = encoded(u64::MAX);
        assert_eq!(bytes.len(), MAX_UVARINT_LEN);
        assert_eq!(*bytes.last().unwrap(), 0x01);
        assert_eq!(decode_uvarint(&bytes).unwrap(), (u64::MAX, MAX_UVARINT_LEN));
    }

    #[test]
    fn test_encode_appends_to_prefix() {
        let mut out = vec![0xff];
        encode_uvarint(300, &mut out);
        assert_eq!(out, vec![0xff, 0xac, 0x02]);
    }

    #[test]
    fn test_decode_stops_at_terminal_byte() {
        let (value, used) = decode_uvarint(&[0xac, 0x02, 0x05]).unwrap();
        assert_eq!(value, 300);
        assert_eq!(used, 2);
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(decode_uvarint(&[]), Err(CodecError::Truncated { needed: 1 }));
        assert_eq!(
            decode_uvarint(&[0x80, 0x80]),
            Err(CodecError::Truncated { needed: 1 })
        );
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let mut bytes = vec![0xff; 9];
        bytes.push(0x02);
        assert_eq!(decode_uvarint(&bytes), Err(CodecError::VarintOverflow));

        let too_long = vec![0x80; 11];
        assert_eq!(decode_uvarint(&too_long), Err(CodecError::VarintOverflow));
    }

    #[test]
    fn test_reader_sequence() {
        let mut payload = Vec::new();
        encode_uvarint(3, &mut payload);
        payload.extend_from_slice(b"abc");
        encode_uvarint(1_000_000, &mut payload);

        let mut reader = ByteReader::new(&payload);
        let len = reader.length(8).unwrap();
        assert_eq!(reader.take(len).unwrap(), b"abc");
        assert_eq!(reader.uvarint().unwrap(), 1_000_000);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_reader_limits() {
        let mut payload = Vec::new();
        encode_uvarint(9, &mut payload);
        let mut reader = ByteReader::new(&payload);
        assert_eq!(
            reader.length(8),
            Err(CodecError::LengthLimit { len: 9, max: 8 })
        );

        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert_eq!(reader.take(5), Err(CodecError::Truncated { needed: 2 }));
        let _ = reader.take(1).unwrap();
        assert_eq!(reader.finish(), Err(CodecError::TrailingBytes(2)));
    }
}
