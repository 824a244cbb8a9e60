//! Forward-only binary reading from byte slices.
//!
//! This module provides [`BinaryReader`], a cursor over an in-memory buffer.
//! Packed sections are decoded in a single forward pass, so the reader only
//! tracks its position and moves toward the end of the buffer.

use zerocopy::byteorder::little_endian::{F32, I16, I32, I64, U16, U32};
use zerocopy::FromBytes;

use crate::{Error, Result};

/// A sequential little-endian reader over a byte slice.
///
/// # Example
///
/// ```
/// use packedxml_common::BinaryReader;
///
/// let data = [0x2a, 0x00, 0x45, 0x4e, 0xa1, 0x62];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u16().unwrap(), 42);
/// assert_eq!(reader.read_u32().unwrap(), 0x62a14e45);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader at the start of a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Get the remaining bytes as a slice without advancing.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Read `count` bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    /// Read a value whose wire layout is described by a zerocopy type.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a signed byte.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read_struct::<U16>()?.get())
    }

    /// Read a little-endian i16.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_struct::<I16>()?.get())
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read_struct::<U32>()?.get())
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_struct::<I32>()?.get())
    }

    /// Read a little-endian i64.
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_struct::<I64>()?.get())
    }

    /// Read a little-endian f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.read_struct::<F32>()?.get())
    }

    /// Read a UTF-8 string of exactly `length` bytes.
    pub fn read_str(&mut self, length: usize) -> Result<&'a str> {
        let bytes = self.read_bytes(length)?;
        std::str::from_utf8(bytes).map_err(Error::Utf8)
    }

    /// Read a zero-terminated UTF-8 string, consuming the terminator.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let rest = self.remaining_bytes();
        let end = memchr::memchr(0, rest).ok_or(Error::MissingNullTerminator)?;
        let text = std::str::from_utf8(&rest[..end]).map_err(Error::Utf8)?;
        self.position += end + 1;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xff, 0xff, // i16: -1
            0x00, 0x00, 0x80, 0xbf, // f32: -1.0
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_i16().unwrap(), -1);
        assert_eq!(reader.read_f32().unwrap(), -1.0);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_i64() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-1234567890123i64).to_le_bytes());
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_i64().unwrap(), -1234567890123);
    }

    #[test]
    fn test_read_cstring() {
        let data = b"hello\0world\0\0";
        let mut reader = BinaryReader::new(data);

        assert_eq!(reader.read_cstring().unwrap(), "hello");
        assert_eq!(reader.read_cstring().unwrap(), "world");
        assert_eq!(reader.read_cstring().unwrap(), "");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_missing_terminator() {
        let data = b"unterminated";
        let mut reader = BinaryReader::new(data);

        assert!(matches!(
            reader.read_cstring(),
            Err(Error::MissingNullTerminator)
        ));
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        let err = reader.read_u32().unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEof {
                needed: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn test_position_tracking() {
        let data = [0u8; 8];
        let mut reader = BinaryReader::new(&data);

        reader.read_u16().unwrap();
        assert_eq!(reader.position(), 2);
        reader.read_bytes(3).unwrap();
        assert_eq!(reader.position(), 5);
        assert_eq!(reader.remaining(), 3);
    }
}
