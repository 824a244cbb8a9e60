//! Packed section file header.

use packedxml_common::BinaryReader;

use crate::{Error, Result};

/// Magic value at the start of every packed section, little-endian.
pub const MAGIC: u32 = 0x62a1_4e45;

/// File header: the magic followed by a single version byte.
///
/// The version byte has no effect on decoding; every known game build writes
/// 0 here and readers are expected to ignore it.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    /// The validated magic value.
    pub magic: u32,
    /// Format version, carried for diagnostics only.
    pub version: i8,
}

impl Header {
    /// Encoded size of the header in bytes.
    pub const LEN: usize = 5;

    /// Read and validate the header.
    ///
    /// `input` describes the data source ("buffer" or a file name) and is
    /// only used in the error message when the magic does not match.
    pub fn read(reader: &mut BinaryReader<'_>, input: &str) -> Result<Self> {
        let magic = reader.read_u32()?;
        if magic != MAGIC {
            return Err(Error::InvalidMagic {
                input: input.to_owned(),
                actual: magic,
            });
        }
        let version = reader.read_i8()?;
        Ok(Self { magic, version })
    }
}
