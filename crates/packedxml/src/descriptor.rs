//! Value and element descriptors.
//!
//! Every value in a packed section is described by a 32-bit packed field:
//! the low 28 bits hold the absolute offset at which the value's bytes end
//! within its node's data region, the high 4 bits select the decoding rule.
//! Child slots pair such a descriptor with a dictionary name index.

use packedxml_common::BinaryReader;
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::Result;

/// Low 28 bits of a packed descriptor: the value's end offset.
const END_OFFSET_MASK: u32 = 0x0fff_ffff;

/// How a value's bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// The value region is itself a nested element tree.
    Element,
    /// UTF-8 text.
    Text,
    /// Signed little-endian integer of 1, 2, 4 or 8 bytes.
    Integer,
    /// Sequence of 32-bit floats; exactly twelve form a 4x3 transform matrix.
    Floats,
    /// Single-byte boolean.
    Boolean,
    /// Opaque bytes, rendered as base64 text.
    Blob,
    /// Reserved tag values 6-15.
    Unknown(u8),
}

impl ValueKind {
    /// Map a raw 4-bit tag to its kind.
    ///
    /// Unknown tags are preserved rather than rejected here; the value
    /// decoder reports them with full element context.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Element,
            1 => Self::Text,
            2 => Self::Integer,
            3 => Self::Floats,
            4 => Self::Boolean,
            5 => Self::Blob,
            other => Self::Unknown(other),
        }
    }

    /// The raw 4-bit tag value.
    pub fn raw(self) -> u8 {
        match self {
            Self::Element => 0,
            Self::Text => 1,
            Self::Integer => 2,
            Self::Floats => 3,
            Self::Boolean => 4,
            Self::Blob => 5,
            Self::Unknown(other) => other,
        }
    }
}

/// Where a value ends and how to decode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDescriptor {
    /// Absolute end offset of the value within its node's data region.
    pub end_offset: u32,
    /// Decoding rule selector.
    pub kind: ValueKind,
    /// Stream position just after this descriptor, for error reporting.
    pub address: u32,
}

impl DataDescriptor {
    fn unpack(packed: u32, address: usize) -> Self {
        Self {
            end_offset: packed & END_OFFSET_MASK,
            kind: ValueKind::from_raw((packed >> 28) as u8),
            address: address as u32,
        }
    }

    /// Read one packed descriptor.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let packed = reader.read_u32()?;
        Ok(Self::unpack(packed, reader.position()))
    }
}

/// On-disk child slot: dictionary name index plus packed descriptor.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
struct RawElementDescriptor {
    name_index: U16,
    packed: U32,
}

/// A child slot of an element: which dictionary name it carries and where
/// its value ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementDescriptor {
    /// Index into the shared string dictionary.
    pub name_index: u16,
    /// The child's value descriptor.
    pub data: DataDescriptor,
}

impl ElementDescriptor {
    /// Read a child descriptor table of `count` entries, in declaration
    /// order. The order also governs value layout, so it is never changed.
    pub fn read_table(reader: &mut BinaryReader<'_>, count: usize) -> Result<Vec<Self>> {
        let mut table = Vec::with_capacity(count);
        for _ in 0..count {
            let raw: RawElementDescriptor = reader.read_struct()?;
            table.push(Self {
                name_index: raw.name_index.get(),
                data: DataDescriptor::unpack(raw.packed.get(), reader.position()),
            });
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_splits_end_and_tag() {
        let descriptor = DataDescriptor::unpack(0x5000_0010, 9);
        assert_eq!(descriptor.end_offset, 0x10);
        assert_eq!(descriptor.kind, ValueKind::Blob);
        assert_eq!(descriptor.address, 9);

        let descriptor = DataDescriptor::unpack(0xffff_ffff, 0);
        assert_eq!(descriptor.end_offset, 0x0fff_ffff);
        assert_eq!(descriptor.kind, ValueKind::Unknown(15));
    }

    #[test]
    fn test_table_preserves_order() {
        let mut data = Vec::new();
        for (index, end) in [(3u16, 8u32), (1, 16), (3, 20)] {
            data.extend_from_slice(&index.to_le_bytes());
            data.extend_from_slice(&(2 << 28 | end).to_le_bytes());
        }

        let mut reader = BinaryReader::new(&data);
        let table = ElementDescriptor::read_table(&mut reader, 3).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table[0].name_index, 3);
        assert_eq!(table[0].data.end_offset, 8);
        assert_eq!(table[1].name_index, 1);
        assert_eq!(table[2].data.end_offset, 20);
        assert!(table.iter().all(|e| e.data.kind == ValueKind::Integer));
    }
}
