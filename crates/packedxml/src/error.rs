//! Error types for packed section decoding.

use thiserror::Error;

/// Errors that can occur when decoding a packed section.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] packedxml_common::Error),

    /// Input does not start with the packed section magic.
    #[error("{input} is not a packed section: magic 0x{actual:08x}")]
    InvalidMagic { input: String, actual: u32 },

    /// Unrecognized value type tag.
    #[error(
        "unknown value type {tag} for element \"{name}\" (end offset {end_offset}, descriptor at 0x{address:x}): {dump}"
    )]
    UnknownValueType {
        name: String,
        end_offset: u32,
        tag: u8,
        address: u32,
        dump: String,
    },

    /// Boolean value whose stored byte is not 1.
    #[error("corrupt boolean in element \"{name}\": stored byte {value}")]
    BooleanCorruption { name: String, value: i8 },

    /// Dictionary name index past the end of the dictionary.
    #[error("dictionary index {index} out of bounds (dictionary has {len} entries)")]
    DictionaryIndexOutOfBounds { index: u16, len: usize },

    /// Element nesting deeper than the decoder allows.
    #[error("element nesting exceeds maximum depth {max}")]
    DepthLimitExceeded { max: usize },

    /// XML writing error.
    #[error("XML error: {0}")]
    Xml(String),
}

/// Result type for packed section operations.
pub type Result<T> = std::result::Result<T, Error>;
