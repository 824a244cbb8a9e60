//! Common utilities for the PackedXML toolset.
//!
//! This crate provides the foundational pieces shared by the PackedXML crates:
//!
//! - [`BinaryReader`] - forward-only little-endian reading from byte slices
//! - [`base64`] - padded base64 encoding for opaque binary values

mod error;
mod reader;

pub mod base64;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export memchr for byte searching
pub use memchr;
