//! BigWorld packed section ("PackedXML") decoder.
//!
//! BigWorld engine games ship most of their hierarchical data as packed
//! sections: a dictionary-compressed binary tree where element names are
//! stored once in a shared string table and values are addressed by end
//! offsets within each node's data region. This crate decodes these files
//! into an ordered tree of named nodes and can render the tree as plain XML.
//!
//! # Supported File Types
//!
//! - `.def` - Entity definitions
//! - `.model` / `.visual` - Model descriptions
//! - `.chunk` - World chunk data
//! - `.settings` - Space and terrain settings
//! - Some `.xml` files (the binary variant)
//!
//! # Example
//!
//! ```no_run
//! use packedxml::PackedXml;
//!
//! let data = std::fs::read("scripts/entity_defs/Avatar.def")?;
//!
//! if PackedXml::is_packed_xml(&data) {
//!     let packed = PackedXml::parse(&data)?;
//!     println!("{}", packed.to_xml_string()?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod header;
mod descriptor;
mod dictionary;
mod node;
mod parser;

pub use error::{Error, Result};
pub use header::Header;
pub use descriptor::{DataDescriptor, ElementDescriptor, ValueKind};
pub use dictionary::Dictionary;
pub use node::Node;
pub use parser::{PackedXml, Settings};
