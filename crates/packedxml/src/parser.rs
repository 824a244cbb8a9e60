//! Packed section decoder.
//!
//! The section body is a pre-order serialization of the tree: each element
//! stores its child count, its own value descriptor and the child descriptor
//! table, followed by the raw value bytes of the element and of each child in
//! declaration order. Values are contiguous with no gaps, addressed by end
//! offsets rather than lengths, so the walker threads a running offset
//! through every decode step.

#[cfg(feature = "xml-output")]
use std::io::Write;
use std::path::Path;

use packedxml_common::{base64, BinaryReader};

use crate::descriptor::{DataDescriptor, ElementDescriptor, ValueKind};
use crate::dictionary::Dictionary;
use crate::header::{Header, MAGIC};
use crate::node::{self, Node};
use crate::{Error, Result};

/// Maximum element nesting the walker will follow.
///
/// The format itself has no depth limit; this bound turns corrupt or
/// adversarial input into an error instead of exhausting the call stack.
const MAX_DEPTH: usize = 500;

/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Name given to the synthetic root element.
    pub root_name: String,
    /// Move stray leading text of mixed-content nodes into a `value` child.
    pub fix_unnamed_values: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_name: "packedSection".to_owned(),
            fix_unnamed_values: false,
        }
    }
}

/// A decoded packed section document.
///
/// This owns the fully reconstructed element tree; the input buffer is not
/// referenced after decoding completes.
#[derive(Debug, Clone)]
pub struct PackedXml {
    header: Header,
    root: Node,
}

impl PackedXml {
    /// Check if data starts with the packed section magic.
    pub fn is_packed_xml(data: &[u8]) -> bool {
        data.len() >= 4 && u32::from_le_bytes([data[0], data[1], data[2], data[3]]) == MAGIC
    }

    /// Decode a packed section from bytes with default settings.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::decode(data, &Settings::default(), None)
    }

    /// Decode a packed section from bytes.
    pub fn parse_with(data: &[u8], settings: &Settings) -> Result<Self> {
        Self::decode(data, settings, None)
    }

    /// Read and decode a packed section file with default settings.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with(path, &Settings::default())
    }

    /// Read and decode a packed section file.
    ///
    /// Error messages name the file instead of "buffer".
    pub fn from_file_with(path: impl AsRef<Path>, settings: &Settings) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Self::decode(&data, settings, Some(path))
    }

    fn decode(data: &[u8], settings: &Settings, source: Option<&Path>) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let header = Header::read(&mut reader, &describe_input(source))?;

        let dictionary = Dictionary::read(&mut reader)?;

        let mut root = Node::new(settings.root_name.clone());
        let mut walker = Walker { reader, dictionary };
        walker.read_element(&mut root, 0)?;

        if settings.fix_unnamed_values {
            node::wrap_unnamed_values(&mut root);
        }

        Ok(Self { header, root })
    }

    /// Format version from the header.
    pub fn version(&self) -> i8 {
        self.header.version
    }

    /// The decoded root element.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Release the decoded tree to the caller.
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Render the decoded tree as an XML string.
    #[cfg(feature = "xml-output")]
    pub fn to_xml_string(&self) -> Result<String> {
        let mut output = Vec::new();
        self.write_xml(&mut output)?;
        String::from_utf8(output).map_err(|e| Error::Xml(e.to_string()))
    }

    /// Write the decoded tree as XML.
    #[cfg(feature = "xml-output")]
    pub fn write_xml<W: Write>(&self, writer: &mut W) -> Result<()> {
        use quick_xml::events::{BytesDecl, Event};
        use quick_xml::Writer;

        let mut xml_writer = Writer::new_with_indent(writer, b' ', 2);

        xml_writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| Error::Xml(e.to_string()))?;

        write_element(&mut xml_writer, &self.root)
    }
}

fn describe_input(source: Option<&Path>) -> String {
    match source.and_then(Path::file_name) {
        Some(name) => format!("file \"{}\"", name.to_string_lossy()),
        None => "buffer".to_owned(),
    }
}

/// Recursive descent over the section body.
struct Walker<'a> {
    reader: BinaryReader<'a>,
    dictionary: Dictionary,
}

impl Walker<'_> {
    /// Decode one element: child table first, then the element's own value
    /// bytes, then each child's value bytes in table order.
    fn read_element(&mut self, element: &mut Node, depth: usize) -> Result<()> {
        if depth >= MAX_DEPTH {
            return Err(Error::DepthLimitExceeded { max: MAX_DEPTH });
        }

        let child_count = self.reader.read_u16()? as usize;
        let self_descriptor = DataDescriptor::read(&mut self.reader)?;
        let table = ElementDescriptor::read_table(&mut self.reader, child_count)?;

        // The element's own value occupies the start of its data region.
        let mut offset = self.read_value(element, 0, self_descriptor, depth)?;

        for entry in &table {
            let mut child = Node::new(self.dictionary.get(entry.name_index)?);
            offset = self.read_value(&mut child, offset, entry.data, depth)?;
            element.children.push(child);
        }

        Ok(())
    }

    /// Decode one value occupying `[offset, descriptor.end_offset)`.
    ///
    /// Always returns the descriptor's declared end offset: sibling layout
    /// is driven by the descriptor table, not by how many bytes a branch
    /// actually consumed. The boolean false path and unsupported integer
    /// widths consume nothing yet still advance.
    fn read_value(
        &mut self,
        element: &mut Node,
        offset: u32,
        descriptor: DataDescriptor,
        depth: usize,
    ) -> Result<u32> {
        let length = descriptor.end_offset.saturating_sub(offset) as usize;

        match descriptor.kind {
            ValueKind::Element => {
                self.read_element(element, depth + 1)?;
            }
            ValueKind::Text => {
                element.text = self.reader.read_str(length)?.to_owned();
            }
            ValueKind::Integer => {
                element.text = self.read_integer(length)?;
            }
            ValueKind::Floats => {
                self.read_floats(element, length)?;
            }
            ValueKind::Boolean => {
                let text = self.read_boolean(&element.name, length)?;
                element.text = text.to_owned();
            }
            ValueKind::Blob => {
                element.text = base64::encode(self.reader.read_bytes(length)?);
            }
            ValueKind::Unknown(tag) => {
                let bytes = self.reader.read_bytes(length)?;
                return Err(Error::UnknownValueType {
                    name: element.name.clone(),
                    end_offset: descriptor.end_offset,
                    tag,
                    address: descriptor.address,
                    dump: hex_dump(bytes),
                });
            }
        }

        Ok(descriptor.end_offset)
    }

    /// Integers are stored at their natural width; anything else decodes to
    /// the literal "0" without touching the stream.
    fn read_integer(&mut self, length: usize) -> Result<String> {
        Ok(match length {
            1 => self.reader.read_i8()?.to_string(),
            2 => self.reader.read_i16()?.to_string(),
            4 => self.reader.read_i32()?.to_string(),
            8 => self.reader.read_i64()?.to_string(),
            _ => "0".to_owned(),
        })
    }

    fn read_floats(&mut self, element: &mut Node, length: usize) -> Result<()> {
        let count = length / 4;
        let mut floats = Vec::with_capacity(count);
        for _ in 0..count {
            floats.push(format!("{:.6}", self.reader.read_f32()?));
        }

        if floats.len() == 12 {
            // Twelve floats are a 4x3 transform matrix: one row element per
            // three consecutive components.
            for (index, row) in floats.chunks(3).enumerate() {
                let mut child = Node::new(format!("row{index}"));
                child.text = row.join(" ");
                element.children.push(child);
            }
        } else {
            element.text = floats.join(" ");
        }

        Ok(())
    }

    /// A length other than one byte decodes as false without consuming
    /// anything; the caller still advances to the declared end offset, so a
    /// following sibling reads the bytes left behind. Reference behavior.
    fn read_boolean(&mut self, name: &str, length: usize) -> Result<&'static str> {
        if length != 1 {
            return Ok("false");
        }
        let value = self.reader.read_i8()?;
        if value != 1 {
            return Err(Error::BooleanCorruption {
                name: name.to_owned(),
                value,
            });
        }
        Ok("true")
    }
}

/// Hex rendering of undecodable value bytes for diagnostics.
fn hex_dump(bytes: &[u8]) -> String {
    let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("[{}] ({} bytes)", hex.join(" "), bytes.len())
}

#[cfg(feature = "xml-output")]
fn write_element<W: Write>(writer: &mut quick_xml::Writer<W>, node: &Node) -> Result<()> {
    use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

    let elem = BytesStart::new(node.name.as_str());

    if node.text.is_empty() && node.children.is_empty() {
        writer
            .write_event(Event::Empty(elem))
            .map_err(|e| Error::Xml(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::Xml(e.to_string()))?;

    if !node.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&node.text)))
            .map_err(|e| Error::Xml(e.to_string()))?;
    }

    for child in &node.children {
        write_element(writer, child)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(node.name.as_str())))
        .map_err(|e| Error::Xml(e.to_string()))?;

    Ok(())
}
