//! Encoding: little-endian primitives, the recursive node codec, and the
//! file envelope.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::value::{wire, PropertyTree};
use crate::version::FileVersion;

/// Primitive writer over an arbitrary byte sink.
///
/// The exact dual of [`TreeReader`](crate::TreeReader): every multi-byte
/// value goes out little-endian regardless of host byte order.
pub struct TreeWriter<W> {
    inner: W,
}

impl<W: Write> TreeWriter<W> {
    pub fn new(inner: W) -> TreeWriter<W> {
        TreeWriter { inner }
    }

    /// Consume this writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        Ok(self.inner.write_u8(value)?)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        Ok(self.inner.write_u16::<LittleEndian>(value)?)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.inner.write_u32::<LittleEndian>(value)?)
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        Ok(self.inner.write_u64::<LittleEndian>(value)?)
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        Ok(self.inner.write_i16::<LittleEndian>(value)?)
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        Ok(self.inner.write_i32::<LittleEndian>(value)?)
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        Ok(self.inner.write_i64::<LittleEndian>(value)?)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        Ok(self.inner.write_f32::<LittleEndian>(value)?)
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        Ok(self.inner.write_f64::<LittleEndian>(value)?)
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        Ok(self.inner.write_u8(value as u8)?)
    }

    /// See [`TreeReader::read_wide_char`](crate::TreeReader::read_wide_char).
    pub fn write_wide_char(&mut self, _value: char) -> Result<()> {
        Err(Error::Unsupported("UTF-16 code unit"))
    }

    /// See [`TreeReader::read_decimal`](crate::TreeReader::read_decimal).
    pub fn write_decimal(&mut self, _value: f64) -> Result<()> {
        Err(Error::Unsupported("128-bit decimal"))
    }

    /// Write one length-prefixed UTF-8 string.
    ///
    /// An empty string is a single flag byte and nothing else. Byte lengths
    /// below 255 fit in one length byte; anything longer gets the `0xff`
    /// marker followed by a u32 length.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            return self.write_bool(true);
        }

        self.write_bool(false)?;

        let bytes = value.as_bytes();
        if bytes.len() < wire::LONG_STRING_MARKER as usize {
            self.inner.write_u8(bytes.len() as u8)?;
        } else {
            self.inner.write_u8(wire::LONG_STRING_MARKER)?;
            self.inner.write_u32::<LittleEndian>(bytes.len() as u32)?;
        }
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Encode one node: tag byte, reserved byte, then the tag-specific
    /// payload.
    pub fn write_node(&mut self, node: &PropertyTree) -> Result<()> {
        self.write_u8(node.tag_id())?;
        self.write_u8(node.reserved_byte())?;

        match node {
            PropertyTree::None => {}
            PropertyTree::Bool(value) => self.write_bool(*value)?,
            PropertyTree::Number(value) => self.write_f64(*value)?,
            PropertyTree::Text(value) => self.write_string(value)?,
            PropertyTree::List(items) => {
                self.write_u32(items.len() as u32)?;
                for item in items {
                    // List entries carry an empty key on the wire.
                    self.write_string("")?;
                    self.write_node(item)?;
                }
            }
            PropertyTree::Dict(entries) => {
                self.write_u32(entries.len() as u32)?;
                for (key, value) in entries {
                    self.write_string(key)?;
                    self.write_node(value)?;
                }
            }
        }

        tracing::trace!(tag = node.tag_id(), "encoded node");
        Ok(())
    }

    /// Encode a complete file: version header, conditional reserved byte,
    /// then the root node.
    pub fn write_file(&mut self, version: FileVersion, root: &PropertyTree) -> Result<()> {
        self.write_u16(version.main)?;
        self.write_u16(version.major)?;
        self.write_u16(version.minor)?;
        self.write_u16(version.revision)?;

        // Historical asymmetry: the reader consumes an extra byte from
        // 0.17.0.0 onward, but writers only emit it for versions strictly
        // above that. Existing files depend on both sides staying as-is.
        if version > FileVersion::RESERVED_BYTE_SINCE {
            self.write_u8(0)?;
        }

        self.write_node(root)?;

        tracing::debug!(%version, tag = root.tag_id(), "encoded property-tree file");
        Ok(())
    }
}

/// Encode `root` as a complete property-tree file into `writer`.
pub fn encode_file<W: Write>(writer: W, version: FileVersion, root: &PropertyTree) -> Result<()> {
    TreeWriter::new(writer).write_file(version, root)
}

#[cfg(test)]
mod tests {
    use super::TreeWriter;
    use crate::{Error, FileVersion, PropertyTree};

    fn string_bytes(value: &str) -> Vec<u8> {
        let mut writer = TreeWriter::new(Vec::new());
        writer.write_string(value).unwrap();
        writer.into_inner()
    }

    #[test]
    fn empty_string_is_exactly_one_byte() {
        assert_eq!(string_bytes(""), vec![1]);
    }

    #[test]
    fn short_string_layout() {
        assert_eq!(string_bytes("hi"), vec![0, 2, b'h', b'i']);
    }

    #[test]
    fn string_length_boundary() {
        let short = "x".repeat(254);
        let bytes = string_bytes(&short);
        assert_eq!(&bytes[..2], &[0, 254]);
        assert_eq!(bytes.len(), 2 + 254);

        let long = "x".repeat(255);
        let bytes = string_bytes(&long);
        assert_eq!(&bytes[..6], &[0, 0xff, 255, 0, 0, 0]);
        assert_eq!(bytes.len(), 6 + 255);
    }

    #[test]
    fn reserved_byte_is_one_only_for_text() {
        let mut writer = TreeWriter::new(Vec::new());
        writer.write_node(&PropertyTree::Text("a".into())).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(&bytes[..2], &[3, 1]);

        let mut writer = TreeWriter::new(Vec::new());
        writer.write_node(&PropertyTree::Number(0.0)).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(&bytes[..2], &[2, 0]);
    }

    #[test]
    fn list_entries_are_keyed_with_empty_strings() {
        let mut writer = TreeWriter::new(Vec::new());
        writer
            .write_node(&PropertyTree::List(vec![PropertyTree::None]))
            .unwrap();
        // tag, reserved, count u32, empty key flag, nested tag, reserved
        assert_eq!(writer.into_inner(), vec![4, 0, 1, 0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn reserved_header_byte_written_only_above_threshold() {
        let mut writer = TreeWriter::new(Vec::new());
        writer
            .write_file(FileVersion::RESERVED_BYTE_SINCE, &PropertyTree::None)
            .unwrap();
        // Header + node only; no extra byte at exactly 0.17.0.0.
        assert_eq!(writer.into_inner(), vec![0, 0, 17, 0, 0, 0, 0, 0, 0, 0]);

        let mut writer = TreeWriter::new(Vec::new());
        writer
            .write_file(FileVersion::new(0, 17, 0, 1), &PropertyTree::None)
            .unwrap();
        assert_eq!(
            writer.into_inner(),
            vec![0, 0, 17, 0, 0, 0, 1, 0, 0, 0, 0]
        );
    }

    #[test]
    fn unsupported_primitives_fail_loudly() {
        let mut writer = TreeWriter::new(Vec::new());
        assert!(matches!(
            writer.write_wide_char('a'),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            writer.write_decimal(1.0),
            Err(Error::Unsupported(_))
        ));
    }
}
