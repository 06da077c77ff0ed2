//! Decoding: little-endian primitives, the recursive node codec, and the
//! file envelope.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};
use crate::value::{wire, PropertyTree};
use crate::version::FileVersion;

/// Primitive reader over an arbitrary byte stream.
///
/// Every multi-byte value is little-endian on the wire; `byteorder` performs
/// the swap on big-endian hosts. A short read anywhere surfaces as
/// [`Error::UnexpectedEof`], never as a default value.
pub struct TreeReader<R> {
    inner: R,
}

impl<R: Read> TreeReader<R> {
    pub fn new(inner: R) -> TreeReader<R> {
        TreeReader { inner }
    }

    /// Consume this reader and return the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.inner.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.inner.read_u16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.inner.read_u64::<LittleEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.inner.read_i16::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.inner.read_i32::<LittleEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.inner.read_i64::<LittleEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.inner.read_f32::<LittleEndian>()?)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.inner.read_f64::<LittleEndian>()?)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.inner.read_u8()? != 0)
    }

    /// Single UTF-16 code units exist in ancestors of this format but never
    /// in supported versions.
    pub fn read_wide_char(&mut self) -> Result<char> {
        Err(Error::Unsupported("UTF-16 code unit"))
    }

    /// Fixed-point decimals exist in ancestors of this format but never in
    /// supported versions.
    pub fn read_decimal(&mut self) -> Result<f64> {
        Err(Error::Unsupported("128-bit decimal"))
    }

    /// Read one length-prefixed UTF-8 string.
    ///
    /// An empty string is a single flag byte and nothing else. Otherwise the
    /// flag byte is followed by a one-byte length, or by the `0xff` marker
    /// plus a u32 length, then the raw bytes. `0xff` in the length position
    /// is only ever the marker.
    pub fn read_string(&mut self) -> Result<String> {
        if self.read_bool()? {
            return Ok(String::new());
        }

        let len = match self.inner.read_u8()? {
            wire::LONG_STRING_MARKER => self.inner.read_u32::<LittleEndian>()? as usize,
            len => len as usize,
        };

        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(Error::InvalidUtf8)
    }

    /// Decode one node: tag byte, reserved byte, then the tag-specific
    /// payload.
    pub fn read_node(&mut self) -> Result<PropertyTree> {
        let id = self.read_u8()?;
        // Reserved byte; content is historical and ignored.
        let _ = self.read_u8()?;

        let node = match id {
            wire::TAG_NONE => PropertyTree::None,
            wire::TAG_BOOL => PropertyTree::Bool(self.read_bool()?),
            wire::TAG_NUMBER => PropertyTree::Number(self.read_f64()?),
            wire::TAG_TEXT => PropertyTree::Text(self.read_string()?),
            wire::TAG_LIST => {
                let len = self.read_u32()?;
                let mut items = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    // List entries are keyed with an empty string; drop it.
                    let _ = self.read_string()?;
                    items.push(self.read_node()?);
                }
                PropertyTree::List(items)
            }
            wire::TAG_DICT => {
                let len = self.read_u32()?;
                let mut entries = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    let key = self.read_string()?;
                    let value = self.read_node()?;
                    entries.push((key, value));
                }
                PropertyTree::Dict(entries)
            }
            id => return Err(Error::InvalidData(id)),
        };

        tracing::trace!(tag = id, "decoded node");
        Ok(node)
    }

    /// Decode a complete file: version header, conditional reserved byte,
    /// then exactly one root node.
    pub fn read_file(&mut self) -> Result<(FileVersion, PropertyTree)> {
        let version = FileVersion::new(
            self.read_u16()?,
            self.read_u16()?,
            self.read_u16()?,
            self.read_u16()?,
        );

        if version < FileVersion::MIN_SUPPORTED {
            return Err(Error::UnsupportedVersion(version));
        }

        if version >= FileVersion::RESERVED_BYTE_SINCE {
            // Extra header byte introduced in 0.17.0.0; content unused.
            let _ = self.read_u8()?;
        }

        let root = self.read_node().map_err(Error::into_invalid_file)?;

        tracing::debug!(%version, tag = root.tag_id(), "decoded property-tree file");
        Ok((version, root))
    }
}

/// Decode a complete property-tree file from `reader`.
pub fn decode_file<R: Read>(reader: R) -> Result<(FileVersion, PropertyTree)> {
    TreeReader::new(reader).read_file()
}
