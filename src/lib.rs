//! Herein lies a codec for a compact, version-tagged binary property-tree
//! format, as found in a third-party application's on-disk settings files.
//!
//! Decoding turns a byte stream into a [`FileVersion`] plus a
//! [`serde_json::Value`]; encoding is the exact inverse. Most callers want
//! [`decode_document`] and [`encode_document`]. The [`TreeReader`] and
//! [`TreeWriter`] layer underneath exposes the raw little-endian primitives
//! and the recursive [`PropertyTree`] codec for anyone embedding nodes in a
//! larger stream.

pub mod de;
mod error;
pub mod json;
pub mod ser;
mod value;
mod version;

pub use de::{decode_file, TreeReader};
pub use error::{Error, Result};
pub use json::{decode_document, encode_document, encode_value, json_to_tree, tree_to_json};
pub use ser::{encode_file, TreeWriter};
pub use value::PropertyTree;
pub use version::FileVersion;
