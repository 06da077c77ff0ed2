//! Bridge between decoded property trees and `serde_json::Value`, plus the
//! document-level entry points most callers want.

use std::io::{Read, Write};

use serde_json::Value;

use crate::de::TreeReader;
use crate::error::{Error, Result};
use crate::ser::TreeWriter;
use crate::value::PropertyTree;
use crate::version::FileVersion;

/// Convert a decoded tree into a JSON value.
///
/// Dict entry order carries over into the object (`serde_json` is built with
/// `preserve_order`). Duplicate keys are legal on the wire but a JSON object
/// cannot hold them; the last occurrence wins.
pub fn tree_to_json(tree: &PropertyTree) -> Value {
    match tree {
        PropertyTree::None => Value::Null,
        PropertyTree::Bool(value) => Value::Bool(*value),
        PropertyTree::Number(value) => serde_json::Number::from_f64(*value)
            .map(Value::Number)
            // NaN and infinities have no JSON form.
            .unwrap_or(Value::Null),
        PropertyTree::Text(value) => Value::String(value.clone()),
        PropertyTree::List(items) => Value::Array(items.iter().map(tree_to_json).collect()),
        PropertyTree::Dict(entries) => {
            let mut map = serde_json::Map::new();
            for (key, value) in entries {
                map.insert(key.clone(), tree_to_json(value));
            }
            Value::Object(map)
        }
    }
}

/// Convert a JSON value into a tree.
///
/// Every number becomes a 64-bit float, so an integer literal `3` encodes
/// identically to `3.0`.
pub fn json_to_tree(value: &Value) -> PropertyTree {
    match value {
        Value::Object(map) => PropertyTree::Dict(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_tree(value)))
                .collect(),
        ),
        Value::Array(items) => PropertyTree::List(items.iter().map(json_to_tree).collect()),
        Value::Number(number) => PropertyTree::Number(number.as_f64().unwrap_or(0.0)),
        Value::String(text) => PropertyTree::Text(text.clone()),
        Value::Bool(value) => PropertyTree::Bool(*value),
        Value::Null => PropertyTree::None,
    }
}

/// Decode a complete property-tree file into its version and a JSON value.
pub fn decode_document<R: Read>(reader: R) -> Result<(FileVersion, Value)> {
    let (version, root) = TreeReader::new(reader).read_file()?;
    Ok((version, tree_to_json(&root)))
}

/// Encode JSON text as a property-tree file.
///
/// Blank input writes a bare `None` root. Anything else must parse as JSON
/// with an object or array at the top level, mirroring the files the format
/// is used for. When `version` is not given, [`FileVersion::DEFAULT_WRITE`]
/// is stamped on the file.
pub fn encode_document<W: Write>(
    writer: W,
    text: &str,
    version: Option<FileVersion>,
) -> Result<()> {
    let version = version.unwrap_or(FileVersion::DEFAULT_WRITE);

    if text.trim().is_empty() {
        return TreeWriter::new(writer).write_file(version, &PropertyTree::None);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|err| Error::InvalidText(err.to_string()))?;
    encode_value(writer, &value, Some(version))
}

/// Encode an already-parsed JSON value as a property-tree file.
pub fn encode_value<W: Write>(
    writer: W,
    value: &Value,
    version: Option<FileVersion>,
) -> Result<()> {
    let version = version.unwrap_or(FileVersion::DEFAULT_WRITE);

    if !value.is_object() && !value.is_array() {
        return Err(Error::InvalidText(
            "top-level value must be an object or array".into(),
        ));
    }

    TreeWriter::new(writer).write_file(version, &json_to_tree(value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{encode_document, encode_value, json_to_tree, tree_to_json};
    use crate::{Error, FileVersion, PropertyTree};

    #[test]
    fn object_key_order_is_preserved() {
        let value = json!({ "zulu": 1, "alpha": 2, "mike": 3 });
        let tree = json_to_tree(&value);
        let keys: Vec<&str> = tree
            .as_dict()
            .unwrap()
            .iter()
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(keys, ["zulu", "alpha", "mike"]);

        let back = tree_to_json(&tree);
        let keys: Vec<&String> = back.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn integers_and_floats_encode_identically() {
        let mut a = Vec::new();
        encode_value(&mut a, &json!({ "x": 3 }), None).unwrap();
        let mut b = Vec::new();
        encode_value(&mut b, &json!({ "x": 3.0 }), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn nested_null_maps_to_none() {
        let tree = json_to_tree(&json!({ "gap": null }));
        assert_eq!(tree.get("gap"), Some(&PropertyTree::None));
    }

    #[test]
    fn non_finite_numbers_become_null() {
        let value = tree_to_json(&PropertyTree::Number(f64::NAN));
        assert!(value.is_null());
    }

    #[test]
    fn top_level_scalar_is_rejected() {
        let err = encode_value(Vec::new(), &json!(42), None).unwrap_err();
        assert!(matches!(err, Error::InvalidText(_)));
    }

    #[test]
    fn top_level_array_is_accepted() {
        encode_value(Vec::new(), &json!([1, 2]), None).unwrap();
    }

    #[test]
    fn unparseable_text_is_rejected() {
        let err = encode_document(Vec::new(), "{ not json", None).unwrap_err();
        assert!(matches!(err, Error::InvalidText(_)));
    }

    #[test]
    fn blank_text_writes_a_bare_none_root() {
        let mut buf = Vec::new();
        encode_document(&mut buf, "  \n\t", Some(FileVersion::new(0, 17, 73, 4))).unwrap();
        // 8-byte header, reserved header byte, then a None node.
        assert_eq!(buf, vec![0, 0, 17, 0, 73, 0, 4, 0, 0, 0, 0]);
    }

    #[test]
    fn default_write_version_is_used_when_unspecified() {
        let mut buf = Vec::new();
        encode_value(&mut buf, &json!({}), None).unwrap();
        assert_eq!(&buf[..8], &[0, 0, 17, 0, 73, 0, 4, 0]);
    }
}
