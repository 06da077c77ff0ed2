/// One node of a decoded property tree.
///
/// `Dict` is an association list rather than a map: the wire format neither
/// sorts nor deduplicates keys, and callers depend on seeing entries in the
/// order they appear in the file.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyTree {
    None,
    Bool(bool),
    /// All numeric values, integer or floating point, are 64-bit floats on
    /// the wire. There is no separate integer representation.
    Number(f64),
    Text(String),
    List(Vec<PropertyTree>),
    Dict(Vec<(String, PropertyTree)>),
}

pub(crate) mod wire {
    pub const TAG_NONE: u8 = 0;
    pub const TAG_BOOL: u8 = 1;
    pub const TAG_NUMBER: u8 = 2;
    pub const TAG_TEXT: u8 = 3;
    pub const TAG_LIST: u8 = 4;
    pub const TAG_DICT: u8 = 5;

    /// String length byte meaning "a u32 length follows". Never a length
    /// itself.
    pub const LONG_STRING_MARKER: u8 = 0xff;
}

impl PropertyTree {
    pub(crate) fn tag_id(&self) -> u8 {
        use PropertyTree::*;

        match self {
            None => wire::TAG_NONE,
            Bool(_) => wire::TAG_BOOL,
            Number(_) => wire::TAG_NUMBER,
            Text(_) => wire::TAG_TEXT,
            List(_) => wire::TAG_LIST,
            Dict(_) => wire::TAG_DICT,
        }
    }

    /// The byte paired with every tag on the wire. Existing files carry `1`
    /// for text nodes and `0` for everything else; its meaning is historical
    /// and the value is ignored when reading.
    pub(crate) fn reserved_byte(&self) -> u8 {
        match self {
            PropertyTree::Text(_) => 1,
            _ => 0,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyTree::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyTree::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyTree::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropertyTree]> {
        match self {
            PropertyTree::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(String, PropertyTree)]> {
        match self {
            PropertyTree::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// First value stored under `key`, if any. Duplicate keys are legal;
    /// later occurrences are reachable through [`as_dict`](Self::as_dict).
    pub fn get(&self, key: &str) -> Option<&PropertyTree> {
        self.as_dict()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}
