use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Key-ordered mapping body of a [`ConfigNode::Mapping`].
///
/// Keys are kept in canonical (sorted) order so that encoding the same
/// configuration twice always yields byte-identical documents.
pub type Mapping = BTreeMap<String, ConfigNode>;

/// A generic configuration tree node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigNode {
    /// Absent value.
    #[default]
    Null,
    /// Leaf value.
    Scalar(Scalar),
    /// Ordered list of nodes.
    Sequence(Vec<ConfigNode>),
    /// Unique string keys mapped to nodes.
    Mapping(Mapping),
}

/// A leaf value in a [`ConfigNode`] tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Short name of the scalar flavour, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }
}

impl Display for Scalar {
    /// Renders the scalar as a plain string, the form used for mapping keys.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Integer(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::String(value) => f.write_str(value),
        }
    }
}

impl ConfigNode {
    /// Create a string scalar node.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// Create an integer scalar node.
    pub fn integer(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }

    /// Create a float scalar node.
    pub fn float(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }

    /// Create a boolean scalar node.
    pub fn boolean(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }

    /// Create an empty mapping node.
    pub fn empty_mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Create an empty sequence node.
    pub fn empty_sequence() -> Self {
        Self::Sequence(Vec::new())
    }

    /// Build a mapping node from key/value pairs. Later duplicates win.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigNode)>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of the node flavour, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigNode::Null => "null",
            ConfigNode::Scalar(scalar) => scalar.kind_name(),
            ConfigNode::Sequence(_) => "sequence",
            ConfigNode::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigNode::Null)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ConfigNode::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(Scalar::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigNode::Scalar(Scalar::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigNode::Scalar(Scalar::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConfigNode::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            ConfigNode::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigNode]> {
        match self {
            ConfigNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<ConfigNode>> {
        match self {
            ConfigNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Return the mapping entry for `key`, if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.as_mapping()?.get(key)
    }

    /// Mutable variant of [`ConfigNode::get`].
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigNode> {
        self.as_mapping_mut()?.get_mut(key)
    }

    /// Insert an entry into a mapping node, returning the previous value.
    ///
    /// Returns `None` without inserting when this node is not a mapping.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigNode) -> Option<ConfigNode> {
        self.as_mapping_mut()?.insert(key.into(), value)
    }

    /// Walk a nested path and return the node found there.
    ///
    /// Mapping segments are keys; sequence segments are decimal indexes.
    pub fn get_path<'a>(&'a self, path: &[&str]) -> Option<&'a ConfigNode> {
        let mut current = self;
        for segment in path {
            current = match current {
                ConfigNode::Mapping(entries) => entries.get(*segment)?,
                ConfigNode::Sequence(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl From<Scalar> for ConfigNode {
    fn from(value: Scalar) -> Self {
        ConfigNode::Scalar(value)
    }
}

impl From<&str> for ConfigNode {
    fn from(value: &str) -> Self {
        ConfigNode::string(value)
    }
}

impl From<String> for ConfigNode {
    fn from(value: String) -> Self {
        ConfigNode::string(value)
    }
}

impl From<i64> for ConfigNode {
    fn from(value: i64) -> Self {
        ConfigNode::integer(value)
    }
}

impl From<f64> for ConfigNode {
    fn from(value: f64) -> Self {
        ConfigNode::float(value)
    }
}

impl From<bool> for ConfigNode {
    fn from(value: bool) -> Self {
        ConfigNode::boolean(value)
    }
}

impl From<Vec<ConfigNode>> for ConfigNode {
    fn from(value: Vec<ConfigNode>) -> Self {
        ConfigNode::Sequence(value)
    }
}

impl From<Mapping> for ConfigNode {
    fn from(value: Mapping) -> Self {
        ConfigNode::Mapping(value)
    }
}

impl Display for ConfigNode {
    /// Compact JSON-like rendering.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigNode::Null => write!(f, "null"),
            ConfigNode::Scalar(Scalar::String(value)) => write!(f, "{value:?}"),
            ConfigNode::Scalar(scalar) => write!(f, "{scalar}"),
            ConfigNode::Sequence(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ConfigNode::Mapping(entries) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{key:?}:{value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
