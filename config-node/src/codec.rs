use thiserror::Error;

use crate::path::{NodePath, PathSegment};
use crate::tree::ConfigNode;

/// Errors that can occur while reading or writing a [`ConfigNode`] document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input or output JSON was rejected by the JSON codec.
    #[error("failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Input TOML could not be parsed.
    #[error("failed to parse TOML: {0}")]
    TomlDe(#[from] toml::de::Error),
    /// Tree could not be rendered as TOML.
    #[error("failed to write TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),
    /// Tree shape cannot be represented in the target format.
    #[error("cannot encode node at {path} as {format}: {reason}")]
    Unsupported {
        format: &'static str,
        path: NodePath,
        reason: String,
    },
}

/// Parse a JSON document into a [`ConfigNode`] tree.
pub fn from_json_str(raw: &str) -> Result<ConfigNode, CodecError> {
    Ok(serde_json::from_str(raw)?)
}

/// Parse JSON bytes into a [`ConfigNode`] tree.
pub fn from_json_slice(bytes: &[u8]) -> Result<ConfigNode, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Serialize a [`ConfigNode`] tree as JSON text.
pub fn to_json_string(node: &ConfigNode, pretty: bool) -> Result<String, CodecError> {
    let out = if pretty {
        serde_json::to_string_pretty(node)?
    } else {
        serde_json::to_string(node)?
    };
    Ok(out)
}

/// Parse a TOML document into a [`ConfigNode`] mapping.
pub fn from_toml_str(raw: &str) -> Result<ConfigNode, CodecError> {
    Ok(toml::from_str(raw)?)
}

/// Serialize a [`ConfigNode`] mapping as TOML text.
///
/// TOML has no null and requires a table at the top level, so trees with
/// either shape are rejected with [`CodecError::Unsupported`].
pub fn to_toml_string(node: &ConfigNode) -> Result<String, CodecError> {
    if !matches!(node, ConfigNode::Mapping(_)) {
        return Err(CodecError::Unsupported {
            format: "TOML",
            path: NodePath::root(),
            reason: format!("top level must be a mapping, found {}", node.kind_name()),
        });
    }
    if let Some(path) = first_null(node, NodePath::root()) {
        return Err(CodecError::Unsupported {
            format: "TOML",
            path,
            reason: "null values have no TOML representation".to_string(),
        });
    }
    Ok(toml::to_string(node)?)
}

fn first_null(node: &ConfigNode, path: NodePath) -> Option<NodePath> {
    match node {
        ConfigNode::Null => Some(path),
        ConfigNode::Scalar(_) => None,
        ConfigNode::Sequence(items) => items
            .iter()
            .enumerate()
            .find_map(|(idx, item)| first_null(item, path.child(PathSegment::Index(idx)))),
        ConfigNode::Mapping(entries) => entries.iter().find_map(|(key, value)| {
            first_null(value, path.child(PathSegment::Key(key.clone())))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{to_toml_string, CodecError};
    use crate::ConfigNode;

    #[test]
    fn toml_rejects_nested_null_with_path() {
        let node = ConfigNode::from_entries([(
            "device",
            ConfigNode::from_entries([("description", ConfigNode::Null)]),
        )]);

        let err = to_toml_string(&node).expect_err("null must be rejected");
        match err {
            CodecError::Unsupported { path, .. } => {
                assert_eq!(path.to_string(), "/device/description")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
