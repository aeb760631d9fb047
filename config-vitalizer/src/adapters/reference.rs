use config_node::{ConfigNode, Scalar};

use crate::adapter::TypeAdapter;
use crate::descriptor::PropertyDescriptor;
use crate::error::ConfigError;
use crate::schema::fragment;
use crate::traversal::Traversal;
use crate::value::{ConfigValue, EntityRef};

/// Mapping key that marks a node as a link instead of an inlined value.
pub const REFERENCE_KEY: &str = "#ref";

/// Build the marker node for a reference to `path`.
pub fn reference_node(path: &str) -> ConfigNode {
    ConfigNode::from_entries([(REFERENCE_KEY, ConfigNode::string(path))])
}

/// Extract the target path if `node` is a reference marker.
pub fn reference_target(node: &ConfigNode) -> Option<&str> {
    let entries = node.as_mapping()?;
    if entries.len() != 1 {
        return None;
    }
    entries.get(REFERENCE_KEY)?.as_str()
}

/// Links to other configuration entities, stored as `{"#ref": path}`.
///
/// The registry holds one shared instance; it serves both properties of kind
/// [`Reference`](crate::PropertyKind::Reference) and container values of
/// properties that declare their values to be references.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceAdapter;

impl TypeAdapter for ReferenceAdapter {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        if node.is_null() {
            return Ok(ConfigValue::Null);
        }
        match reference_target(node) {
            Some(path) if !path.is_empty() => Ok(ConfigValue::Reference(EntityRef::new(path))),
            Some(_) => Err(ConfigError::invalid("reference path is empty")),
            None => Err(ConfigError::node_mismatch("reference marker", node)),
        }
    }

    fn encode(
        &self,
        value: &ConfigValue,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        match value {
            ConfigValue::Null => Ok(ConfigNode::Null),
            ConfigValue::Reference(target) => Ok(reference_node(target.path())),
            other => Err(ConfigError::TypeMismatch {
                expected: "reference".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    fn schema(
        &self,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        let mut out = fragment("object", "Reference");
        out.insert(
            "properties".to_string(),
            ConfigNode::from_entries([(
                REFERENCE_KEY,
                ConfigNode::Mapping(fragment("string", "String")),
            )]),
        );
        Ok(ConfigNode::Mapping(out))
    }

    /// A bare string is shorthand for a reference to that path.
    fn normalize(
        &self,
        node: ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &Traversal<'_>,
    ) -> ConfigNode {
        match node {
            ConfigNode::Scalar(Scalar::String(path)) => reference_node(&path),
            other => other,
        }
    }
}
