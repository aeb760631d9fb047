//! Schema fragment construction.
//!
//! Schemas are derived, never stored: each adapter builds its fragment with
//! these helpers while the registry walks the same resolution path decode
//! and encode use. Every fragment carries `type` and `class`.

use config_node::{ConfigNode, Mapping};

use crate::descriptor::PropertyDescriptor;

/// Key under which a map schema describes values for any key.
pub const ANY_KEY: &str = "*";

/// A fragment with the mandatory `type` and `class` entries.
pub fn fragment(schema_type: &str, class: &str) -> Mapping {
    let mut out = Mapping::new();
    out.insert("type".to_string(), ConfigNode::string(schema_type));
    out.insert("class".to_string(), ConfigNode::string(class));
    out
}

/// Add descriptor-level annotations (`description`, `default`) to a field fragment.
pub fn annotate(node: ConfigNode, property: &PropertyDescriptor) -> ConfigNode {
    let ConfigNode::Mapping(mut entries) = node else {
        return node;
    };
    if let Some(description) = property.description() {
        entries.insert("description".to_string(), ConfigNode::string(description));
    }
    if let Some(default) = property.default_value() {
        entries.insert("default".to_string(), default.clone());
    }
    ConfigNode::Mapping(entries)
}
