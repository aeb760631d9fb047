use std::collections::BTreeSet;

use config_node::ConfigNode;

use crate::adapter::TypeAdapter;
use crate::descriptor::PropertyDescriptor;
use crate::error::ConfigError;
use crate::normalize;
use crate::schema::fragment;
use crate::traversal::Traversal;
use crate::value::ConfigValue;

fn decode_items(
    node: &ConfigNode,
    property: &PropertyDescriptor,
    cx: &mut Traversal<'_>,
) -> Result<Vec<ConfigValue>, ConfigError> {
    let ConfigNode::Sequence(items) = node else {
        return Err(ConfigError::node_mismatch("sequence", node));
    };

    let element = cx.value_slot(property)?;
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| element.decode(item.clone(), cx).map_err(|err| err.at(idx)))
        .collect()
}

fn encode_items<'a>(
    items: impl Iterator<Item = &'a ConfigValue>,
    property: &PropertyDescriptor,
    cx: &mut Traversal<'_>,
) -> Result<ConfigNode, ConfigError> {
    let element = cx.value_slot(property)?;
    let encoded = items
        .enumerate()
        .map(|(idx, item)| element.encode(item, cx).map_err(|err| err.at(idx)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ConfigNode::Sequence(encoded))
}

fn items_schema(
    class: &str,
    property: &PropertyDescriptor,
    cx: &mut Traversal<'_>,
) -> Result<ConfigNode, ConfigError> {
    let items = cx.value_slot(property)?.schema(cx)?;
    let mut out = fragment("array", class);
    out.insert("items".to_string(), items);
    Ok(ConfigNode::Mapping(out))
}

/// Ordered sequences; element order is kept in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListAdapter;

impl TypeAdapter for ListAdapter {
    fn name(&self) -> &'static str {
        "list"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        decode_items(node, property, cx).map(ConfigValue::List)
    }

    fn encode(
        &self,
        value: &ConfigValue,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        match value {
            ConfigValue::Null => Ok(ConfigNode::Null),
            ConfigValue::List(items) => encode_items(items.iter(), property, cx),
            other => Err(ConfigError::TypeMismatch {
                expected: "list".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    fn schema(
        &self,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        items_schema("List", property, cx)
    }

    fn normalize(
        &self,
        node: ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &Traversal<'_>,
    ) -> ConfigNode {
        normalize::to_sequence(node)
    }
}

/// Unordered collections without duplicates.
///
/// Stored as sequences in canonical element order; duplicate elements in
/// the input collapse on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetAdapter;

impl TypeAdapter for SetAdapter {
    fn name(&self) -> &'static str {
        "set"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        let items = decode_items(node, property, cx)?;
        Ok(ConfigValue::Set(items.into_iter().collect::<BTreeSet<_>>()))
    }

    fn encode(
        &self,
        value: &ConfigValue,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        match value {
            ConfigValue::Null => Ok(ConfigNode::Null),
            ConfigValue::Set(items) => encode_items(items.iter(), property, cx),
            other => Err(ConfigError::TypeMismatch {
                expected: "set".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    fn schema(
        &self,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        let mut out = items_schema("Set", property, cx)?;
        out.insert("uniqueItems", ConfigNode::boolean(true));
        Ok(out)
    }

    fn normalize(
        &self,
        node: ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &Traversal<'_>,
    ) -> ConfigNode {
        normalize::to_sequence(node)
    }
}
