use std::collections::BTreeMap;

use config_node::{ConfigNode, Mapping, Scalar};

use crate::adapter::TypeAdapter;
use crate::descriptor::PropertyDescriptor;
use crate::error::ConfigError;
use crate::normalize;
use crate::schema::{fragment, ANY_KEY};
use crate::traversal::Traversal;
use crate::value::ConfigValue;

/// Maps with typed keys and values.
///
/// Both directions produce canonically ordered output: decoded maps are
/// ordered by typed key, encoded mappings by string key. Source order in
/// the input tree is not preserved, which keeps persisted configuration
/// stable across load/save cycles.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapAdapter;

impl TypeAdapter for MapAdapter {
    fn name(&self) -> &'static str {
        "map"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        let ConfigNode::Mapping(entries) = node else {
            return Err(ConfigError::node_mismatch("mapping", node));
        };

        let key_slot = cx.key_slot(property)?;
        let value_slot = cx.value_slot(property)?;

        let mut map = BTreeMap::new();
        for (raw_key, raw_value) in entries {
            let key = key_slot
                .decode(ConfigNode::string(raw_key.as_str()), cx)
                .map_err(|err| err.at(raw_key.as_str()))?;
            let value = value_slot
                .decode(raw_value.clone(), cx)
                .map_err(|err| err.at(raw_key.as_str()))?;
            if map.insert(key, value).is_some() {
                return Err(ConfigError::invalid("distinct keys decode to the same key")
                    .at(raw_key.as_str()));
            }
        }
        Ok(ConfigValue::Map(map))
    }

    fn encode(
        &self,
        value: &ConfigValue,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        let entries = match value {
            ConfigValue::Null => return Ok(ConfigNode::Null),
            ConfigValue::Map(entries) => entries,
            other => {
                return Err(ConfigError::TypeMismatch {
                    expected: "map".to_string(),
                    found: other.kind_name().to_string(),
                })
            }
        };

        let key_slot = cx.key_slot(property)?;
        let value_slot = cx.value_slot(property)?;

        let mut out = Mapping::new();
        for (key, value) in entries {
            let encoded_key = match key_slot.encode(key, cx) {
                Ok(ConfigNode::Scalar(Scalar::Float(value))) if !value.is_finite() => {
                    return Err(ConfigError::invalid("map keys must be finite numbers")
                        .at(key.to_string()))
                }
                Ok(ConfigNode::Scalar(scalar)) => scalar.to_string(),
                Ok(other) => {
                    return Err(ConfigError::node_mismatch("scalar map key", &other)
                        .at(key.to_string()))
                }
                Err(err) => return Err(err.at(key.to_string())),
            };
            let encoded_value = value_slot
                .encode(value, cx)
                .map_err(|err| err.at(encoded_key.as_str()))?;
            if out.insert(encoded_key.clone(), encoded_value).is_some() {
                return Err(ConfigError::invalid("distinct keys encode to the same string")
                    .at(encoded_key));
            }
        }
        Ok(ConfigNode::Mapping(out))
    }

    fn schema(
        &self,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        let key_schema = cx.key_slot(property)?.schema(cx)?;
        let value_schema = cx.value_slot(property)?.schema(cx)?;

        let mut out = fragment("object", "Map");
        out.insert("mapkey".to_string(), key_schema);
        out.insert(
            "properties".to_string(),
            ConfigNode::from_entries([(ANY_KEY, value_schema)]),
        );
        Ok(ConfigNode::Mapping(out))
    }

    fn normalize(
        &self,
        node: ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &Traversal<'_>,
    ) -> ConfigNode {
        normalize::null_to(node, ConfigNode::empty_mapping())
    }
}
