use std::collections::BTreeMap;

use config_node::{ConfigNode, Mapping};
use tracing::debug;

use crate::adapter::TypeAdapter;
use crate::descriptor::{ObjectType, PropertyDescriptor, PropertyKind};
use crate::error::ConfigError;
use crate::normalize;
use crate::schema::{annotate, fragment};
use crate::traversal::Traversal;
use crate::value::ConfigValue;

/// Nested objects whose fields are described by a registered [`ObjectType`].
///
/// Absent and null fields are treated alike: optional ones are left out of
/// the decoded object, ones with a default decode the default. Null fields
/// are not written.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectAdapter;

fn object_type<'r>(
    property: &PropertyDescriptor,
    cx: &Traversal<'r>,
) -> Result<&'r ObjectType, ConfigError> {
    let PropertyKind::Object(name) = property.kind() else {
        return Err(ConfigError::MalformedDescriptor {
            kind: property.kind().clone(),
            reason: "object adapter used for a non-object kind".to_string(),
        });
    };
    cx.registry()
        .object_type(name)
        .ok_or_else(|| ConfigError::AdapterNotFound {
            kind: property.kind().clone(),
        })
}

impl TypeAdapter for ObjectAdapter {
    fn name(&self) -> &'static str {
        "object"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        let ty = object_type(property, cx)?;
        let ConfigNode::Mapping(entries) = node else {
            return Err(ConfigError::node_mismatch("mapping", node));
        };

        cx.expand_object(ty.name(), |cx| {
            let mut fields = BTreeMap::new();
            for field in ty.fields() {
                let present = entries.get(field.name()).filter(|raw| !raw.is_null());
                let raw = match (present, field.default_value()) {
                    (Some(raw), _) => raw.clone(),
                    (None, Some(default)) => default.clone(),
                    (None, None) if field.is_required() => {
                        return Err(ConfigError::invalid("required field is missing")
                            .at(field.name()));
                    }
                    (None, None) => continue,
                };
                let value = cx
                    .slot(field)?
                    .decode(raw, cx)
                    .map_err(|err| err.at(field.name()))?;
                if !value.is_null() {
                    fields.insert(field.name().to_string(), value);
                }
            }

            for key in entries.keys().filter(|key| ty.field_named(key).is_none()) {
                debug!(object_type = ty.name(), key = key.as_str(), "ignoring unknown field");
            }
            Ok(ConfigValue::Object(fields))
        })
    }

    fn encode(
        &self,
        value: &ConfigValue,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        let ty = object_type(property, cx)?;
        let fields = match value {
            ConfigValue::Null => return Ok(ConfigNode::Null),
            ConfigValue::Object(fields) => fields,
            other => {
                return Err(ConfigError::TypeMismatch {
                    expected: format!("object {}", ty.name()),
                    found: other.kind_name().to_string(),
                })
            }
        };

        if let Some(unknown) = fields.keys().find(|key| ty.field_named(key).is_none()) {
            return Err(ConfigError::invalid(format!(
                "{} has no field '{unknown}'",
                ty.name()
            ))
            .at(unknown.as_str()));
        }

        cx.expand_object(ty.name(), |cx| {
            let mut out = Mapping::new();
            for field in ty.fields() {
                let value = fields.get(field.name()).unwrap_or(&ConfigValue::Null);
                if value.is_null() {
                    if field.is_required() {
                        return Err(ConfigError::invalid("required field is missing")
                            .at(field.name()));
                    }
                    continue;
                }
                let node = cx
                    .slot(field)?
                    .encode(value, cx)
                    .map_err(|err| err.at(field.name()))?;
                if !node.is_null() {
                    out.insert(field.name().to_string(), node);
                }
            }
            Ok(ConfigNode::Mapping(out))
        })
    }

    fn schema(
        &self,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        let ty = object_type(property, cx)?;

        cx.expand_object(ty.name(), |cx| {
            let mut properties = Mapping::new();
            let mut required = Vec::new();
            for field in ty.fields() {
                let schema = cx.slot(field)?.schema(cx)?;
                properties.insert(field.name().to_string(), annotate(schema, field));
                if field.is_required() {
                    required.push(ConfigNode::string(field.name()));
                }
            }

            let mut out = fragment("object", ty.name());
            out.insert("properties".to_string(), ConfigNode::Mapping(properties));
            if !required.is_empty() {
                out.insert("required".to_string(), ConfigNode::Sequence(required));
            }
            Ok(ConfigNode::Mapping(out))
        })
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
