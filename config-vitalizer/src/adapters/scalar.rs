use config_node::{ConfigNode, Scalar};

use crate::adapter::TypeAdapter;
use crate::descriptor::PropertyDescriptor;
use crate::error::ConfigError;
use crate::normalize;
use crate::schema::fragment;
use crate::traversal::Traversal;
use crate::value::ConfigValue;

fn value_mismatch(expected: &str, value: &ConfigValue) -> ConfigError {
    ConfigError::TypeMismatch {
        expected: expected.to_string(),
        found: value.kind_name().to_string(),
    }
}

/// Free-form strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringAdapter;

impl TypeAdapter for StringAdapter {
    fn name(&self) -> &'static str {
        "string"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        match node {
            ConfigNode::Null => Ok(ConfigValue::Null),
            ConfigNode::Scalar(Scalar::String(value)) => Ok(ConfigValue::String(value.clone())),
            other => Err(ConfigError::node_mismatch("string", other)),
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
            ConfigValue::String(value) => Ok(ConfigNode::string(value.as_str())),
            other => Err(value_mismatch("string", other)),
        }
    }

    fn schema(
        &self,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        Ok(ConfigNode::Mapping(fragment("string", "String")))
    }

    fn normalize(
        &self,
        node: ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &Traversal<'_>,
    ) -> ConfigNode {
        normalize::to_string_scalar(node)
    }
}

/// Signed 64-bit integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerAdapter;

impl TypeAdapter for IntegerAdapter {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        match node {
            ConfigNode::Null => Ok(ConfigValue::Null),
            ConfigNode::Scalar(Scalar::Integer(value)) => Ok(ConfigValue::Integer(*value)),
            other => Err(ConfigError::node_mismatch("integer", other)),
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
            ConfigValue::Integer(value) => Ok(ConfigNode::integer(*value)),
            other => Err(value_mismatch("integer", other)),
        }
    }

    fn schema(
        &self,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        Ok(ConfigNode::Mapping(fragment("integer", "Integer")))
    }

    fn normalize(
        &self,
        node: ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &Traversal<'_>,
    ) -> ConfigNode {
        normalize::to_integer(node)
    }
}

/// Double-precision floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatAdapter;

impl TypeAdapter for FloatAdapter {
    fn name(&self) -> &'static str {
        "float"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        match node {
            ConfigNode::Null => Ok(ConfigValue::Null),
            ConfigNode::Scalar(Scalar::Float(value)) => Ok(ConfigValue::Float(*value)),
            other => Err(ConfigError::node_mismatch("float", other)),
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
            ConfigValue::Float(value) => Ok(ConfigNode::float(*value)),
            other => Err(value_mismatch("float", other)),
        }
    }

    fn schema(
        &self,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        Ok(ConfigNode::Mapping(fragment("number", "Float")))
    }

    fn normalize(
        &self,
        node: ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &Traversal<'_>,
    ) -> ConfigNode {
        normalize::to_float(node)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanAdapter;

impl TypeAdapter for BooleanAdapter {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        match node {
            ConfigNode::Null => Ok(ConfigValue::Null),
            ConfigNode::Scalar(Scalar::Bool(value)) => Ok(ConfigValue::Bool(*value)),
            other => Err(ConfigError::node_mismatch("bool", other)),
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
            ConfigValue::Bool(value) => Ok(ConfigNode::boolean(*value)),
            other => Err(value_mismatch("bool", other)),
        }
    }

    fn schema(
        &self,
        _property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        Ok(ConfigNode::Mapping(fragment("boolean", "Boolean")))
    }

    fn normalize(
        &self,
        node: ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &Traversal<'_>,
    ) -> ConfigNode {
        normalize::to_bool(node)
    }
}

/// Strings restricted to the descriptor's enum values.
///
/// A descriptor without enum values accepts any string.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumAdapter;

impl EnumAdapter {
    fn check(value: &str, property: &PropertyDescriptor) -> Result<(), ConfigError> {
        let allowed = property.enum_values();
        if allowed.is_empty() || allowed.iter().any(|candidate| candidate == value) {
            return Ok(());
        }
        Err(ConfigError::invalid(format!(
            "'{value}' is not one of [{}]",
            allowed.join(", ")
        )))
    }
}

impl TypeAdapter for EnumAdapter {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn decode(
        &self,
        node: &ConfigNode,
        property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        match node {
            ConfigNode::Null => Ok(ConfigValue::Null),
            ConfigNode::Scalar(Scalar::String(value)) => {
                Self::check(value, property)?;
                Ok(ConfigValue::Enum(value.clone()))
            }
            other => Err(ConfigError::node_mismatch("enum string", other)),
        }
    }

    fn encode(
        &self,
        value: &ConfigValue,
        property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        match value {
            ConfigValue::Null => Ok(ConfigNode::Null),
            ConfigValue::Enum(value) | ConfigValue::String(value) => {
                Self::check(value, property)?;
                Ok(ConfigNode::string(value.as_str()))
            }
            other => Err(value_mismatch("enum", other)),
        }
    }

    fn schema(
        &self,
        property: &PropertyDescriptor,
        _cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError> {
        let mut out = fragment("string", "Enum");
        if !property.enum_values().is_empty() {
            let values = property
                .enum_values()
                .iter()
                .map(|value| ConfigNode::string(value.as_str()))
                .collect();
            out.insert("enum".to_string(), ConfigNode::Sequence(values));
        }
        Ok(ConfigNode::Mapping(out))
    }

    fn normalize(
        &self,
        node: ConfigNode,
        _property: &PropertyDescriptor,
        _cx: &Traversal<'_>,
    ) -> ConfigNode {
        normalize::to_string_scalar(node)
    }
}
