//! Typed configuration values.
//!
//! [`ConfigValue`] is the typed side of every conversion: adapters decode
//! tree nodes into it and encode it back. Unlike a tree node it keeps the
//! distinctions the descriptor model cares about (sets versus lists,
//! references versus inlined objects, enum members versus free strings) and
//! it is totally ordered, so any value can key a map or populate a set.
//!
//! [`FromConfigValue`] and [`ToConfigValue`] bridge to ordinary Rust types.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

use crate::error::ConfigError;

/// Link to another configuration entity, identified by its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    path: String,
}

impl EntityRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.path)
    }
}

/// A typed configuration value.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Enum(String),
    Reference(EntityRef),
    List(Vec<ConfigValue>),
    Set(BTreeSet<ConfigValue>),
    Map(BTreeMap<ConfigValue, ConfigValue>),
    /// Nested object, field name to value.
    Object(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    pub fn string(value: impl Into<String>) -> Self {
        ConfigValue::String(value.into())
    }

    pub fn reference(path: impl Into<String>) -> Self {
        ConfigValue::Reference(EntityRef::new(path))
    }

    /// Build a map value from typed key/value pairs.
    pub fn map_of<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ConfigValue, ConfigValue)>,
    {
        ConfigValue::Map(entries.into_iter().collect())
    }

    /// Build an object value from named fields.
    pub fn object_of<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigValue)>,
    {
        ConfigValue::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of the value flavour, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::Enum(_) => "enum",
            ConfigValue::Reference(_) => "reference",
            ConfigValue::List(_) => "list",
            ConfigValue::Set(_) => "set",
            ConfigValue::Map(_) => "map",
            ConfigValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(value) | ConfigValue::Enum(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<ConfigValue, ConfigValue>> {
        match self {
            ConfigValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Field of an object value.
    pub fn field(&self, name: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ConfigValue::Null => 0,
            ConfigValue::Bool(_) => 1,
            ConfigValue::Integer(_) => 2,
            ConfigValue::Float(_) => 3,
            ConfigValue::String(_) => 4,
            ConfigValue::Enum(_) => 5,
            ConfigValue::Reference(_) => 6,
            ConfigValue::List(_) => 7,
            ConfigValue::Set(_) => 8,
            ConfigValue::Map(_) => 9,
            ConfigValue::Object(_) => 10,
        }
    }

    fn mismatch(&self, expected: &str) -> ConfigError {
        ConfigError::TypeMismatch {
            expected: expected.to_string(),
            found: self.kind_name().to_string(),
        }
    }
}

impl Ord for ConfigValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ConfigValue::Null, ConfigValue::Null) => Ordering::Equal,
            (ConfigValue::Bool(a), ConfigValue::Bool(b)) => a.cmp(b),
            (ConfigValue::Integer(a), ConfigValue::Integer(b)) => a.cmp(b),
            (ConfigValue::Float(a), ConfigValue::Float(b)) => a.total_cmp(b),
            (ConfigValue::String(a), ConfigValue::String(b))
            | (ConfigValue::Enum(a), ConfigValue::Enum(b)) => a.cmp(b),
            (ConfigValue::Reference(a), ConfigValue::Reference(b)) => a.cmp(b),
            (ConfigValue::List(a), ConfigValue::List(b)) => a.cmp(b),
            (ConfigValue::Set(a), ConfigValue::Set(b)) => a.cmp(b),
            (ConfigValue::Map(a), ConfigValue::Map(b)) => a.cmp(b),
            (ConfigValue::Object(a), ConfigValue::Object(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for ConfigValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ConfigValue {}

impl Display for ConfigValue {
    /// Strings render bare so that map keys read naturally in error paths.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("null"),
            ConfigValue::Bool(value) => write!(f, "{value}"),
            ConfigValue::Integer(value) => write!(f, "{value}"),
            ConfigValue::Float(value) => write!(f, "{value}"),
            ConfigValue::String(value) | ConfigValue::Enum(value) => f.write_str(value),
            ConfigValue::Reference(target) => write!(f, "{target}"),
            ConfigValue::List(items) => write_seq(f, items.iter()),
            ConfigValue::Set(items) => write_seq(f, items.iter()),
            ConfigValue::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            ConfigValue::Object(fields) => {
                f.write_str("{")?;
                for (idx, (key, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_seq<'a>(f: &mut Formatter<'_>, items: impl Iterator<Item = &'a ConfigValue>) -> fmt::Result {
    f.write_str("[")?;
    for (idx, item) in items.enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

/// Conversion from a typed [`ConfigValue`] into a Rust value.
pub trait FromConfigValue: Sized {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError>;
}

/// Conversion from a Rust value into a typed [`ConfigValue`].
pub trait ToConfigValue {
    fn to_config_value(&self) -> ConfigValue;
}

impl FromConfigValue for ConfigValue {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        Ok(value)
    }
}

impl ToConfigValue for ConfigValue {
    fn to_config_value(&self) -> ConfigValue {
        self.clone()
    }
}

impl FromConfigValue for String {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::String(value) | ConfigValue::Enum(value) => Ok(value),
            other => Err(other.mismatch("string")),
        }
    }
}

impl ToConfigValue for String {
    fn to_config_value(&self) -> ConfigValue {
        ConfigValue::String(self.clone())
    }
}

impl ToConfigValue for str {
    fn to_config_value(&self) -> ConfigValue {
        ConfigValue::String(self.to_string())
    }
}

impl FromConfigValue for i64 {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Integer(value) => Ok(value),
            other => Err(other.mismatch("integer")),
        }
    }
}

impl ToConfigValue for i64 {
    fn to_config_value(&self) -> ConfigValue {
        ConfigValue::Integer(*self)
    }
}

macro_rules! narrow_integer {
    ($($ty:ty),*) => {$(
        impl FromConfigValue for $ty {
            fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
                let wide = i64::from_config_value(value)?;
                <$ty>::try_from(wide).map_err(|_| {
                    ConfigError::invalid(format!(
                        "{wide} is out of range for {}",
                        stringify!($ty)
                    ))
                })
            }
        }

        impl ToConfigValue for $ty {
            fn to_config_value(&self) -> ConfigValue {
                ConfigValue::Integer(i64::from(*self))
            }
        }
    )*};
}

narrow_integer!(i32, u16, u32);

impl FromConfigValue for f64 {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Float(value) => Ok(value),
            other => Err(other.mismatch("float")),
        }
    }
}

impl ToConfigValue for f64 {
    fn to_config_value(&self) -> ConfigValue {
        ConfigValue::Float(*self)
    }
}

impl FromConfigValue for bool {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Bool(value) => Ok(value),
            other => Err(other.mismatch("bool")),
        }
    }
}

impl ToConfigValue for bool {
    fn to_config_value(&self) -> ConfigValue {
        ConfigValue::Bool(*self)
    }
}

impl FromConfigValue for EntityRef {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Reference(target) => Ok(target),
            other => Err(other.mismatch("reference")),
        }
    }
}

impl ToConfigValue for EntityRef {
    fn to_config_value(&self) -> ConfigValue {
        ConfigValue::Reference(self.clone())
    }
}

impl<T: FromConfigValue> FromConfigValue for Option<T> {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Null => Ok(None),
            other => T::from_config_value(other).map(Some),
        }
    }
}

impl<T: ToConfigValue> ToConfigValue for Option<T> {
    fn to_config_value(&self) -> ConfigValue {
        match self {
            Some(value) => value.to_config_value(),
            None => ConfigValue::Null,
        }
    }
}

impl<T: FromConfigValue> FromConfigValue for Vec<T> {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| T::from_config_value(item).map_err(|err| err.at(idx)))
                .collect(),
            other => Err(other.mismatch("list")),
        }
    }
}

impl<T: ToConfigValue> ToConfigValue for Vec<T> {
    fn to_config_value(&self) -> ConfigValue {
        ConfigValue::List(self.iter().map(ToConfigValue::to_config_value).collect())
    }
}

impl<T: FromConfigValue + Ord> FromConfigValue for BTreeSet<T> {
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Set(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| T::from_config_value(item).map_err(|err| err.at(idx)))
                .collect(),
            other => Err(other.mismatch("set")),
        }
    }
}

impl<T: ToConfigValue> ToConfigValue for BTreeSet<T> {
    fn to_config_value(&self) -> ConfigValue {
        ConfigValue::Set(self.iter().map(ToConfigValue::to_config_value).collect())
    }
}

impl<K, V> FromConfigValue for BTreeMap<K, V>
where
    K: FromConfigValue + Ord,
    V: FromConfigValue,
{
    fn from_config_value(value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Map(entries) => entries
                .into_iter()
                .map(|(key, value)| {
                    let segment = key.to_string();
                    let key = K::from_config_value(key).map_err(|err| err.at(segment.as_str()))?;
                    let value = V::from_config_value(value).map_err(|err| err.at(segment))?;
                    Ok((key, value))
                })
                .collect(),
            other => Err(other.mismatch("map")),
        }
    }
}

impl<K: ToConfigValue, V: ToConfigValue> ToConfigValue for BTreeMap<K, V> {
    fn to_config_value(&self) -> ConfigValue {
        ConfigValue::Map(
            self.iter()
                .map(|(key, value)| (key.to_config_value(), value.to_config_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{ConfigValue, FromConfigValue, ToConfigValue};
    use crate::error::ErrorKind;

    #[test]
    fn values_order_by_kind_then_content() {
        let mut values = vec![
            ConfigValue::string("b"),
            ConfigValue::Integer(10),
            ConfigValue::Null,
            ConfigValue::Integer(9),
            ConfigValue::string("a"),
        ];
        values.sort();

        assert_eq!(
            values,
            vec![
                ConfigValue::Null,
                ConfigValue::Integer(9),
                ConfigValue::Integer(10),
                ConfigValue::string("a"),
                ConfigValue::string("b"),
            ]
        );
    }

    #[test]
    fn floats_are_totally_ordered() {
        assert_eq!(ConfigValue::Float(f64::NAN), ConfigValue::Float(f64::NAN));
        assert!(ConfigValue::Float(-1.0) < ConfigValue::Float(0.5));
    }

    #[test]
    fn typed_map_round_trips_through_config_value() {
        let mut ports = BTreeMap::new();
        ports.insert("dicom".to_string(), 104_i64);
        ports.insert("dicom-tls".to_string(), 2762_i64);

        let value = ports.to_config_value();
        let back = BTreeMap::<String, i64>::from_config_value(value).expect("typed map");
        assert_eq!(back, ports);
    }

    #[test]
    fn narrow_integer_reports_range_errors_with_position() {
        let value = ConfigValue::List(vec![ConfigValue::Integer(1), ConfigValue::Integer(70_000)]);

        let err = Vec::<u16>::from_config_value(value).expect_err("out of range");
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert_eq!(err.path().to_string(), "/1");
        assert_eq!(err.root_cause().kind(), ErrorKind::InvalidValue);
    }
}
