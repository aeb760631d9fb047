//! Static descriptions of configurable properties.
//!
//! A [`PropertyDescriptor`] is built once per property when a configuration
//! model is registered and never changes afterwards. Generic type arguments
//! are explicit child descriptors (key then value for a map, the element for
//! a list or set), so adapter resolution never needs runtime introspection.

use std::fmt::{self, Display, Formatter};

use config_node::ConfigNode;

/// Declared kind of a property; selects the adapter that converts it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKind {
    String,
    Integer,
    Float,
    Boolean,
    /// String restricted to the descriptor's `enum_values`.
    Enum,
    List,
    Set,
    Map,
    /// Link to another configuration entity.
    Reference,
    /// Nested object of a type registered with the registry.
    Object(String),
    /// Host-defined kind with its own registered adapter.
    Custom(String),
}

impl PropertyKind {
    /// Number of generic parameters the kind expects.
    pub fn arity(&self) -> usize {
        match self {
            PropertyKind::List | PropertyKind::Set => 1,
            PropertyKind::Map => 2,
            _ => 0,
        }
    }

    pub fn is_container(&self) -> bool {
        self.arity() > 0
    }
}

impl Display for PropertyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::String => f.write_str("String"),
            PropertyKind::Integer => f.write_str("Integer"),
            PropertyKind::Float => f.write_str("Float"),
            PropertyKind::Boolean => f.write_str("Boolean"),
            PropertyKind::Enum => f.write_str("Enum"),
            PropertyKind::List => f.write_str("List"),
            PropertyKind::Set => f.write_str("Set"),
            PropertyKind::Map => f.write_str("Map"),
            PropertyKind::Reference => f.write_str("Reference"),
            PropertyKind::Object(name) => write!(f, "Object({name})"),
            PropertyKind::Custom(name) => write!(f, "Custom({name})"),
        }
    }
}

/// Property-level flags that change how values are converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Container values are links to other entities, never inlined values.
    pub values_are_references: bool,
}

/// Immutable description of one typed property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    name: String,
    kind: PropertyKind,
    generic_parameters: Vec<PropertyDescriptor>,
    modifiers: Modifiers,
    enum_values: Vec<String>,
    default: Option<ConfigNode>,
    required: bool,
    description: Option<String>,
}

impl PropertyDescriptor {
    /// Create a descriptor with explicit generic parameters.
    pub fn new(kind: PropertyKind, generic_parameters: Vec<PropertyDescriptor>) -> Self {
        Self {
            name: String::new(),
            kind,
            generic_parameters,
            modifiers: Modifiers::default(),
            enum_values: Vec::new(),
            default: None,
            required: false,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(PropertyKind::String, Vec::new())
    }

    pub fn integer() -> Self {
        Self::new(PropertyKind::Integer, Vec::new())
    }

    pub fn float() -> Self {
        Self::new(PropertyKind::Float, Vec::new())
    }

    pub fn boolean() -> Self {
        Self::new(PropertyKind::Boolean, Vec::new())
    }

    pub fn reference() -> Self {
        Self::new(PropertyKind::Reference, Vec::new())
    }

    /// String property limited to `values`.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Self::new(PropertyKind::Enum, Vec::new());
        out.enum_values = values.into_iter().map(Into::into).collect();
        out
    }

    pub fn list(element: PropertyDescriptor) -> Self {
        Self::new(PropertyKind::List, vec![element])
    }

    pub fn set(element: PropertyDescriptor) -> Self {
        Self::new(PropertyKind::Set, vec![element])
    }

    pub fn map(key: PropertyDescriptor, value: PropertyDescriptor) -> Self {
        Self::new(PropertyKind::Map, vec![key, value])
    }

    /// Nested object of the registered type `type_name`.
    pub fn object(type_name: impl Into<String>) -> Self {
        Self::new(PropertyKind::Object(type_name.into()), Vec::new())
    }

    /// Host-defined kind resolved through a custom adapter registration.
    pub fn custom(kind_name: impl Into<String>) -> Self {
        Self::new(PropertyKind::Custom(kind_name.into()), Vec::new())
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Mark container values as references to other entities.
    pub fn referencing_values(mut self) -> Self {
        self.modifiers.values_are_references = true;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Value used when an object field is absent from the tree.
    pub fn with_default(mut self, default: ConfigNode) -> Self {
        self.default = Some(default);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn generic_parameters(&self) -> &[PropertyDescriptor] {
        &self.generic_parameters
    }

    /// Pseudo-property describing generic parameter `index`.
    pub fn parameter(&self, index: usize) -> Option<&PropertyDescriptor> {
        self.generic_parameters.get(index)
    }

    /// First generic parameter of a map.
    pub fn key_parameter(&self) -> Option<&PropertyDescriptor> {
        match self.kind {
            PropertyKind::Map => self.parameter(0),
            _ => None,
        }
    }

    /// Value slot of a container: the map value or the list/set element.
    pub fn value_parameter(&self) -> Option<&PropertyDescriptor> {
        match self.kind {
            PropertyKind::Map => self.parameter(1),
            PropertyKind::List | PropertyKind::Set => self.parameter(0),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn enum_values(&self) -> &[String] {
        &self.enum_values
    }

    pub fn default_value(&self) -> Option<&ConfigNode> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A nested-object type: an ordered list of named field descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    name: String,
    fields: Vec<PropertyDescriptor>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field; the descriptor's name is the mapping key it is stored under.
    ///
    /// A field with the same name replaces the earlier one in place.
    pub fn field(mut self, name: impl Into<String>, descriptor: PropertyDescriptor) -> Self {
        let descriptor = descriptor.named(name);
        match self
            .fields
            .iter()
            .position(|field| field.name() == descriptor.name())
        {
            Some(idx) => self.fields[idx] = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[PropertyDescriptor] {
        &self.fields
    }

    pub fn field_named(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }
}
