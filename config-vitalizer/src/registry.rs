//! The adapter registry, also known as the vitalizer.
//!
//! A [`Registry`] is built once per configuration model: built-in adapters,
//! host adapters for custom kinds, and nested-object types are registered
//! through `&mut self` before the registry is shared. After that it is only
//! read, so `&Registry` can be handed to any number of threads converting
//! independent trees at the same time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use config_node::ConfigNode;
use tracing::{debug, trace};

use crate::adapter::TypeAdapter;
use crate::adapters::{
    BooleanAdapter, EnumAdapter, FloatAdapter, IntegerAdapter, ListAdapter, MapAdapter,
    ObjectAdapter, ReferenceAdapter, SetAdapter, StringAdapter,
};
use crate::descriptor::{ObjectType, PropertyDescriptor, PropertyKind};
use crate::error::ConfigError;
use crate::traversal::Traversal;
use crate::value::{ConfigValue, FromConfigValue, ToConfigValue};

/// Resolves the [`TypeAdapter`] for a property and drives conversions.
pub struct Registry {
    adapters: HashMap<PropertyKind, Arc<dyn TypeAdapter>>,
    object_types: HashMap<String, ObjectType>,
    object_adapter: Arc<dyn TypeAdapter>,
    reference_adapter: Arc<dyn TypeAdapter>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<String> = self.adapters.keys().map(ToString::to_string).collect();
        kinds.sort();
        let mut objects: Vec<&String> = self.object_types.keys().collect();
        objects.sort();
        f.debug_struct("Registry")
            .field("kinds", &kinds)
            .field("object_types", &objects)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Registry {
    /// A registry that only knows references and registered object types.
    pub fn new() -> Self {
        let reference_adapter: Arc<dyn TypeAdapter> = Arc::new(ReferenceAdapter);
        let mut adapters: HashMap<PropertyKind, Arc<dyn TypeAdapter>> = HashMap::new();
        adapters.insert(PropertyKind::Reference, Arc::clone(&reference_adapter));
        Self {
            adapters,
            object_types: HashMap::new(),
            object_adapter: Arc::new(ObjectAdapter),
            reference_adapter,
        }
    }

    /// A registry with adapters for every built-in kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PropertyKind::String, StringAdapter);
        registry.register(PropertyKind::Integer, IntegerAdapter);
        registry.register(PropertyKind::Float, FloatAdapter);
        registry.register(PropertyKind::Boolean, BooleanAdapter);
        registry.register(PropertyKind::Enum, EnumAdapter);
        registry.register(PropertyKind::List, ListAdapter);
        registry.register(PropertyKind::Set, SetAdapter);
        registry.register(PropertyKind::Map, MapAdapter);
        registry
    }

    /// Register `adapter` for `kind`, replacing any earlier registration.
    ///
    /// Registering for [`PropertyKind::Object`] overrides the generic object
    /// adapter for that one type.
    pub fn register(&mut self, kind: PropertyKind, adapter: impl TypeAdapter + 'static) {
        self.register_shared(kind, Arc::new(adapter));
    }

    /// Register an adapter instance that may also be held elsewhere.
    pub fn register_shared(&mut self, kind: PropertyKind, adapter: Arc<dyn TypeAdapter>) {
        debug!(%kind, adapter = adapter.name(), "registering type adapter");
        self.adapters.insert(kind, adapter);
    }

    /// Register a nested-object type, replacing one with the same name.
    pub fn register_object(&mut self, object_type: ObjectType) {
        debug!(
            object_type = object_type.name(),
            fields = object_type.fields().len(),
            "registering object type"
        );
        self.object_types
            .insert(object_type.name().to_string(), object_type);
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.object_types.get(name)
    }

    /// The shared adapter used for every reference-valued slot.
    pub fn reference_adapter(&self) -> Arc<dyn TypeAdapter> {
        Arc::clone(&self.reference_adapter)
    }

    /// Select the adapter for `property` by its declared kind.
    pub fn resolve_adapter(
        &self,
        property: &PropertyDescriptor,
    ) -> Result<Arc<dyn TypeAdapter>, ConfigError> {
        let kind = property.kind();
        if let Some(adapter) = self.adapters.get(kind) {
            trace!(%kind, adapter = adapter.name(), "resolved type adapter");
            return Ok(Arc::clone(adapter));
        }
        if let PropertyKind::Object(name) = kind {
            if self.object_types.contains_key(name) {
                trace!(%kind, "resolved object adapter");
                return Ok(Arc::clone(&self.object_adapter));
            }
        }
        debug!(%kind, property = property.name(), "no type adapter registered");
        Err(ConfigError::AdapterNotFound { kind: kind.clone() })
    }

    /// Normalize `node`, then decode it as `property`.
    pub fn decode(
        &self,
        node: &ConfigNode,
        property: &PropertyDescriptor,
    ) -> Result<ConfigValue, ConfigError> {
        let mut cx = Traversal::new(self);
        cx.slot(property)?.decode(node.clone(), &mut cx)
    }

    /// Encode `value` as `property`.
    pub fn encode(
        &self,
        value: &ConfigValue,
        property: &PropertyDescriptor,
    ) -> Result<ConfigNode, ConfigError> {
        let mut cx = Traversal::new(self);
        cx.slot(property)?.encode(value, &mut cx)
    }

    /// Describe the tree shape of `property`.
    pub fn schema(&self, property: &PropertyDescriptor) -> Result<ConfigNode, ConfigError> {
        let mut cx = Traversal::new(self);
        cx.slot(property)?.schema(&mut cx)
    }

    /// Apply the property's normalization to `node`.
    ///
    /// Fails only when no adapter can be resolved for the property.
    pub fn normalize(
        &self,
        node: ConfigNode,
        property: &PropertyDescriptor,
    ) -> Result<ConfigNode, ConfigError> {
        let cx = Traversal::new(self);
        Ok(cx.slot(property)?.normalize(node, &cx))
    }

    /// Decode straight into a Rust type.
    pub fn decode_as<T: FromConfigValue>(
        &self,
        node: &ConfigNode,
        property: &PropertyDescriptor,
    ) -> Result<T, ConfigError> {
        T::from_config_value(self.decode(node, property)?)
    }

    /// Encode a Rust value.
    pub fn encode_from<T: ToConfigValue + ?Sized>(
        &self,
        value: &T,
        property: &PropertyDescriptor,
    ) -> Result<ConfigNode, ConfigError> {
        self.encode(&value.to_config_value(), property)
    }
}
