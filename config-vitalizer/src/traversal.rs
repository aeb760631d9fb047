use std::sync::Arc;

use config_node::ConfigNode;
use tracing::{debug, warn};

use crate::adapter::TypeAdapter;
use crate::descriptor::PropertyDescriptor;
use crate::error::ConfigError;
use crate::registry::Registry;
use crate::value::ConfigValue;

/// An adapter resolved for one descriptor slot.
///
/// Pairs the adapter with the (pseudo-)property it converts so that the
/// normalize-then-decode sequence cannot be applied with the wrong property.
#[derive(Debug, Clone)]
pub struct Slot<'p> {
    adapter: Arc<dyn TypeAdapter>,
    property: &'p PropertyDescriptor,
}

impl<'p> Slot<'p> {
    pub fn adapter(&self) -> &Arc<dyn TypeAdapter> {
        &self.adapter
    }

    pub fn property(&self) -> &'p PropertyDescriptor {
        self.property
    }

    pub fn normalize(&self, node: ConfigNode, cx: &Traversal<'_>) -> ConfigNode {
        self.adapter.normalize(node, self.property, cx)
    }

    /// Normalize `node`, then decode it.
    pub fn decode(&self, node: ConfigNode, cx: &mut Traversal<'_>) -> Result<ConfigValue, ConfigError> {
        let node = self.adapter.normalize(node, self.property, cx);
        self.adapter.decode(&node, self.property, cx)
    }

    pub fn encode(&self, value: &ConfigValue, cx: &mut Traversal<'_>) -> Result<ConfigNode, ConfigError> {
        self.adapter.encode(value, self.property, cx)
    }

    pub fn schema(&self, cx: &mut Traversal<'_>) -> Result<ConfigNode, ConfigError> {
        self.adapter.schema(self.property, cx)
    }
}

/// State of a single decode, encode or schema walk.
///
/// Borrows the shared [`Registry`] and tracks the object types currently
/// being expanded, so a type that contains itself fails fast instead of
/// recursing without bound.
#[derive(Debug)]
pub struct Traversal<'r> {
    registry: &'r Registry,
    expanding: Vec<String>,
}

impl<'r> Traversal<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            expanding: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Adapter for `property` itself.
    pub fn slot<'p>(&self, property: &'p PropertyDescriptor) -> Result<Slot<'p>, ConfigError> {
        Ok(Slot {
            adapter: self.registry.resolve_adapter(property)?,
            property,
        })
    }

    /// Adapter for the key parameter of a map property. Never overridden.
    pub fn key_slot<'p>(&self, property: &'p PropertyDescriptor) -> Result<Slot<'p>, ConfigError> {
        let key = property
            .key_parameter()
            .ok_or_else(|| ConfigError::missing_parameter(property.kind(), "key"))?;
        self.slot(key)
    }

    /// Adapter for the value parameter of a container property.
    ///
    /// When the property declares that its values are references, the
    /// registry's reference adapter replaces whatever the value type would
    /// resolve to. Every container uses this one entry point on the decode,
    /// encode and schema paths, which keeps the three consistent.
    pub fn value_slot<'p>(&self, property: &'p PropertyDescriptor) -> Result<Slot<'p>, ConfigError> {
        let value = property
            .value_parameter()
            .ok_or_else(|| ConfigError::missing_parameter(property.kind(), "value"))?;

        if property.modifiers().values_are_references {
            debug!(
                property = property.name(),
                declared = %value.kind(),
                "values are references; using reference adapter"
            );
            return Ok(Slot {
                adapter: self.registry.reference_adapter(),
                property: value,
            });
        }
        self.slot(value)
    }

    /// Run `f` with `type_name` marked as being expanded.
    pub fn expand_object<T>(
        &mut self,
        type_name: &str,
        f: impl FnOnce(&mut Self) -> Result<T, ConfigError>,
    ) -> Result<T, ConfigError> {
        if self.expanding.iter().any(|name| name == type_name) {
            let mut chain = self.expanding.clone();
            chain.push(type_name.to_string());
            warn!(chain = ?chain, "cyclic object type expansion");
            return Err(ConfigError::CyclicType { chain });
        }

        self.expanding.push(type_name.to_string());
        let result = f(self);
        self.expanding.pop();
        result
    }
}
