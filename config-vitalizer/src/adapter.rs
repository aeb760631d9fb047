use std::fmt::Debug;

use config_node::ConfigNode;

use crate::descriptor::PropertyDescriptor;
use crate::error::ConfigError;
use crate::traversal::Traversal;
use crate::value::ConfigValue;

/// Converter between one declared kind and its tree representation.
///
/// Adapters are stateless and shared between threads; everything a call
/// needs arrives through `property` and the [`Traversal`]. Container adapters
/// resolve the adapters for their generic parameters through the traversal
/// on every call instead of caching them.
pub trait TypeAdapter: Send + Sync + Debug {
    /// Stable adapter name, used in logs.
    fn name(&self) -> &'static str;

    /// Build a typed value from a node that already went through [`TypeAdapter::normalize`].
    fn decode(
        &self,
        node: &ConfigNode,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigValue, ConfigError>;

    /// Build the tree representation of a typed value.
    fn encode(
        &self,
        value: &ConfigValue,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError>;

    /// Describe the node shape this adapter reads and writes.
    fn schema(
        &self,
        property: &PropertyDescriptor,
        cx: &mut Traversal<'_>,
    ) -> Result<ConfigNode, ConfigError>;

    /// Absorb representational looseness before decoding.
    ///
    /// Must be idempotent and never fail; nodes that cannot be coerced are
    /// returned unchanged and rejected later by `decode`.
    fn normalize(
        &self,
        node: ConfigNode,
        property: &PropertyDescriptor,
        cx: &Traversal<'_>,
    ) -> ConfigNode;
}
