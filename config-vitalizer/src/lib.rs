//! Type-driven conversion between typed configuration values and generic
//! configuration trees.
//!
//! A configuration model is described once as [`PropertyDescriptor`]s (and
//! [`ObjectType`]s for nested objects). A [`Registry`] then resolves the
//! [`TypeAdapter`] for each property by its declared kind, recursing through
//! generic parameters, to:
//!
//! - decode a [`ConfigNode`](config_node::ConfigNode) tree read from storage
//!   into a typed [`ConfigValue`],
//! - encode a typed value back into a tree for persistence,
//! - derive a schema describing the tree shape,
//! - normalize loosely shaped input before decoding.
//!
//! # Example
//!
//! ```
//! use config_vitalizer::{ConfigValue, PropertyDescriptor, Registry};
//!
//! let registry = Registry::with_defaults();
//! let ports = PropertyDescriptor::map(PropertyDescriptor::string(), PropertyDescriptor::integer());
//!
//! let value = ConfigValue::map_of([
//!     (ConfigValue::string("dicom-tls"), ConfigValue::Integer(2762)),
//!     (ConfigValue::string("dicom"), ConfigValue::Integer(104)),
//! ]);
//! let node = registry.encode(&value, &ports).unwrap();
//! assert_eq!(node.to_string(), r#"{"dicom":104,"dicom-tls":2762}"#);
//! assert_eq!(registry.decode(&node, &ports).unwrap(), value);
//! ```
//!
//! # References
//!
//! A container property marked with
//! [`PropertyDescriptor::referencing_values`] stores its values as
//! `{"#ref": path}` links through the registry's shared reference adapter,
//! whatever adapter the value type would otherwise resolve to.

pub mod adapter;
pub mod adapters;
pub mod consistency;
pub mod descriptor;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod schema;
pub mod traversal;
pub mod value;

pub use adapter::TypeAdapter;
pub use consistency::RoundTripReport;
pub use descriptor::{Modifiers, ObjectType, PropertyDescriptor, PropertyKind};
pub use error::{ConfigError, ErrorKind};
pub use registry::Registry;
pub use traversal::{Slot, Traversal};
pub use value::{ConfigValue, EntityRef, FromConfigValue, ToConfigValue};
