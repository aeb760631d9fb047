//! Built-in type adapters.

mod list;
mod map;
mod object;
mod reference;
mod scalar;

pub use list::{ListAdapter, SetAdapter};
pub use map::MapAdapter;
pub use object::ObjectAdapter;
pub use reference::{reference_node, reference_target, ReferenceAdapter, REFERENCE_KEY};
pub use scalar::{BooleanAdapter, EnumAdapter, FloatAdapter, IntegerAdapter, StringAdapter};
