//! Generic configuration tree primitives used by higher-level tools.
//!
//! [`ConfigNode`] is the self-describing wire form of configuration: nested
//! mappings, sequences and scalars as a document store or file would hold
//! them. This crate knows nothing about typed configuration; it provides the
//! tree itself, JSON/TOML codecs, node paths and path patterns, tree diffing,
//! and the [`TreeSource`]/[`TreeSink`] boundary storage backends implement.

pub mod codec;
pub mod diff;
pub mod format;
pub mod path;
pub mod store;
pub mod tree;

pub use codec::{
    from_json_slice, from_json_str, from_toml_str, to_json_string, to_toml_string, CodecError,
};
pub use diff::{diff, diff_with_options, DiffEntry, DiffOptions};
pub use format::{format_json, format_summary, format_text, DiffSummary};
pub use path::{remove_nodes, NodePath, PathPattern, PathSegment, PatternError};
pub use store::{MemoryStore, StoreError, TreeSink, TreeSource};
pub use tree::{ConfigNode, Mapping, Scalar};
