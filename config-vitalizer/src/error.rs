use config_node::{ConfigNode, NodePath, PathSegment};
use thiserror::Error;

use crate::descriptor::PropertyKind;

/// Category of a [`ConfigError`], independent of positional context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AdapterNotFound,
    TypeMismatch,
    InvalidValue,
    Conversion,
    CyclicType,
    MalformedDescriptor,
}

/// Errors raised while resolving adapters or converting configuration.
///
/// Leaf errors carry no position; containers attach the failing key or index
/// with [`ConfigError::at`], which produces a [`ConfigError::Conversion`]
/// whose path leads from the converted root to the offending node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No adapter is registered for the declared kind.
    #[error("no type adapter registered for {kind}")]
    AdapterNotFound { kind: PropertyKind },
    /// The node or value does not have the shape the adapter requires.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    /// The shape is right but the content is not acceptable.
    #[error("invalid value: {message}")]
    InvalidValue { message: String },
    /// A nested key, index or field failed to convert.
    #[error("failed to convert {path}: {source}")]
    Conversion {
        path: NodePath,
        source: Box<ConfigError>,
    },
    /// Type expansion re-entered an object type already being expanded.
    #[error("cyclic type expansion: {}", chain.join(" -> "))]
    CyclicType { chain: Vec<String> },
    /// The descriptor lacks generic parameters its kind requires.
    #[error("malformed descriptor for {kind}: {reason}")]
    MalformedDescriptor { kind: PropertyKind, reason: String },
}

impl ConfigError {
    /// Mismatch between the expected shape and an actual tree node.
    pub fn node_mismatch(expected: impl Into<String>, found: &ConfigNode) -> Self {
        ConfigError::TypeMismatch {
            expected: expected.into(),
            found: found.kind_name().to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            message: message.into(),
        }
    }

    pub fn missing_parameter(kind: &PropertyKind, slot: &str) -> Self {
        ConfigError::MalformedDescriptor {
            kind: kind.clone(),
            reason: format!("missing {slot} type parameter"),
        }
    }

    /// Attach positional context.
    ///
    /// Type-level failures (missing adapter, cyclic type, malformed
    /// descriptor) do not depend on the data and pass through unchanged.
    pub fn at(self, segment: impl Into<PathSegment>) -> Self {
        match self {
            ConfigError::Conversion { mut path, source } => {
                path.prepend(segment);
                ConfigError::Conversion { path, source }
            }
            ConfigError::AdapterNotFound { .. }
            | ConfigError::CyclicType { .. }
            | ConfigError::MalformedDescriptor { .. } => self,
            leaf => ConfigError::Conversion {
                path: NodePath::root().child(segment),
                source: Box::new(leaf),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::AdapterNotFound { .. } => ErrorKind::AdapterNotFound,
            ConfigError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ConfigError::InvalidValue { .. } => ErrorKind::InvalidValue,
            ConfigError::Conversion { .. } => ErrorKind::Conversion,
            ConfigError::CyclicType { .. } => ErrorKind::CyclicType,
            ConfigError::MalformedDescriptor { .. } => ErrorKind::MalformedDescriptor,
        }
    }

    /// Path of the failing node; the root for errors without position.
    pub fn path(&self) -> NodePath {
        match self {
            ConfigError::Conversion { path, .. } => path.clone(),
            _ => NodePath::root(),
        }
    }

    /// The innermost error, skipping positional wrappers.
    pub fn root_cause(&self) -> &ConfigError {
        match self {
            ConfigError::Conversion { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
