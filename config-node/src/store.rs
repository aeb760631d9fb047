use std::collections::BTreeMap;
use std::sync::RwLock;

use thiserror::Error;

use crate::tree::ConfigNode;

/// Errors reported by a tree storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be accessed.
    #[error("tree store unavailable: {0}")]
    Unavailable(String),
    /// The backend rejected the key.
    #[error("invalid tree key '{0}'")]
    InvalidKey(String),
}

/// Supplies materialized configuration trees by key.
pub trait TreeSource {
    /// Read the tree stored under `key`; `Ok(None)` when nothing is stored.
    fn read_tree(&self, key: &str) -> Result<Option<ConfigNode>, StoreError>;
}

/// Accepts configuration trees for persistence.
pub trait TreeSink {
    fn write_tree(&self, key: &str, node: ConfigNode) -> Result<(), StoreError>;
}

/// In-process tree store keyed by string.
#[derive(Debug, Default)]
pub struct MemoryStore {
    trees: RwLock<BTreeMap<String, ConfigNode>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently stored, in order.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let trees = self
            .trees
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(trees.keys().cloned().collect())
    }
}

impl TreeSource for MemoryStore {
    fn read_tree(&self, key: &str) -> Result<Option<ConfigNode>, StoreError> {
        let trees = self
            .trees
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(trees.get(key).cloned())
    }
}

impl TreeSink for MemoryStore {
    fn write_tree(&self, key: &str, node: ConfigNode) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let mut trees = self
            .trees
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        trees.insert(key.to_string(), node);
        Ok(())
    }
}
