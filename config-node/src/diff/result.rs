use serde::Serialize;

use crate::ConfigNode;

/// A single diff outcome for a node path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DiffEntry {
    /// Node exists in both with identical content.
    Identical { path: String },
    /// Leaf exists in both but the values differ.
    Modified {
        path: String,
        left: String,
        right: String,
    },
    /// Node only in the left input.
    OnlyLeft { path: String, node: ConfigNode },
    /// Node only in the right input.
    OnlyRight { path: String, node: ConfigNode },
    /// Structural mismatch (for example, a mapping compared with a sequence).
    Structural { path: String, description: String },
}

impl DiffEntry {
    pub fn path(&self) -> &str {
        match self {
            DiffEntry::Identical { path }
            | DiffEntry::Modified { path, .. }
            | DiffEntry::OnlyLeft { path, .. }
            | DiffEntry::OnlyRight { path, .. }
            | DiffEntry::Structural { path, .. } => path,
        }
    }

    /// True for every entry except [`DiffEntry::Identical`].
    pub fn is_change(&self) -> bool {
        !matches!(self, DiffEntry::Identical { .. })
    }
}
