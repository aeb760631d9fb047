use std::collections::BTreeSet;

use crate::diff::result::DiffEntry;
use crate::path::NodePath;
use crate::ConfigNode;

/// Configures tree diff behavior.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Include [`DiffEntry::Identical`] rows.
    pub include_identical: bool,
    /// Maximum recursion depth. `-1` means unlimited.
    pub max_depth: i32,
    /// Full paths (`/a/b`) or bare keys to ignore.
    pub ignore_paths: Vec<String>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            include_identical: false,
            max_depth: -1,
            ignore_paths: Vec::new(),
        }
    }
}

/// Diff two trees with default options.
pub fn diff(left: &ConfigNode, right: &ConfigNode) -> Vec<DiffEntry> {
    diff_with_options(left, right, &DiffOptions::default())
}

/// Diff two trees with custom options.
pub fn diff_with_options(
    left: &ConfigNode,
    right: &ConfigNode,
    opts: &DiffOptions,
) -> Vec<DiffEntry> {
    let mut out = Vec::new();
    diff_node(left, right, &NodePath::root(), 0, opts, &mut out);
    out
}

fn diff_node(
    left: &ConfigNode,
    right: &ConfigNode,
    path: &NodePath,
    depth: i32,
    opts: &DiffOptions,
    out: &mut Vec<DiffEntry>,
) {
    if should_ignore(path, opts) {
        return;
    }

    if opts.max_depth >= 0 && depth > opts.max_depth {
        return;
    }

    let start_len = out.len();

    match (left, right) {
        (ConfigNode::Mapping(l), ConfigNode::Mapping(r)) => {
            let keys: BTreeSet<&String> = l.keys().chain(r.keys()).collect();
            for key in keys {
                let child_path = path.child(key.as_str());
                match (l.get(key), r.get(key)) {
                    (Some(lv), Some(rv)) => diff_node(lv, rv, &child_path, depth + 1, opts, out),
                    (Some(lv), None) => push_one_sided(&child_path, lv, true, opts, out),
                    (None, Some(rv)) => push_one_sided(&child_path, rv, false, opts, out),
                    (None, None) => {}
                }
            }
        }
        (ConfigNode::Sequence(l), ConfigNode::Sequence(r)) => {
            let max = l.len().max(r.len());
            for i in 0..max {
                let child_path = path.child(i);
                match (l.get(i), r.get(i)) {
                    (Some(lv), Some(rv)) => diff_node(lv, rv, &child_path, depth + 1, opts, out),
                    (Some(lv), None) => push_one_sided(&child_path, lv, true, opts, out),
                    (None, Some(rv)) => push_one_sided(&child_path, rv, false, opts, out),
                    (None, None) => {}
                }
            }
        }
        (ConfigNode::Mapping(_) | ConfigNode::Sequence(_), _)
        | (_, ConfigNode::Mapping(_) | ConfigNode::Sequence(_)) => {
            out.push(DiffEntry::Structural {
                path: path.to_string(),
                description: format!(
                    "kind mismatch: left={} right={}",
                    left.kind_name(),
                    right.kind_name()
                ),
            });
        }
        _ => {
            if left != right {
                out.push(DiffEntry::Modified {
                    path: path.to_string(),
                    left: left.to_string(),
                    right: right.to_string(),
                });
            }
        }
    }

    if opts.include_identical && out.len() == start_len {
        out.push(DiffEntry::Identical {
            path: path.to_string(),
        });
    }
}

fn push_one_sided(
    path: &NodePath,
    node: &ConfigNode,
    left_side: bool,
    opts: &DiffOptions,
    out: &mut Vec<DiffEntry>,
) {
    if should_ignore(path, opts) {
        return;
    }
    let path = path.to_string();
    let node = node.clone();
    out.push(if left_side {
        DiffEntry::OnlyLeft { path, node }
    } else {
        DiffEntry::OnlyRight { path, node }
    });
}

fn should_ignore(path: &NodePath, opts: &DiffOptions) -> bool {
    if opts.ignore_paths.is_empty() || path.is_root() {
        return false;
    }
    let rendered = path.to_string();
    let last = path.segments().last().map(ToString::to_string);
    opts.ignore_paths
        .iter()
        .any(|ignore| rendered == *ignore || last.as_deref() == Some(ignore.as_str()))
}
