//! Node addressing: concrete [`NodePath`]s and declarative [`PathPattern`]s.
//!
//! A `NodePath` names exactly one node and is what errors and diffs report.
//! A `PathPattern` selects any number of nodes, for example
//! `/aes/*[tcGroups]/transferCapabilities` selects the transfer capability
//! list of every application entity that carries a `tcGroups` entry.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use crate::tree::ConfigNode;

/// One step in a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Mapping key.
    Key(String),
    /// Sequence position.
    Index(usize),
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            // JSON-pointer escaping keeps keys containing '/' unambiguous.
            PathSegment::Key(key) => f.write_str(&key.replace('~', "~0").replace('/', "~1")),
            PathSegment::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        PathSegment::Key(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        PathSegment::Key(value)
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        PathSegment::Index(value)
    }
}

/// Location of a single node relative to a tree root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// Insert a segment in front of the path.
    pub fn prepend(&mut self, segment: impl Into<PathSegment>) {
        self.segments.insert(0, segment.into());
    }

    /// Return a new path one level deeper.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut out = self.clone();
        out.push(segment);
        out
    }

    /// Resolve this path against `root`.
    pub fn resolve<'a>(&self, root: &'a ConfigNode) -> Option<&'a ConfigNode> {
        let mut current = root;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Key(key), ConfigNode::Mapping(entries)) => entries.get(key)?,
                (PathSegment::Index(idx), ConfigNode::Sequence(items)) => items.get(*idx)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl FromIterator<PathSegment> for NodePath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Errors produced while parsing a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("path pattern must start with '/': {0}")]
    Relative(String),
    #[error("path pattern selects the root node: {0}")]
    SelectsRoot(String),
    #[error("empty segment in path pattern: {0}")]
    EmptySegment(String),
    #[error("unbalanced brackets in path pattern: {0}")]
    UnbalancedBrackets(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    Any,
    Key(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    matcher: Matcher,
    /// Relative sub-path that must exist below a candidate.
    predicate: Option<Vec<String>>,
}

impl Step {
    fn accepts(&self, key: &str, node: &ConfigNode) -> bool {
        let name_ok = match &self.matcher {
            Matcher::Any => true,
            Matcher::Key(expected) => expected == key,
        };
        name_ok
            && self.predicate.as_ref().map_or(true, |sub| {
                let sub: Vec<&str> = sub.iter().map(String::as_str).collect();
                node.get_path(&sub).is_some()
            })
    }
}

/// Declarative multi-node selector.
///
/// Grammar: `/segment/segment/...` where a segment is a literal key (or a
/// sequence index), `*` for any child, optionally followed by an existence
/// predicate `[relative/sub/path]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    steps: Vec<Step>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let Some(body) = raw.strip_prefix('/') else {
            return Err(PatternError::Relative(raw.to_string()));
        };
        if body.is_empty() {
            return Err(PatternError::SelectsRoot(raw.to_string()));
        }

        let steps = split_top_level(body, raw)?
            .into_iter()
            .map(|segment| parse_step(segment, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            steps,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Return the paths of every node under `root` this pattern selects.
    pub fn find(&self, root: &ConfigNode) -> Vec<NodePath> {
        let mut out = Vec::new();
        collect_matches(root, &self.steps, NodePath::root(), &mut out);
        out
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for PathPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Remove every node `pattern` selects from `root` and return how many were removed.
///
/// Matching mapping entries are deleted; matching sequence elements are
/// removed and the remaining elements shift down.
pub fn remove_nodes(root: &mut ConfigNode, pattern: &PathPattern) -> usize {
    remove_matches(root, &pattern.steps)
}

fn split_top_level<'a>(body: &'a str, raw: &str) -> Result<Vec<&'a str>, PatternError> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in body.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| PatternError::UnbalancedBrackets(raw.to_string()))?;
            }
            '/' if depth == 0 => {
                out.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(PatternError::UnbalancedBrackets(raw.to_string()));
    }
    out.push(&body[start..]);
    Ok(out)
}

fn parse_step(segment: &str, raw: &str) -> Result<Step, PatternError> {
    let (name, predicate) = match segment.find('[') {
        Some(open) => {
            let inner = segment[open + 1..]
                .strip_suffix(']')
                .ok_or_else(|| PatternError::UnbalancedBrackets(raw.to_string()))?;
            let parts: Vec<String> = inner.split('/').map(str::to_string).collect();
            if parts.iter().any(String::is_empty) {
                return Err(PatternError::EmptySegment(raw.to_string()));
            }
            (&segment[..open], Some(parts))
        }
        None => (segment, None),
    };

    let matcher = match name {
        "" => return Err(PatternError::EmptySegment(raw.to_string())),
        "*" => Matcher::Any,
        literal => Matcher::Key(literal.to_string()),
    };
    Ok(Step { matcher, predicate })
}

fn collect_matches(node: &ConfigNode, steps: &[Step], path: NodePath, out: &mut Vec<NodePath>) {
    let Some((step, rest)) = steps.split_first() else {
        out.push(path);
        return;
    };

    match node {
        ConfigNode::Mapping(entries) => {
            for (key, child) in entries {
                if step.accepts(key, child) {
                    collect_matches(child, rest, path.child(key.as_str()), out);
                }
            }
        }
        ConfigNode::Sequence(items) => {
            for (idx, child) in items.iter().enumerate() {
                if step.accepts(&idx.to_string(), child) {
                    collect_matches(child, rest, path.child(idx), out);
                }
            }
        }
        _ => {}
    }
}

fn remove_matches(node: &mut ConfigNode, steps: &[Step]) -> usize {
    let Some((step, rest)) = steps.split_first() else {
        return 0;
    };

    match node {
        ConfigNode::Mapping(entries) if rest.is_empty() => {
            let before = entries.len();
            entries.retain(|key, child| !step.accepts(key, child));
            before - entries.len()
        }
        ConfigNode::Sequence(items) if rest.is_empty() => {
            let keep: Vec<bool> = items
                .iter()
                .enumerate()
                .map(|(idx, child)| !step.accepts(&idx.to_string(), child))
                .collect();
            let before = items.len();
            let mut flags = keep.into_iter();
            items.retain(|_| flags.next().unwrap_or(true));
            before - items.len()
        }
        ConfigNode::Mapping(entries) => entries
            .iter_mut()
            .filter(|(key, child)| step.accepts(key, child))
            .map(|(_, child)| remove_matches(child, rest))
            .sum(),
        ConfigNode::Sequence(items) => items
            .iter_mut()
            .enumerate()
            .filter(|(idx, child)| step.accepts(&idx.to_string(), child))
            .map(|(_, child)| remove_matches(child, rest))
            .sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{NodePath, PathPattern, PathSegment, PatternError};

    #[test]
    fn node_path_display_escapes_separators() {
        let path: NodePath = [
            PathSegment::Key("dicomNetworkAE".to_string()),
            PathSegment::Key("a/b".to_string()),
            PathSegment::Index(3),
        ]
        .into_iter()
        .collect();

        assert_eq!(path.to_string(), "/dicomNetworkAE/a~1b/3");
        assert_eq!(NodePath::root().to_string(), "/");
    }

    #[test]
    fn pattern_parse_rejects_malformed_input() {
        assert!(matches!(
            PathPattern::parse("aes/*"),
            Err(PatternError::Relative(_))
        ));
        assert!(matches!(
            PathPattern::parse("/"),
            Err(PatternError::SelectsRoot(_))
        ));
        assert!(matches!(
            PathPattern::parse("/aes//x"),
            Err(PatternError::EmptySegment(_))
        ));
        assert!(matches!(
            PathPattern::parse("/aes/*[ext"),
            Err(PatternError::UnbalancedBrackets(_))
        ));
    }

    #[test]
    fn predicate_may_contain_nested_path() {
        let pattern = PathPattern::parse("/aes/*[ext/tcGroups]/tcs").expect("parse");
        assert_eq!(pattern.as_str(), "/aes/*[ext/tcGroups]/tcs");
    }
}
