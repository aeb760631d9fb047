//! Renderings of diff results for people and for tooling.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::codec::CodecError;
use crate::diff::DiffEntry;

/// Entry counts of a diff, per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub identical: usize,
    pub modified: usize,
    pub only_left: usize,
    pub only_right: usize,
    pub structural: usize,
}

impl DiffSummary {
    pub fn of(entries: &[DiffEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, entry| {
            match entry {
                DiffEntry::Identical { .. } => acc.identical += 1,
                DiffEntry::Modified { .. } => acc.modified += 1,
                DiffEntry::OnlyLeft { .. } => acc.only_left += 1,
                DiffEntry::OnlyRight { .. } => acc.only_right += 1,
                DiffEntry::Structural { .. } => acc.structural += 1,
            }
            acc
        })
    }

    /// Number of entries that are not [`DiffEntry::Identical`].
    pub fn changes(&self) -> usize {
        self.modified + self.only_left + self.only_right + self.structural
    }
}

impl Display for DiffSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "identical={} modified={} only_left={} only_right={} structural={}",
            self.identical, self.modified, self.only_left, self.only_right, self.structural
        )
    }
}

fn entry_line(entry: &DiffEntry) -> String {
    match entry {
        DiffEntry::Identical { path } => format!("= {path}"),
        DiffEntry::Modified { path, left, right } => format!("~ {path}: {left} -> {right}"),
        DiffEntry::OnlyLeft { path, node } => format!("- {path} = {node}"),
        DiffEntry::OnlyRight { path, node } => format!("+ {path} = {node}"),
        DiffEntry::Structural { path, description } => format!("! {path}: {description}"),
    }
}

/// One line per entry, prefixed with `=`, `~`, `-`, `+` or `!`.
pub fn format_text(entries: &[DiffEntry]) -> String {
    entries.iter().map(entry_line).collect::<Vec<_>>().join("\n")
}

pub fn format_summary(entries: &[DiffEntry]) -> String {
    DiffSummary::of(entries).to_string()
}

/// Pretty-printed JSON array of entries, tagged by `type`.
pub fn format_json(entries: &[DiffEntry]) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(entries)?)
}
