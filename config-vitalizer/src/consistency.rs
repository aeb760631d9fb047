//! Round-trip checks between a tree and its typed form.

use std::fmt::{self, Display, Formatter};

use config_node::{diff, format_text, ConfigNode, DiffEntry, DiffSummary};
use serde::Serialize;

use crate::descriptor::PropertyDescriptor;
use crate::error::ConfigError;
use crate::registry::Registry;

/// Outcome of [`Registry::check_round_trip`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTripReport {
    /// Differences between the normalized input and its re-encoding.
    ///
    /// Non-empty when the input relied on coercions, defaults, duplicate set
    /// members or keys the model ignores.
    pub differences: Vec<DiffEntry>,
    /// Whether encoding the decoded tree a second time is a no-op.
    pub idempotent: bool,
}

impl RoundTripReport {
    /// The input is already in canonical form.
    pub fn is_lossless(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        self.idempotent
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary::of(&self.differences)
    }
}

impl Display for RoundTripReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "round trip: {} change(s), idempotent={}",
            self.summary().changes(),
            self.idempotent
        )?;
        if !self.differences.is_empty() {
            writeln!(f, "{}", format_text(&self.differences))?;
        }
        Ok(())
    }
}

impl Registry {
    /// Decode `node`, re-encode it, and compare.
    ///
    /// Conversion failures are returned as errors; a report is produced only
    /// when the tree is decodable.
    pub fn check_round_trip(
        &self,
        node: &ConfigNode,
        property: &PropertyDescriptor,
    ) -> Result<RoundTripReport, ConfigError> {
        let normalized = self.normalize(node.clone(), property)?;
        let value = self.decode(&normalized, property)?;
        let encoded = self.encode(&value, property)?;

        let again = self.encode(&self.decode(&encoded, property)?, property)?;

        Ok(RoundTripReport {
            differences: diff(&normalized, &encoded),
            idempotent: again == encoded,
        })
    }
}
