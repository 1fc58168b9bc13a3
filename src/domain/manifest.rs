//! Persisted document metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version written into every saved container.
pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Metadata stored alongside the tree in a container.
///
/// `version` gates loading (major component only); `notes` is the free text
/// a host can show next to the tree, such as the phrase a syntax tree was
/// constructed from. Unknown keys are preserved so containers written by
/// newer minor versions round-trip through this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            notes: None,
            extra: BTreeMap::new(),
        }
    }
}

impl Manifest {
    /// Major component of a version string ("1.0.0-rc.3" → 1).
    pub fn major_of(version: &str) -> Option<u64> {
        version.split('.').next()?.parse().ok()
    }

    pub fn major(&self) -> Option<u64> {
        Self::major_of(&self.version)
    }
}
