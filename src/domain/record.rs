//! Serialized form of a subtree.

use serde::{Deserialize, Serialize};

/// Nested record form of a subtree: the container payload and the clipboard
/// currency.
///
/// Absent label/value stay absent through a round trip; they are written as
/// explicit nulls and never collapse to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRecord {
    pub label: Option<String>,
    pub value: Option<String>,
    pub children: Vec<NodeRecord>,
}
