//! Domain types for one reconciliation pass.
//!
//! All path fields use `PathBuf`. Inventories are insertion-ordered maps so
//! that iteration order is the order the loader or the remote listing
//! produced.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Title given to a document that has no `# ` heading line.
pub const DEFAULT_TITLE: &str = "Default Title";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identity of a document and of the remote page mirroring it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Title(pub String);

impl Title {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Title {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Title {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque Notion handle. Pages are blocks too, so one type covers both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteId(pub String);

impl RemoteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RemoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RemoteId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A local Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: Title,
    /// Location of the source file (absolute once loaded from disk).
    pub path: PathBuf,
    /// File content with the title heading line removed.
    pub body: String,
}

/// A child page of the remote root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNode {
    pub id: RemoteId,
    pub title: Title,
}

/// Local documents keyed by title, in priority order.
pub type LocalInventory = IndexMap<Title, Document>;

/// Remote child pages keyed by title, in listing order.
pub type RemoteInventory = IndexMap<Title, RemoteNode>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(Title::from("Getting started").to_string(), "Getting started");
        assert_eq!(RemoteId::from("abc123").to_string(), "abc123");
    }

    #[test]
    fn remote_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&RemoteId::from("abc")).expect("serialize");
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn inventory_keeps_first_position_on_reinsert() {
        let mut inv = RemoteInventory::new();
        for (title, id) in [("A", "1"), ("B", "2"), ("A", "3")] {
            inv.insert(
                Title::from(title),
                RemoteNode {
                    id: RemoteId::from(id),
                    title: Title::from(title),
                },
            );
        }
        let keys: Vec<&str> = inv.keys().map(Title::as_str).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(inv[&Title::from("A")].id.as_str(), "3");
    }
}
