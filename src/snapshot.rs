//! Snapshot data model and its persisted JSON shape.
//!
//! A snapshot records the identity of every non-directory entry under one
//! root at one point in time, together with the ignore patterns that were in
//! effect when it was produced. Snapshots are created once (by a scan or by
//! deserialization) and never mutated afterwards.
//!
//! The persisted document is
//! `{ "description": ..., "files": [[kind, identity_or_null, path], ...], "ignore": [...] }`
//! with kind codes `"f"` (file), `"l"` (symlink) and `"o"` (other). The
//! 3-tuple entry shape must round-trip losslessly, including entry order.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum EntryDecodeError {
    #[error("unknown entry kind code {0:?}")]
    UnknownKind(String),
    #[error("entry {path:?} of kind {code:?} is missing its identity")]
    MissingIdentity { code: String, path: String },
    #[error("entry {path:?} of kind \"o\" must not carry an identity")]
    UnexpectedIdentity { path: String },
}

/// Identity of one filesystem entry.
///
/// Classification never follows symlinks: a symlink is identified by its raw
/// target string, a regular file by the hex SHA-256 of its content, and any
/// other node (device, socket, fifo, ...) carries no identity at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File { digest: String },
    Symlink { target: String },
    Other,
}

/// One entry within a snapshot. Equality is structural: kind, identity and
/// relative path must all match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry", into = "RawEntry")]
pub struct Entry {
    pub kind: EntryKind,
    /// Path relative to the scanned root, `/`-separated, excluding the root
    /// segment itself. Unique within one snapshot.
    pub relative_path: String,
}

/// Wire shape of an entry: `[kind_code, identity_or_null, relative_path]`.
type RawEntry = (String, Option<String>, String);

impl From<Entry> for RawEntry {
    fn from(entry: Entry) -> RawEntry {
        match entry.kind {
            EntryKind::File { digest } => ("f".to_owned(), Some(digest), entry.relative_path),
            EntryKind::Symlink { target } => ("l".to_owned(), Some(target), entry.relative_path),
            EntryKind::Other => ("o".to_owned(), None, entry.relative_path),
        }
    }
}

impl TryFrom<RawEntry> for Entry {
    type Error = EntryDecodeError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let (code, identity, relative_path) = raw;
        let kind = match (code.as_str(), identity) {
            ("f", Some(digest)) => EntryKind::File { digest },
            ("l", Some(target)) => EntryKind::Symlink { target },
            ("o", None) => EntryKind::Other,
            ("f", None) | ("l", None) => {
                return Err(EntryDecodeError::MissingIdentity {
                    code: code.clone(),
                    path: relative_path,
                });
            }
            ("o", Some(_)) => {
                return Err(EntryDecodeError::UnexpectedIdentity {
                    path: relative_path,
                });
            }
            _ => return Err(EntryDecodeError::UnknownKind(code.clone())),
        };

        Ok(Entry {
            kind,
            relative_path,
        })
    }
}

/// An ordered, immutable record of file identities under one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Free-text label. Always present in stored snapshots (`--store`
    /// requires `--description`); an ephemeral live scan may have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sorted by `relative_path` ascending.
    #[serde(rename = "files")]
    pub entries: Vec<Entry>,
    /// Patterns applied when this snapshot was produced. Also honored when
    /// the snapshot is the reference side of a comparison.
    #[serde(rename = "ignore")]
    pub ignore_patterns: Vec<String>,
}

impl Snapshot {
    pub fn entry_for_path(&self, relative_path: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.relative_path == relative_path)
    }
}
