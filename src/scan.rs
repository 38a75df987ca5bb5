//! Recursive tree traversal producing a live snapshot.
//!
//! Directories are never recorded as entries; only files, symlinks and
//! special nodes appear. Ignored paths are skipped entirely, so they are
//! absent from the snapshot rather than filtered later at compare time.

use crate::fingerprint::{FingerprintError, fingerprint_entry};
use crate::ignore::IgnoreSet;
use crate::snapshot::{Entry, Snapshot};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
}

/// Scans the tree rooted at `root` and returns an ephemeral snapshot.
///
/// The walk never follows symlinks, so symlinked directories appear as
/// single symlink entries and cycles cannot occur. Traversal order is
/// whatever the filesystem yields; entries are sorted by relative path as a
/// final pass. The scan is read-only and runs to completion or fails as a
/// whole: any unreadable directory or regular file aborts it.
pub fn scan_tree(root: &Path, ignores: &IgnoreSet) -> Result<Snapshot, ScanError> {
    let root = root.canonicalize().map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ScanError::PermissionDenied(root.to_path_buf())
        } else {
            ScanError::Io(e)
        }
    })?;

    let mut entries = Vec::new();

    for entry in WalkDir::new(&root).follow_links(false) {
        let entry = entry?;

        if entry.depth() == 0 || entry.file_type().is_dir() {
            continue;
        }

        let relative_path = relative_path_string(&root, entry.path())?;

        if ignores.is_match(&relative_path) {
            debug!("{} -> ignored", relative_path);
            continue;
        }

        debug!("{}", relative_path);

        let kind = fingerprint_entry(entry.path())?;
        entries.push(Entry {
            kind,
            relative_path,
        });
    }

    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(Snapshot {
        description: None,
        entries,
        ignore_patterns: ignores.patterns().to_vec(),
    })
}

/// Renders the path below `root` with `/` as the canonical separator.
/// Non-UTF-8 path segments are decoded lossily at this boundary.
fn relative_path_string(root: &Path, path: &Path) -> Result<String, ScanError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ScanError::Io(std::io::Error::other("entry escaped the scan root")))?;

    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    Ok(segments.join("/"))
}
