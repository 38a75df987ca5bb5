//! Snapshot persistence and reference database discovery.
//!
//! Snapshots are stored as JSON documents (see [`crate::snapshot`] for the
//! exact shape). Saving is atomic: the document is written to a temporary
//! file in the target directory, synced, then renamed into place, so a
//! killed run leaves either the old file or the complete new one. The
//! database is a set of such files selected by glob patterns and loaded in
//! full before any comparison starts.

use crate::snapshot::Snapshot;
use globset::GlobBuilder;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Malformed snapshot file {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("JSON serialization error: {0}")]
    Serialize(serde_json::Error),
    #[error("Invalid database pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        source: globset::Error,
    },
}

/// Loads one snapshot from a JSON file.
///
/// Any schema violation (missing `files` or `ignore` keys, unknown keys,
/// bad entry tuples) is a fatal [`StoreError::Malformed`], never a
/// per-entry skip.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error(e, path))?;

    serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves a snapshot to the filesystem atomically.
pub fn save_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(snapshot).map_err(StoreError::Serialize)?;

    let parent = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| io_error(e, parent))?;

    let mut temp_file =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| io_error(e, parent))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| io_error(e, path))?;
    temp_file.as_file().sync_all().map_err(StoreError::Io)?;

    temp_file.persist(path).map_err(|e| io_error(e.error, path))?;

    Ok(())
}

/// Loads every reference snapshot selected by the given glob patterns.
///
/// Relative patterns resolve against `db_dir`. A pattern that matches
/// nothing contributes nothing; a matched file that fails to parse is
/// fatal. Files matched by more than one pattern are loaded once. The
/// result is keyed by file path, which is also the reference identifier
/// used in reports.
pub fn load_database(
    patterns: &[String],
    db_dir: &Path,
) -> Result<BTreeMap<String, Snapshot>, StoreError> {
    let mut database = BTreeMap::new();

    for pattern in patterns {
        let resolved = resolve_pattern(pattern, db_dir);

        for path in matching_files(&resolved)? {
            let key = path.to_string_lossy().into_owned();
            if database.contains_key(&key) {
                continue;
            }

            debug!("loading {}", key);
            let snapshot = load_snapshot(&path)?;
            database.insert(key, snapshot);
        }
    }

    Ok(database)
}

fn resolve_pattern(pattern: &str, db_dir: &Path) -> String {
    if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        db_dir.join(pattern).to_string_lossy().into_owned()
    }
}

/// Expands one glob pattern into the sorted list of matching files.
///
/// The walk starts at the longest pattern prefix free of glob
/// metacharacters, so `db/2024/*.json` only walks `db/2024`. A pattern
/// without metacharacters names a single file; as with an empty glob
/// expansion, its absence is not an error.
fn matching_files(pattern: &str) -> Result<Vec<PathBuf>, StoreError> {
    let pattern_path = Path::new(pattern);

    if !pattern.contains(['*', '?', '[']) {
        if pattern_path.is_file() {
            return Ok(vec![pattern_path.to_path_buf()]);
        }
        return Ok(Vec::new());
    }

    // Unlike ignore matching, discovery uses shell filename-expansion
    // semantics: `*` does not cross a path separator, so `db/*.json` only
    // selects direct children of `db`.
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| StoreError::BadPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let base = literal_prefix(pattern_path);
    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for entry in WalkDir::new(&base).follow_links(false) {
        let entry = entry.map_err(|e| StoreError::Io(e.into()))?;
        if entry.file_type().is_file() && matcher.is_match(entry.path()) {
            matches.push(entry.path().to_path_buf());
        }
    }

    matches.sort();
    Ok(matches)
}

/// Longest leading run of path components without glob metacharacters.
fn literal_prefix(pattern: &Path) -> PathBuf {
    let mut base = PathBuf::new();
    for component in pattern.components() {
        let text = component.as_os_str().to_string_lossy();
        if text.contains(['*', '?', '[']) {
            break;
        }
        base.push(component);
    }

    if base.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        base
    }
}

fn io_error(e: std::io::Error, path: &Path) -> StoreError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        StoreError::PermissionDenied(path.to_path_buf())
    } else {
        StoreError::Io(e)
    }
}
