//! Asymmetric comparison of a live snapshot against reference snapshots.
//!
//! The two sides were produced under different, independently supplied
//! ignore lists, and each list must be applied to the *other* side before a
//! mismatch is judged. A database curator may have excluded volatile paths
//! (receipt files, caches) that a live scan still picked up; treating those
//! as discrepancies would be a false positive.

use crate::ignore::{IgnoreSet, PatternError};
use crate::snapshot::{Entry, Snapshot};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// One reported mismatch between the live scan and a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// Same relative path on both sides, different kind or identity.
    Changed { path: String },
    /// Present in the reference, absent from the live scan.
    MissingFromScan { path: String },
    /// Present in the live scan, unknown to the reference.
    UnexpectedFile { path: String, reference_id: String },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::Changed { path } => write!(f, "{} is different", path),
            Discrepancy::MissingFromScan { path } => {
                write!(f, "{} not found in scanned files", path)
            }
            Discrepancy::UnexpectedFile { path, reference_id } => {
                write!(f, "{} not found in {}", path, reference_id)
            }
        }
    }
}

/// Outcome of comparing the live snapshot against one reference.
#[derive(Debug, Clone)]
pub struct ReferenceReport {
    /// Identifier of the reference, the database file it was loaded from.
    pub key: String,
    pub description: Option<String>,
    pub discrepancies: Vec<Discrepancy>,
}

/// Compares a live snapshot against one reference snapshot.
///
/// Pass one walks the reference and reports entries that are changed or
/// missing on the live side, skipping any path the live ignore list
/// excludes. Pass two walks the live side and reports entries the reference
/// does not know about, skipping any path the reference ignore list
/// excludes. A changed path is reported exactly once: pass two consults the
/// set of paths pass one reported rather than relying on ordering, and a
/// path the reference knows but pass one stayed silent about was
/// deliberately skipped under the live ignore list, so it is no discrepancy
/// either.
///
/// # Errors
/// A malformed ignore pattern on either side fails the comparison; it is a
/// configuration error, not a per-entry skip.
pub fn compare(
    live: &Snapshot,
    reference: &Snapshot,
    reference_id: &str,
) -> Result<Vec<Discrepancy>, PatternError> {
    let live_ignores = IgnoreSet::new(&live.ignore_patterns)?;
    let reference_ignores = IgnoreSet::new(&reference.ignore_patterns)?;

    let live_by_path: BTreeMap<&str, &Entry> = live
        .entries
        .iter()
        .map(|e| (e.relative_path.as_str(), e))
        .collect();
    let reference_by_path: BTreeMap<&str, &Entry> = reference
        .entries
        .iter()
        .map(|e| (e.relative_path.as_str(), e))
        .collect();

    let mut discrepancies = Vec::new();
    let mut reported_paths: BTreeSet<&str> = BTreeSet::new();

    for reference_entry in &reference.entries {
        let path = reference_entry.relative_path.as_str();

        if live_ignores.is_match(path) {
            // The live side explicitly excluded this path.
            debug!("{}: excluded by the live ignore list", path);
            continue;
        }

        match live_by_path.get(path) {
            Some(live_entry) if **live_entry == *reference_entry => {}
            Some(_) => {
                reported_paths.insert(path);
                discrepancies.push(Discrepancy::Changed {
                    path: path.to_string(),
                });
            }
            None => {
                reported_paths.insert(path);
                discrepancies.push(Discrepancy::MissingFromScan {
                    path: path.to_string(),
                });
            }
        }
    }

    for live_entry in &live.entries {
        let path = live_entry.relative_path.as_str();

        if reference_ignores.is_match(path) {
            debug!("{}: excluded by the reference ignore list", path);
            continue;
        }

        if reported_paths.contains(path) {
            // Changed content, already reported by pass one.
            continue;
        }

        if reference_by_path.contains_key(path) {
            // Either a structural match, or pass one skipped the path under
            // the live ignore list. Not a discrepancy in this pass.
            continue;
        }

        discrepancies.push(Discrepancy::UnexpectedFile {
            path: path.to_string(),
            reference_id: reference_id.to_string(),
        });
    }

    Ok(discrepancies)
}

/// Compares a live snapshot against every reference in the database.
///
/// Reports are ordered worst match first (discrepancy count descending);
/// ties are broken by key so the output is a stable total order.
pub fn compare_all(
    live: &Snapshot,
    database: &BTreeMap<String, Snapshot>,
) -> Result<Vec<ReferenceReport>, PatternError> {
    let mut reports = Vec::with_capacity(database.len());

    for (key, reference) in database {
        debug!(
            "checking scanned files against {} / {}",
            key,
            reference.description.as_deref().unwrap_or("")
        );

        let discrepancies = compare(live, reference, key)?;
        reports.push(ReferenceReport {
            key: key.clone(),
            description: reference.description.clone(),
            discrepancies,
        });
    }

    reports.sort_by(|a, b| {
        b.discrepancies
            .len()
            .cmp(&a.discrepancies.len())
            .then_with(|| a.key.cmp(&b.key))
    });

    Ok(reports)
}
