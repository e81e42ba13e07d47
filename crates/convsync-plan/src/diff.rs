//! Merge-based diffing of two sorted tree listings
//!
//! Both listings arrive already sorted from the scanner, so a linear
//! two-pointer merge classifies every entry in O(n+m) without any auxiliary
//! index, and naturally separates "missing on the destination" (create) from
//! "missing on the source" (delete).

use crate::SyncPlan;
use convsync_types::{Error, Extension, Result};
use filetime::FileTime;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::trace;

/// A pure rule predicting a source file's destination path.
///
/// Identity for copy-through plans; extension substitution for conversion
/// plans.
#[derive(Debug, Clone, Default)]
pub struct ExtRemap {
    target: Option<Extension>,
}

impl ExtRemap {
    /// The identity remap: destination path equals source path
    pub fn identity() -> Self {
        Self { target: None }
    }

    /// Remap to the given target extension
    pub fn to(target: Extension) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// The target extension, if this remap substitutes one
    pub fn target(&self) -> Option<&Extension> {
        self.target.as_ref()
    }

    /// Apply the remap to a relative path
    pub fn apply(&self, path: &Path) -> PathBuf {
        match &self.target {
            Some(target) => path.with_extension(target.without_dot()),
            None => path.to_path_buf(),
        }
    }
}

/// Options controlling the diff
#[derive(Debug, Clone, Copy)]
pub struct DiffOptions {
    /// Regenerate matched pairs whose source is strictly newer than the
    /// destination. When off, any matched pair counts as up to date.
    pub check_mtime: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self { check_mtime: true }
    }
}

/// Merge-compares two sorted listings into a [`SyncPlan`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeDiffer {
    options: DiffOptions,
}

impl TreeDiffer {
    /// Create a differ with the given options
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Diff `source` against `dest`, both sorted per the scanner's ordering.
    ///
    /// `remap` is applied to each source entry to predict its expected
    /// destination path; comparison is strictly byte-wise over path
    /// components. The roots are only touched when the mtime check fires on
    /// a matched pair.
    pub fn diff(
        &self,
        source_root: &Path,
        dest_root: &Path,
        source: &[PathBuf],
        dest: &[PathBuf],
        remap: &ExtRemap,
    ) -> Result<SyncPlan> {
        let mut to_create = Vec::new();
        let mut to_delete = Vec::new();

        let mut i = 0;
        let mut j = 0;
        while i < source.len() && j < dest.len() {
            let expected = remap.apply(&source[i]);
            match expected.cmp(&dest[j]) {
                // both sides present: stale destinations get regenerated
                Ordering::Equal => {
                    if self.options.check_mtime
                        && Self::is_stale(&source_root.join(&source[i]), &dest_root.join(&dest[j]))?
                    {
                        trace!(path = %source[i].display(), "destination is stale");
                        to_create.push(source[i].clone());
                    }
                    i += 1;
                    j += 1;
                }
                // destination entry has no corresponding source entry
                Ordering::Greater => {
                    to_delete.push(dest[j].clone());
                    j += 1;
                }
                // source entry has no corresponding destination entry
                Ordering::Less => {
                    to_create.push(source[i].clone());
                    i += 1;
                }
            }
        }

        to_create.extend_from_slice(&source[i..]);
        to_delete.extend_from_slice(&dest[j..]);

        Ok(SyncPlan {
            to_create,
            to_delete,
        })
    }

    /// Whether the source file is strictly newer than its destination
    fn is_stale(source: &Path, dest: &Path) -> Result<bool> {
        let source_mtime = Self::mtime(source)?;
        let dest_mtime = Self::mtime(dest)?;
        Ok(source_mtime > dest_mtime)
    }

    fn mtime(path: &Path) -> Result<FileTime> {
        let metadata =
            std::fs::metadata(path).map_err(|e| Error::traversal(path, e.to_string()))?;
        Ok(FileTime::from_last_modification_time(&metadata))
    }
}
