//! Recursive, extension-filtered directory listings

use convsync_types::{Error, ExtensionSet, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Enumerates the regular files of a tree that match an extension filter.
///
/// Listings are root-relative and sorted component-wise ascending, so
/// repeated scans of an unchanged tree return identical sequences. Symbolic
/// links are not followed.
#[derive(Debug, Clone)]
pub struct TreeScanner {
    filter: ExtensionSet,
}

impl TreeScanner {
    /// Create a scanner for the given extension filter
    pub fn new(filter: ExtensionSet) -> Self {
        Self { filter }
    }

    /// Recursively list matching files under `root`.
    ///
    /// Any entry that cannot be read fails the whole listing: a partially
    /// enumerated tree would silently turn unreadable files into deletions
    /// on the destination side.
    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut listing = Vec::new();

        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                Error::traversal(path, e.to_string())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if !self.filter.contains_path(entry.path()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| Error::traversal(entry.path(), e.to_string()))?;
            listing.push(relative.to_path_buf());
        }

        listing.sort();
        debug!(root = %root.display(), files = listing.len(), "scanned tree");
        Ok(listing)
    }
}
